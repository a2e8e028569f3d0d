//! Whole-table operations built on the scan iterator and the writers.
//!
//! This module provides:
//! - Purging every item of a table with batched deletes
//! - Dumping a table to a JSON array, plain or tagged
//! - Seeding a table from a JSON array

/// Stream every item of a table to a writer.
pub mod dump;

/// Delete every item of a table.
pub mod purge;

/// Put every item of a JSON array into a table.
pub mod seed;

use crate::emitter::Publisher;
use crate::read::iterator::ScanIterator;
use crate::store::Store;
use crate::write::common::{RetryConfig, WriteArgs};

use tokio_util::sync::CancellationToken;
use tracing::Span;

/// Runs bulk operations against one store, reporting progress to a publisher.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_bulk::{bulk, common, emitter};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example(client: &Client) -> dynamodb_bulk::error::Result<()> {
/// let (emitter, _messages) = emitter::channel(emitter::DEFAULT_CAPACITY);
/// let bulk = bulk::Bulk::new(client, &emitter, CancellationToken::new(), tracing::Span::none());
/// let deleted = bulk.purge("users", &common::key::TableKeys::default()).await?;
/// println!("deleted {deleted} items");
/// # Ok(())
/// # }
/// ```
pub struct Bulk<'a, S: ?Sized> {
    cancel: CancellationToken,
    dry_run: bool,
    publisher: &'a dyn Publisher,
    retry: RetryConfig,
    span: Span,
    store: &'a S,
}

impl<'a, S: Store + ?Sized> Bulk<'a, S> {
    /// Create a service writing to `store`.
    pub fn new(
        store: &'a S,
        publisher: &'a dyn Publisher,
        cancel: CancellationToken,
        span: Span,
    ) -> Self {
        Self {
            cancel,
            dry_run: false,
            publisher,
            retry: RetryConfig::default(),
            span,
            store,
        }
    }

    /// Print what would be written instead of writing it.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Backoff for unprocessed batch writes.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn scan_iterator(&self, span: &Span) -> ScanIterator<'a, S> {
        ScanIterator::new(self.store, self.cancel.clone(), span.clone())
    }

    fn write_args(&self, table_name: &str) -> WriteArgs {
        WriteArgs {
            dry_run: self.dry_run,
            retry: self.retry.clone(),
            table_name: table_name.to_string(),
        }
    }
}
