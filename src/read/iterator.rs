use crate::common::attribute;
use crate::error::{Error, Result};
use crate::read::scan::{ScanInput, ScanPage};
use crate::store::{self, Store};

use tokio_util::sync::CancellationToken;
use tracing::Span;

/// Result of one [`ScanIterator::next`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanStep {
    /// The page read, if any.
    pub page: Option<ScanPage>,
    /// Whether the scan has reached its end.
    pub done: bool,
}

/// Walks a table page by page, remembering the cursor between calls.
///
/// Any cursor set on the input is replaced by the one the iterator holds,
/// so the same [`ScanInput`] can be passed on every call.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_bulk::read;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example(client: &Client) -> dynamodb_bulk::error::Result<()> {
/// let input: read::scan::ScanInput = read::scan::Scan {
///     table_name: "users".to_string(),
///     ..Default::default()
/// }
/// .into();
/// let mut iterator =
///     read::iterator::ScanIterator::new(client, CancellationToken::new(), tracing::Span::none());
/// while !iterator.is_done() {
///     let step = iterator.next(input.clone()).await?;
///     if let Some(page) = step.page {
///         println!("{} items", page.items.len());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct ScanIterator<'a, S: ?Sized> {
    cancel: CancellationToken,
    done: bool,
    last_evaluated_key: Option<attribute::Item>,
    span: Span,
    store: &'a S,
}

impl<'a, S: Store + ?Sized> ScanIterator<'a, S> {
    /// Create an iterator positioned at the start of the table.
    pub fn new(store: &'a S, cancel: CancellationToken, span: Span) -> Self {
        Self {
            cancel,
            done: false,
            last_evaluated_key: None,
            span,
            store,
        }
    }

    /// Whether the last page has been read.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Read the next page.
    ///
    /// Once done, no further store calls are made. A store error also ends the scan.
    pub async fn next(&mut self, mut input: ScanInput) -> Result<ScanStep> {
        if self.done {
            return Ok(ScanStep {
                page: None,
                done: true,
            });
        }
        input.exclusive_start_key = self.last_evaluated_key.take();
        match store::cancellable(&self.cancel, self.store.scan(input)).await {
            Ok(page) => {
                self.last_evaluated_key = page.last_evaluated_key.clone();
                self.done = self.last_evaluated_key.is_none();
                tracing::debug!(
                    parent: &self.span,
                    items = page.items.len(),
                    scanned_count = page.scanned_count,
                    done = self.done,
                    "scanned page"
                );
                Ok(ScanStep {
                    page: Some(page),
                    done: self.done,
                })
            }
            Err(Error::EmptyResult) => {
                self.done = true;
                tracing::debug!(parent: &self.span, "scan returned no item list");
                Ok(ScanStep {
                    page: None,
                    done: true,
                })
            }
            Err(error) => {
                self.done = true;
                tracing::error!(parent: &self.span, %error, "could not scan table");
                Err(error)
            }
        }
    }

    /// Read every remaining page and return their items in order.
    pub async fn collect_all(&mut self, input: ScanInput) -> Result<Vec<attribute::Item>> {
        let mut items = Vec::new();
        while !self.done {
            if let Some(page) = self.next(input.clone()).await?.page {
                items.extend(page.items);
            }
        }
        Ok(items)
    }
}
