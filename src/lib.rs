#![warn(missing_docs)]

//! # DynamoDB Bulk
//!
//! Purge, dump and seed whole Amazon DynamoDB tables.
//!
//! ## Overview
//!
//! This library walks a table with a resumable scan iterator and:
//! - Deletes every item with batched deletes, resubmitting unprocessed requests with backoff
//! - Streams every item to a JSON array, either plain or in DynamoDB's tagged form
//! - Puts every item of a JSON array back into a table
//!
//! Progress is reported through a non-blocking [`emitter::Publisher`], every store call
//! can be cancelled with a [`tokio_util::sync::CancellationToken`], and events are
//! emitted under the [`tracing::Span`] handed to each component.
//!
//! ## Quick Example
//!
//! ```no_run
//! use aws_sdk_dynamodb::Client;
//! use dynamodb_bulk::{bulk, config, emitter};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> dynamodb_bulk::error::Result<()> {
//! let client = config::ClientConfig::new("us-east-1", Some("http://localhost:8000"))?
//!     .connect()
//!     .await;
//! let (emitter, _messages) = emitter::channel(emitter::DEFAULT_CAPACITY);
//! let bulk = bulk::Bulk::new(&client, &emitter, CancellationToken::new(), tracing::Span::none());
//!
//! let options = config::DumpOptions::new(&[], None, Some("#s = :s"), "#s=status", ":s=active", false)?;
//! let mut output = Vec::new();
//! let dumped = bulk.dump("users", &mut output, &options).await?;
//! println!("dumped {dumped} items");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@bulk`] - Purge, dump and seed
//! - [`mod@common`] - Attribute model, JSON codec, keys, projections and filters
//! - [`mod@read`] - Scan requests and the scan iterator
//! - [`mod@write`] - Batch writes and single puts
//! - [`mod@store`] - The store trait and its DynamoDB implementation

/// Whole-table purge, dump and seed.
pub mod bulk;

/// Common utilities for attributes, keys, filters and attribute selection.
pub mod common;

/// Validated client and operation options.
pub mod config;

/// Non-blocking progress messages.
pub mod emitter;

/// Error type and result alias.
pub mod error;

/// Subscriber setup for the command-line binary.
pub mod logging;

/// Read operations for retrieving data from DynamoDB tables.
///
/// This module provides operations for:
/// - Building scan requests
/// - Iterating over scan pages
pub mod read;

/// Terminal spinner fed by progress messages.
pub mod spinner;

/// The store capability and its DynamoDB implementation.
pub mod store;

/// Write operations for modifying data in DynamoDB tables.
///
/// This module provides operations for:
/// - Putting new items or replacing existing ones
/// - Batch writing puts and deletes
pub mod write;

#[cfg(test)]
mod testing;
