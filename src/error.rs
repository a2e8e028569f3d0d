//! Error type shared by every bulk operation.

use aws_sdk_dynamodb::{error, operation};
use thiserror::Error;

/// Boxed source error of a failed store call.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while purging, dumping or seeding a table.
#[derive(Debug, Error)]
pub enum Error {
    /// A value could not be decoded: malformed number, bad base64 or wrong JSON shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// A value carried a type tag this crate does not know.
    #[error("unsupported attribute value type: {0}")]
    UnsupportedType(String),

    /// A store call (scan, batch write, put) failed.
    #[error("{operation} failed: {source}")]
    Store {
        /// Name of the failed store operation.
        operation: &'static str,
        /// Underlying SDK or transport error.
        #[source]
        source: BoxError,
    },

    /// The store answered a scan without an item list.
    #[error("no items returned")]
    EmptyResult,

    /// Unprocessed write requests remained after the last allowed resubmission.
    #[error("{unprocessed} write requests still unprocessed after {attempts} attempts")]
    RetryExhausted {
        /// Number of batch write calls made for the chunk.
        attempts: usize,
        /// Number of requests the store still reported as unprocessed.
        unprocessed: usize,
    },

    /// The operation was cancelled before or during a store call.
    #[error("operation cancelled")]
    Cancelled,

    /// Invalid options.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The message queue is closed and drained.
    #[error("channel closed")]
    ChannelClosed,

    /// Reading or writing the data stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding the data stream failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn store(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Store {
            operation,
            source: source.into(),
        }
    }

    /// Whether the error is structural (bad data) rather than a store or stream failure.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::UnsupportedType(_))
    }
}

macro_rules! impl_from_sdk_error {
    ($error:ty, $operation:literal) => {
        impl From<error::SdkError<$error>> for Error {
            fn from(source: error::SdkError<$error>) -> Self {
                Self::store($operation, source)
            }
        }
    };
}

impl_from_sdk_error!(operation::scan::ScanError, "scan");
impl_from_sdk_error!(operation::batch_write_item::BatchWriteItemError, "batch write");
impl_from_sdk_error!(operation::put_item::PutItemError, "put item");

impl From<error::BuildError> for Error {
    fn from(source: error::BuildError) -> Self {
        Self::store("request build", source)
    }
}

impl From<serde_dynamo::Error> for Error {
    fn from(source: serde_dynamo::Error) -> Self {
        Self::Decode(source.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(source: base64::DecodeError) -> Self {
        Self::Decode(format!("invalid base64: {source}"))
    }
}
