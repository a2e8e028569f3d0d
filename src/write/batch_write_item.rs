use crate::common::{self, attribute, codec};
use crate::error::{Error, Result};
use crate::store::{self, Store};
use crate::write::common::{MAX_BATCH_SIZE, RetryConfig, WriteArgs};

use aws_sdk_dynamodb::types;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::Span;

/// A single request within a batch write operation.
#[derive(Clone, Debug, PartialEq)]
pub enum WriteRequest {
    /// Put item request - creates or replaces an item.
    Put(attribute::Item),
    /// Delete item request - removes an item by its primary key.
    Delete(attribute::Item),
}

impl WriteRequest {
    /// The request in the store's own JSON shape, for printing.
    pub fn to_tagged(&self) -> Value {
        match self {
            Self::Put(item) => json!({"PutRequest": {"Item": codec::to_tagged(item)}}),
            Self::Delete(key) => json!({"DeleteRequest": {"Key": codec::to_tagged(key)}}),
        }
    }
}

impl TryFrom<WriteRequest> for types::WriteRequest {
    type Error = Error;

    fn try_from(write_request: WriteRequest) -> Result<Self> {
        let builder = match write_request {
            WriteRequest::Put(item) => {
                let put_request = types::PutRequest::builder()
                    .set_item(Some(attribute::item_into_sdk(item)))
                    .build()?;
                Self::builder().set_put_request(Some(put_request))
            }
            WriteRequest::Delete(key) => {
                let delete_request = types::DeleteRequest::builder()
                    .set_key(Some(attribute::item_into_sdk(key)))
                    .build()?;
                Self::builder().set_delete_request(Some(delete_request))
            }
        };
        let request = builder.build();
        Ok(request)
    }
}

impl TryFrom<types::WriteRequest> for WriteRequest {
    type Error = Error;

    fn try_from(write_request: types::WriteRequest) -> Result<Self> {
        match (write_request.put_request, write_request.delete_request) {
            (Some(put_request), _) => Ok(Self::Put(attribute::item_from_sdk(put_request.item)?)),
            (None, Some(delete_request)) => {
                Ok(Self::Delete(attribute::item_from_sdk(delete_request.key)?))
            }
            (None, None) => Err(Error::Decode("write request without a body".to_string())),
        }
    }
}

/// Submits write requests in batches and drains whatever the store leaves unprocessed.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_bulk::write;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example(client: &Client, key: dynamodb_bulk::common::attribute::Item) -> dynamodb_bulk::error::Result<()> {
/// let writer = write::batch_write_item::BatchWriter::new(
///     client,
///     write::common::WriteArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
///     CancellationToken::new(),
///     tracing::Span::none(),
/// );
/// writer
///     .submit(vec![write::batch_write_item::WriteRequest::Delete(key)])
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct BatchWriter<'a, S: ?Sized> {
    cancel: CancellationToken,
    dry_run: bool,
    retry: RetryConfig,
    span: Span,
    store: &'a S,
    table_name: String,
}

impl<'a, S: Store + ?Sized> BatchWriter<'a, S> {
    /// Create a writer for one table.
    pub fn new(store: &'a S, write_args: WriteArgs, cancel: CancellationToken, span: Span) -> Self {
        Self {
            cancel,
            dry_run: write_args.dry_run,
            retry: write_args.retry,
            span,
            store,
            table_name: write_args.table_name,
        }
    }

    /// Submit `requests` in chunks of at most [`MAX_BATCH_SIZE`].
    ///
    /// Each chunk is resubmitted until the store reports nothing unprocessed.
    /// Store errors abort the whole submission; chunks already written stay written.
    pub async fn submit(&self, requests: Vec<WriteRequest>) -> Result<()> {
        if self.dry_run {
            tracing::debug!(parent: &self.span, requests = requests.len(), "dry run, skipping batch write");
            let batch: Vec<_> = requests.iter().map(WriteRequest::to_tagged).collect();
            common::pretty_print(&Value::Array(batch));
            return Ok(());
        }
        let mut requests = requests.into_iter().peekable();
        while requests.peek().is_some() {
            let chunk: Vec<_> = requests.by_ref().take(MAX_BATCH_SIZE).collect();
            self.submit_chunk(chunk).await?;
        }
        Ok(())
    }

    async fn submit_chunk(&self, mut pending: Vec<WriteRequest>) -> Result<()> {
        let mut attempts = 0;
        loop {
            tracing::debug!(parent: &self.span, requests = pending.len(), attempts, "submitting batch");
            pending = store::cancellable(
                &self.cancel,
                self.store.batch_write(&self.table_name, pending),
            )
            .await
            .inspect_err(|error| {
                tracing::error!(parent: &self.span, %error, "could not batch write items");
            })?;
            attempts += 1;
            if pending.is_empty() {
                return Ok(());
            }
            if attempts > self.retry.max_retries {
                tracing::error!(parent: &self.span, unprocessed = pending.len(), attempts, "giving up on unprocessed items");
                return Err(Error::RetryExhausted {
                    attempts,
                    unprocessed: pending.len(),
                });
            }
            let delay = self.retry.delay(attempts - 1);
            tracing::info!(parent: &self.span, unprocessed = pending.len(), ?delay, "unprocessed items detected, resubmitting");
            store::cancellable(&self.cancel, async {
                tokio::time::sleep(delay).await;
                Ok(())
            })
            .await?;
        }
    }
}
