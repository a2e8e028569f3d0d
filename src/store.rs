//! The store capability the bulk operations depend on, and its DynamoDB implementation.

use crate::common::attribute::{self, Item};
use crate::error::{Error, Result};
use crate::read::scan::{ScanInput, ScanPage};
use crate::write::batch_write_item::WriteRequest;

use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, types};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// The three store calls purge, dump and seed are built on.
#[async_trait]
pub trait Store: Send + Sync {
    /// Read one page of a table.
    ///
    /// Returns [`Error::EmptyResult`] when the response carries no item list at all.
    async fn scan(&self, input: ScanInput) -> Result<ScanPage>;

    /// Submit one batch of at most 25 write requests.
    ///
    /// Returns the requests the store did not process.
    async fn batch_write(
        &self,
        table_name: &str,
        requests: Vec<WriteRequest>,
    ) -> Result<Vec<WriteRequest>>;

    /// Create or replace a single item.
    async fn put_item(&self, table_name: &str, item: Item) -> Result<()>;
}

/// Run a store call unless `cancel` fires first.
pub(crate) async fn cancellable<T, F>(cancel: &CancellationToken, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = call => result,
    }
}

#[async_trait]
impl Store for Client {
    async fn scan(&self, input: ScanInput) -> Result<ScanPage> {
        let output = Client::scan(self)
            .set_exclusive_start_key(input.exclusive_start_key.map(attribute::item_into_sdk))
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(
                input
                    .expression_attribute_values
                    .map(attribute::item_into_sdk),
            )
            .set_filter_expression(input.filter_expression)
            .set_limit(input.limit)
            .set_projection_expression(input.projection_expression)
            .table_name(input.table_name)
            .send()
            .await?;
        let Some(items) = output.items else {
            return Err(Error::EmptyResult);
        };
        let items = items
            .into_iter()
            .map(attribute::item_from_sdk)
            .collect::<Result<_>>()?;
        let last_evaluated_key = output
            .last_evaluated_key
            .filter(|key| !key.is_empty())
            .map(attribute::item_from_sdk)
            .transpose()?;
        Ok(ScanPage {
            items,
            last_evaluated_key,
            scanned_count: output.scanned_count,
        })
    }

    async fn batch_write(
        &self,
        table_name: &str,
        requests: Vec<WriteRequest>,
    ) -> Result<Vec<WriteRequest>> {
        let requests = requests
            .into_iter()
            .map(types::WriteRequest::try_from)
            .collect::<Result<Vec<_>>>()?;
        let output = Client::batch_write_item(self)
            .request_items(table_name, requests)
            .send()
            .await?;
        output
            .unprocessed_items
            .and_then(|mut tables| tables.remove(table_name))
            .unwrap_or_default()
            .into_iter()
            .map(WriteRequest::try_from)
            .collect()
    }

    async fn put_item(&self, table_name: &str, item: Item) -> Result<()> {
        Client::put_item(self)
            .set_item(Some(attribute::item_into_sdk(item)))
            .table_name(table_name)
            .send()
            .await?;
        Ok(())
    }
}
