use crate::common::{self, attribute, codec};
use crate::error::{Error, Result};
use crate::store::{self, Store};
use crate::write;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::Span;

/// put item operation
#[derive(Debug, PartialEq)]
struct PutItemInput {
    dry_run: bool,
    item: attribute::Item,
    table_name: String,
}

/// Put item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_bulk::write;
/// use serde_json::json;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example(client: &Client) -> dynamodb_bulk::error::Result<()> {
/// let put_item = write::put_item::PutItem {
///     item: json!({"id": "1", "name": "John"}),
///     raw: false,
///     write_args: write::common::WriteArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// put_item
///     .send(client, &CancellationToken::new(), &tracing::Span::none())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct PutItem {
    /// The item to put into the table, as plain JSON or in tagged form.
    pub item: Value,
    /// Whether `item` is already in tagged form.
    pub raw: bool,
    /// Table name and dry-run flag.
    pub write_args: write::common::WriteArgs,
}

impl TryFrom<PutItem> for PutItemInput {
    type Error = Error;

    fn try_from(put_item: PutItem) -> Result<Self> {
        let item = if put_item.raw {
            codec::from_tagged(put_item.item)?
        } else {
            codec::marshal_item(put_item.item)?
        };
        let operation = Self {
            dry_run: put_item.write_args.dry_run,
            item,
            table_name: put_item.write_args.table_name,
        };
        Ok(operation)
    }
}

impl PutItem {
    /// Execute the put item operation.
    pub async fn send<S: Store + ?Sized>(
        self,
        store: &S,
        cancel: &CancellationToken,
        span: &Span,
    ) -> Result<()> {
        let put_item: PutItemInput = self.try_into()?;
        if put_item.dry_run {
            tracing::debug!(parent: span, table_name = %put_item.table_name, "dry run, skipping put item");
            common::pretty_print(&codec::to_tagged(&put_item.item));
            return Ok(());
        }
        store::cancellable(cancel, store.put_item(&put_item.table_name, put_item.item))
            .await
            .inspect_err(|error| {
                tracing::error!(parent: span, %error, "could not put item");
            })
    }
}
