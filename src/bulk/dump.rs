use crate::bulk::Bulk;
use crate::common::{self, codec};
use crate::config::DumpOptions;
use crate::error::Result;
use crate::read::scan;
use crate::store::Store;

use tokio::io::{AsyncWrite, AsyncWriteExt};

impl<S: Store + ?Sized> Bulk<'_, S> {
    /// Write every item of `table_name` to `writer` as a JSON array.
    ///
    /// Pages are written as they arrive. A dry run prints the items and writes nothing.
    /// Returns the number of items scanned.
    pub async fn dump<W>(
        &self,
        table_name: &str,
        writer: &mut W,
        options: &DumpOptions,
    ) -> Result<usize>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let span = tracing::info_span!(parent: &self.span, "dump", table_name);
        self.publisher.publish(format!("dumping table {table_name}"));

        let input: scan::ScanInput = options.scan(table_name).into();
        let mut iterator = self.scan_iterator(&span);

        if !self.dry_run {
            writer.write_all(b"[\n").await?;
        }
        let mut scanned = 0;
        while !iterator.is_done() {
            let Some(page) = iterator.next(input.clone()).await?.page else {
                continue;
            };
            for item in &page.items {
                let value = if options.raw_output {
                    codec::to_tagged(item)
                } else {
                    codec::flatten(item).inspect_err(|error| {
                        tracing::error!(parent: &span, %error, "could not transform item");
                    })?
                };
                if self.dry_run {
                    common::pretty_print(&value);
                } else {
                    if scanned > 0 {
                        writer.write_all(b",\n").await?;
                    }
                    writer.write_all(&serde_json::to_vec(&value)?).await?;
                }
                scanned += 1;
            }
            self.publisher.publish(format!("scanned {scanned} items"));
        }

        if self.dry_run {
            tracing::debug!(parent: &span, items = scanned, "dry run enabled");
        } else {
            writer.write_all(b"\n]").await?;
            writer.flush().await?;
        }
        self.publisher.publish("dump complete".to_string());
        tracing::info!(parent: &span, items = scanned, "dump complete");
        Ok(scanned)
    }
}
