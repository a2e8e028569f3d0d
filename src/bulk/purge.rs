use crate::bulk::Bulk;
use crate::common::{self, codec, key};
use crate::error::Result;
use crate::read::scan;
use crate::store::Store;
use crate::write::batch_write_item::{BatchWriter, WriteRequest};
use crate::write::common::MAX_BATCH_SIZE;

use serde_json::Value;
use std::time::Instant;

impl<S: Store + ?Sized> Bulk<'_, S> {
    /// Delete every item of `table_name`, one page of keys at a time.
    ///
    /// Returns the number of deleted items. A dry run prints the first page of keys and
    /// deletes nothing.
    pub async fn purge(&self, table_name: &str, keys: &key::TableKeys) -> Result<usize> {
        let span = tracing::info_span!(parent: &self.span, "purge", table_name);
        self.publisher
            .publish(format!("scanning table {table_name} for items to purge"));
        let started = Instant::now();

        let input: scan::ScanInput = scan::Scan {
            limit: Some(MAX_BATCH_SIZE as i32),
            selection: Some(keys.selection()),
            table_name: table_name.to_string(),
            ..Default::default()
        }
        .into();
        let mut iterator = self.scan_iterator(&span);
        let writer = BatchWriter::new(
            self.store,
            self.write_args(table_name),
            self.cancel.clone(),
            span.clone(),
        );

        let mut deleted = 0;
        while !iterator.is_done() {
            let Some(page) = iterator.next(input.clone()).await?.page else {
                continue;
            };
            if page.items.is_empty() {
                continue;
            }
            if self.dry_run {
                tracing::debug!(parent: &span, "dry run enabled");
                let items = page.items.iter().map(codec::to_tagged).collect();
                common::pretty_print(&Value::Array(items));
                return Ok(0);
            }
            let requests = page
                .items
                .iter()
                .map(|item| keys.key_of(item).map(WriteRequest::Delete))
                .collect::<Result<Vec<_>>>()?;
            writer.submit(requests).await?;
            deleted += page.items.len();
            self.publisher.publish(format!("deleted {deleted} items"));
        }

        let elapsed = started.elapsed();
        self.publisher.publish(format!(
            "purge complete, deleted {deleted} items, time taken [{elapsed:?}]"
        ));
        tracing::info!(parent: &span, deleted, ?elapsed, "purge complete");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::read::scan::ScanPage;
    use crate::testing::{MockStore, RecordingPublisher, string_item};
    use crate::write::common::RetryConfig;

    use rstest::rstest;
    use tokio_util::sync::CancellationToken;
    use tracing::Span;

    fn page(values: &[(&str, &str)], cursor: Option<&str>) -> ScanPage {
        ScanPage {
            items: values
                .iter()
                .map(|(pk, sk)| string_item(&[("pk", pk), ("sk", sk)]))
                .collect(),
            last_evaluated_key: cursor.map(|cursor| string_item(&[("pk", cursor)])),
            scanned_count: values.len() as i32,
        }
    }

    #[tokio::test]
    async fn test_purge_one_page() {
        let store = MockStore::default();
        store.push_page(Ok(page(&[("a", "1"), ("b", "2")], None)));
        let publisher = RecordingPublisher::default();
        let bulk = Bulk::new(&store, &publisher, CancellationToken::new(), Span::none());

        let deleted = bulk.purge("t", &key::TableKeys::default()).await.unwrap();

        assert_eq!(deleted, 2);
        let inputs = store.scan_inputs();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].limit, Some(25));
        assert_eq!(inputs[0].projection_expression.as_deref(), Some("#pk, #sk"));
        assert_eq!(
            store.batches(),
            vec![vec![
                WriteRequest::Delete(string_item(&[("pk", "a"), ("sk", "1")])),
                WriteRequest::Delete(string_item(&[("pk", "b"), ("sk", "2")])),
            ]]
        );
        let messages = publisher.messages();
        assert_eq!(messages[0], "scanning table t for items to purge");
        assert_eq!(messages[1], "deleted 2 items");
        assert!(messages[2].starts_with("purge complete, deleted 2 items, time taken ["));
    }

    #[tokio::test]
    async fn test_purge_follows_pages() {
        let store = MockStore::default();
        store.push_page(Ok(page(&[("a", "1")], Some("a"))));
        store.push_page(Ok(page(&[], Some("b"))));
        store.push_page(Ok(page(&[("c", "3")], None)));
        let publisher = RecordingPublisher::default();
        let bulk = Bulk::new(&store, &publisher, CancellationToken::new(), Span::none());

        let deleted = bulk.purge("t", &key::TableKeys::default()).await.unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(store.scan_inputs().len(), 3);
        assert_eq!(store.batches().len(), 2);
        assert!(publisher.messages().contains(&"deleted 2 items".to_string()));
    }

    #[rstest]
    #[case::no_resubmission(0, 1)]
    #[case::two_resubmissions(2, 3)]
    #[tokio::test]
    async fn test_purge_retry_exhausted(
        #[case] max_retries: usize,
        #[case] expected_calls: usize,
    ) {
        let store = MockStore::default();
        store.push_page(Ok(page(&[("a", "1"), ("b", "2")], None)));
        let residual = WriteRequest::Delete(string_item(&[("pk", "b"), ("sk", "2")]));
        for _ in 0..expected_calls {
            store.push_batch_response(Ok(vec![residual.clone()]));
        }
        let publisher = RecordingPublisher::default();
        let bulk = Bulk::new(&store, &publisher, CancellationToken::new(), Span::none())
            .with_retry(RetryConfig::immediate(max_retries));

        let result = bulk.purge("t", &key::TableKeys::default()).await;

        assert!(matches!(
            result,
            Err(Error::RetryExhausted { attempts, unprocessed: 1 }) if attempts == expected_calls
        ));
        let batches = store.batches();
        assert_eq!(batches.len(), expected_calls);
        assert!(batches[1..].iter().all(|batch| batch == &vec![residual.clone()]));
        assert!(!publisher.messages().iter().any(|m| m.starts_with("deleted")));
    }

    #[tokio::test]
    async fn test_purge_hash_key_only() {
        let store = MockStore::default();
        store.push_page(Ok(ScanPage {
            items: vec![string_item(&[("id", "a")])],
            ..Default::default()
        }));
        let publisher = RecordingPublisher::default();
        let bulk = Bulk::new(&store, &publisher, CancellationToken::new(), Span::none());
        let keys = key::TableKeys::new("id", None).unwrap();

        let deleted = bulk.purge("t", &keys).await.unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(
            store.batches(),
            vec![vec![WriteRequest::Delete(string_item(&[("id", "a")]))]]
        );
    }

    #[tokio::test]
    async fn test_purge_dry_run() {
        let store = MockStore::default();
        store.push_page(Ok(page(&[("a", "1")], Some("a"))));
        let publisher = RecordingPublisher::default();
        let bulk = Bulk::new(&store, &publisher, CancellationToken::new(), Span::none())
            .with_dry_run(true);

        let deleted = bulk.purge("t", &key::TableKeys::default()).await.unwrap();

        assert_eq!(deleted, 0);
        assert_eq!(store.scan_inputs().len(), 1);
        assert!(store.batches().is_empty());
    }

    #[tokio::test]
    async fn test_purge_missing_key() {
        let store = MockStore::default();
        store.push_page(Ok(ScanPage {
            items: vec![string_item(&[("pk", "a")])],
            ..Default::default()
        }));
        let publisher = RecordingPublisher::default();
        let bulk = Bulk::new(&store, &publisher, CancellationToken::new(), Span::none());

        let result = bulk.purge("t", &key::TableKeys::default()).await;

        assert!(matches!(result, Err(Error::Decode(_))));
        assert!(store.batches().is_empty());
    }

    #[tokio::test]
    async fn test_purge_cancelled() {
        let store = MockStore::default();
        let publisher = RecordingPublisher::default();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let bulk = Bulk::new(&store, &publisher, cancel, Span::none());

        let result = bulk.purge("t", &key::TableKeys::default()).await;

        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(store.scan_inputs().is_empty());
        assert!(store.batches().is_empty());
    }
}
