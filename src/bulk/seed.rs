use crate::bulk::Bulk;
use crate::config::SeedOptions;
use crate::error::Result;
use crate::store::Store;
use crate::write::put_item::PutItem;

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};

impl<S: Store + ?Sized> Bulk<'_, S> {
    /// Put every element of the JSON array read from `reader` into `table_name`.
    ///
    /// Items are written one put at a time. A dry run prints them instead.
    /// Returns the number of items read.
    pub async fn seed<R>(
        &self,
        table_name: &str,
        reader: &mut R,
        options: &SeedOptions,
    ) -> Result<usize>
    where
        R: AsyncRead + Unpin + Send + ?Sized,
    {
        let span = tracing::info_span!(parent: &self.span, "seed", table_name);
        self.publisher
            .publish(format!("putting items to table {table_name}"));

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).await?;
        let items: Vec<Value> = serde_json::from_slice(&buffer).inspect_err(|error| {
            tracing::error!(parent: &span, %error, "could not decode items");
        })?;
        if self.dry_run {
            tracing::debug!(parent: &span, items = items.len(), "dry run enabled");
        }

        let mut inserted = 0;
        for item in items {
            PutItem {
                item,
                raw: options.raw_input,
                write_args: self.write_args(table_name),
            }
            .send(self.store, &self.cancel, &span)
            .await?;
            inserted += 1;
        }

        self.publisher
            .publish(format!("seed complete with {inserted} items inserted"));
        tracing::info!(parent: &span, items = inserted, "seed complete");
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::attribute::AttrValue;
    use crate::error::Error;
    use crate::testing::{MockStore, RecordingPublisher, string_item};

    use rstest::rstest;
    use tokio_util::sync::CancellationToken;
    use tracing::Span;

    #[tokio::test]
    async fn test_seed() {
        let store = MockStore::default();
        let publisher = RecordingPublisher::default();
        let bulk = Bulk::new(&store, &publisher, CancellationToken::new(), Span::none());
        let mut reader: &[u8] = br#"[{"pk":"a","sk":"b"}]"#;

        let inserted = bulk
            .seed("t", &mut reader, &SeedOptions::default())
            .await
            .unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(
            store.puts(),
            vec![("t".to_string(), string_item(&[("pk", "a"), ("sk", "b")]))]
        );
        assert_eq!(
            publisher.messages(),
            vec![
                "putting items to table t".to_string(),
                "seed complete with 1 items inserted".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_seed_raw_input() {
        let store = MockStore::default();
        let publisher = RecordingPublisher::default();
        let bulk = Bulk::new(&store, &publisher, CancellationToken::new(), Span::none());
        let mut reader: &[u8] = br#"[{"pk":{"S":"a"},"tags":{"SS":["x","y"]}}]"#;

        let inserted = bulk
            .seed("t", &mut reader, &SeedOptions { raw_input: true })
            .await
            .unwrap();

        assert_eq!(inserted, 1);
        let puts = store.puts();
        assert_eq!(
            puts[0].1.get("tags"),
            Some(&AttrValue::StringSet(vec!["x".to_string(), "y".to_string()]))
        );
    }

    #[tokio::test]
    async fn test_seed_dry_run() {
        let store = MockStore::default();
        let publisher = RecordingPublisher::default();
        let bulk = Bulk::new(&store, &publisher, CancellationToken::new(), Span::none())
            .with_dry_run(true);
        let mut reader: &[u8] = br#"[{"pk":"a"},{"pk":"b"}]"#;

        let inserted = bulk
            .seed("t", &mut reader, &SeedOptions::default())
            .await
            .unwrap();

        assert_eq!(inserted, 2);
        assert!(store.puts().is_empty());
    }

    #[rstest]
    #[case::not_json(b"not json".as_slice())]
    #[case::not_array(br#"{"pk":"a"}"#.as_slice())]
    #[tokio::test]
    async fn test_seed_invalid_input(#[case] input: &[u8]) {
        let store = MockStore::default();
        let publisher = RecordingPublisher::default();
        let bulk = Bulk::new(&store, &publisher, CancellationToken::new(), Span::none());
        let mut reader = input;

        let result = bulk.seed("t", &mut reader, &SeedOptions::default()).await;

        assert!(matches!(result, Err(Error::Json(_))));
        assert!(store.puts().is_empty());
    }

    #[tokio::test]
    async fn test_seed_stops_on_store_error() {
        let store = MockStore::default();
        store.push_put_response(Err(Error::store("put item", "boom")));
        let publisher = RecordingPublisher::default();
        let bulk = Bulk::new(&store, &publisher, CancellationToken::new(), Span::none());
        let mut reader: &[u8] = br#"[{"pk":"a"},{"pk":"b"}]"#;

        let result = bulk.seed("t", &mut reader, &SeedOptions::default()).await;

        assert!(matches!(result, Err(Error::Store { .. })));
        assert_eq!(store.puts().len(), 1);
    }

    #[tokio::test]
    async fn test_seed_cancelled() {
        let store = MockStore::default();
        let publisher = RecordingPublisher::default();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let bulk = Bulk::new(&store, &publisher, cancel, Span::none());
        let mut reader: &[u8] = br#"[{"pk":"a"}]"#;

        let result = bulk.seed("t", &mut reader, &SeedOptions::default()).await;

        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(store.puts().is_empty());
    }
}
