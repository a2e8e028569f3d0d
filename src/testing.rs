//! In-memory store and publisher used by unit tests.

use crate::common::attribute::{AttrValue, Item};
use crate::emitter::Publisher;
use crate::error::Result;
use crate::read::scan::{ScanInput, ScanPage};
use crate::store::Store;
use crate::write::batch_write_item::WriteRequest;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

pub(crate) fn string_item(pairs: &[(&str, &str)]) -> Item {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), AttrValue::String(value.to_string())))
        .collect()
}

/// Replays scripted responses and records every call.
///
/// Without scripted responses, scans return one empty final page and writes succeed.
#[derive(Default)]
pub(crate) struct MockStore {
    batch_responses: Mutex<VecDeque<Result<Vec<WriteRequest>>>>,
    batches: Mutex<Vec<Vec<WriteRequest>>>,
    pages: Mutex<VecDeque<Result<ScanPage>>>,
    put_responses: Mutex<VecDeque<Result<()>>>,
    puts: Mutex<Vec<(String, Item)>>,
    scan_inputs: Mutex<Vec<ScanInput>>,
}

impl MockStore {
    pub(crate) fn push_page(&self, page: Result<ScanPage>) {
        self.pages.lock().unwrap().push_back(page);
    }

    pub(crate) fn push_batch_response(&self, response: Result<Vec<WriteRequest>>) {
        self.batch_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_put_response(&self, response: Result<()>) {
        self.put_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn scan_inputs(&self) -> Vec<ScanInput> {
        self.scan_inputs.lock().unwrap().clone()
    }

    pub(crate) fn batches(&self) -> Vec<Vec<WriteRequest>> {
        self.batches.lock().unwrap().clone()
    }

    pub(crate) fn puts(&self) -> Vec<(String, Item)> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Store for MockStore {
    async fn scan(&self, input: ScanInput) -> Result<ScanPage> {
        self.scan_inputs.lock().unwrap().push(input);
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ScanPage::default()))
    }

    async fn batch_write(
        &self,
        _table_name: &str,
        requests: Vec<WriteRequest>,
    ) -> Result<Vec<WriteRequest>> {
        self.batches.lock().unwrap().push(requests);
        self.batch_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn put_item(&self, table_name: &str, item: Item) -> Result<()> {
        self.puts
            .lock()
            .unwrap()
            .push((table_name.to_string(), item));
        self.put_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

/// Keeps every published message.
#[derive(Default)]
pub(crate) struct RecordingPublisher {
    messages: Mutex<Vec<String>>,
}

impl RecordingPublisher {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&self, message: String) {
        self.messages.lock().unwrap().push(message);
    }
}
