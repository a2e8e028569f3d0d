//! Progress messages published by the bulk operations.
//!
//! Publishing never blocks: when the queue is full the newest message is dropped.

use crate::error::{Error, Result};

use tokio::sync::mpsc;

/// Queue size used by the command-line binary.
pub const DEFAULT_CAPACITY: usize = 16;

/// Something progress messages can be sent to.
pub trait Publisher: Send + Sync {
    /// Publish a progress message.
    fn publish(&self, message: String);
}

/// Create a bounded message queue holding up to `capacity` messages.
///
/// ```rust
/// use dynamodb_bulk::emitter::{self, Publisher};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (emitter, mut messages) = emitter::channel(4);
/// emitter.publish("scanned 25 items".to_string());
/// assert_eq!(messages.get_message().await.unwrap(), "scanned 25 items");
/// # }
/// ```
pub fn channel(capacity: usize) -> (Emitter, Messages) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (Emitter { sender }, Messages { receiver })
}

/// Producer half of the queue.
#[derive(Clone, Debug)]
pub struct Emitter {
    sender: mpsc::Sender<String>,
}

impl Emitter {
    /// Whether the consumer has closed the queue or gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Publisher for Emitter {
    fn publish(&self, message: String) {
        // full or closed, the message is dropped
        let _ = self.sender.try_send(message);
    }
}

/// Consumer half of the queue.
#[derive(Debug)]
pub struct Messages {
    receiver: mpsc::Receiver<String>,
}

impl Messages {
    /// Wait for the next message.
    ///
    /// Fails with [`Error::ChannelClosed`] once the queue is closed and drained.
    pub async fn get_message(&mut self) -> Result<String> {
        self.receiver.recv().await.ok_or(Error::ChannelClosed)
    }

    /// Drain every queued message and return the most recent one, without waiting.
    pub fn latest(&mut self) -> Option<String> {
        let mut latest = None;
        while let Ok(message) = self.receiver.try_recv() {
            latest = Some(message);
        }
        latest
    }

    /// Stop accepting messages. Already queued messages can still be read.
    pub fn close(&mut self) {
        self.receiver.close();
    }
}
