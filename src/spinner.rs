//! Terminal spinner showing the latest progress message on stderr.

use crate::emitter::Messages;

use std::io::Write;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const FRAME_DURATION: Duration = Duration::from_millis(150);

const FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Background task redrawing a spinner line until stopped.
pub struct Spinner {
    handle: JoinHandle<()>,
    stop: CancellationToken,
}

impl Spinner {
    /// Spawn the spinner on the current runtime, showing `message` until another arrives.
    pub fn start(messages: Messages, message: impl Into<String>) -> Self {
        let stop = CancellationToken::new();
        let handle = tokio::spawn(run(messages, message.into(), stop.clone()));
        Self { handle, stop }
    }

    /// Stop the spinner, clear its line and print `message` if given.
    pub async fn stop(self, message: Option<&str>) {
        self.stop.cancel();
        if let Err(error) = self.handle.await {
            tracing::debug!(%error, "spinner task failed");
        }
        if let Some(message) = message {
            eprintln!("{message}");
        }
    }
}

async fn run(mut messages: Messages, mut message: String, stop: CancellationToken) {
    let mut interval = tokio::time::interval(FRAME_DURATION);
    for frame in FRAMES.iter().cycle() {
        tokio::select! {
            _ = stop.cancelled() => break,
            _ = interval.tick() => {}
        }
        if let Some(latest) = messages.latest() {
            message = latest;
        }
        draw(&format!("{frame}  {message}"));
    }
    messages.close();
    draw("");
}

fn draw(line: &str) {
    let mut stderr = std::io::stderr().lock();
    // a broken terminal only loses the spinner
    let _ = write!(stderr, "\r\x1b[2K{line}");
    let _ = stderr.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::{self, Publisher};

    #[tokio::test]
    async fn test_stop_closes_queue() {
        let (emitter, messages) = emitter::channel(4);
        let spinner = Spinner::start(messages, "starting");
        emitter.publish("working".to_string());
        tokio::time::sleep(FRAME_DURATION * 2).await;
        spinner.stop(None).await;
        assert!(emitter.is_closed());
    }
}
