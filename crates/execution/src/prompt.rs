//! Status prompt refresher.
//!
//! A background task polls wallet and daemon heights on a fixed interval and
//! rewrites the interactive prompt. The prompt is shared with the foreground
//! command loop, so every write goes through one async mutex and the lock is
//! held only for the write itself.

use cldex_data::HeightSource;
use cldex_domain::enums::Network;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info};

/// How often the prompt is rewritten.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// `"<wallet>/<daemon> <NETWORK> > "`.
pub fn status_line(wallet_height: u64, daemon_height: u64, network: Network) -> String {
    format!("{wallet_height}/{daemon_height} {network} > ")
}

/// Where the prompt text ends up.
pub trait PromptSink: Send {
    fn set_prompt(&mut self, prompt: &str);
}

/// Redraws the prompt in place on stdout.
#[derive(Debug, Default)]
pub struct TerminalSink {
    current: String,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PromptSink for TerminalSink {
    fn set_prompt(&mut self, prompt: &str) {
        if self.current == prompt {
            return;
        }
        self.current = prompt.to_string();
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = write!(stdout, "\r{prompt}").and_then(|()| stdout.flush()) {
            debug!(error = %e, "Prompt redraw failed");
        }
    }
}

/// Keeps every prompt it is given.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub prompts: Vec<String>,
}

impl RecordingSink {
    pub fn last(&self) -> Option<&str> {
        self.prompts.last().map(String::as_str)
    }
}

impl PromptSink for RecordingSink {
    fn set_prompt(&mut self, prompt: &str) {
        self.prompts.push(prompt.to_string());
    }
}

/// Periodically rewrites the status prompt from polled heights.
pub struct PromptRefresher<H, K> {
    heights: Arc<H>,
    sink: Arc<Mutex<K>>,
    network: Network,
    interval: Duration,
    /// Running flag.
    running: Arc<AtomicBool>,
}

impl<H, K> PromptRefresher<H, K>
where
    H: HeightSource + Send + Sync + 'static,
    K: PromptSink + 'static,
{
    pub fn new(heights: Arc<H>, sink: Arc<Mutex<K>>, network: Network) -> Self {
        Self {
            heights,
            sink,
            network,
            interval: DEFAULT_REFRESH_INTERVAL,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// The shared sink. The foreground loop holds its lock only while it
    /// writes the prompt and releases it before blocking on input.
    pub fn sink(&self) -> Arc<Mutex<K>> {
        Arc::clone(&self.sink)
    }

    /// Polls heights once and writes the prompt.
    ///
    /// Heights are read before the lock is taken; an unavailable height
    /// shows as zero.
    pub async fn refresh_once(&self) -> String {
        let wallet = self.heights.wallet_height().unwrap_or(0);
        let daemon = self.heights.daemon_height().unwrap_or(0);
        let line = status_line(wallet, daemon, self.network);

        let mut sink = self.sink.lock().await;
        sink.set_prompt(&line);
        line
    }

    /// Starts the refresh loop on the runtime. It runs until
    /// [`stop`](Self::stop) is called.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);
        tokio::spawn(async move { self.refresh_loop().await })
    }

    async fn refresh_loop(&self) {
        info!(interval_ms = self.interval.as_millis() as u64, "Starting prompt refresher");
        let mut ticker = interval(self.interval);

        while self.running.load(Ordering::SeqCst) {
            ticker.tick().await;
            if !self.running.load(Ordering::SeqCst) {
                break;
            }
            self.refresh_once().await;
        }

        info!("Prompt refresher stopped");
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cldex_data::SnapshotSource;

    fn refresher(
        source: SnapshotSource,
        network: Network,
    ) -> PromptRefresher<SnapshotSource, RecordingSink> {
        PromptRefresher::new(
            Arc::new(source),
            Arc::new(Mutex::new(RecordingSink::default())),
            network,
        )
    }

    #[test]
    fn test_status_line() {
        assert_eq!(status_line(10, 12, Network::Mainnet), "10/12 MAINNET > ");
        assert_eq!(status_line(0, 0, Network::Testnet), "0/0 TESTNET > ");
    }

    #[tokio::test]
    async fn test_refresh_once() {
        let refresher = refresher(SnapshotSource::new().with_heights(12, 10), Network::Testnet);

        let line = refresher.refresh_once().await;
        assert_eq!(line, "10/12 TESTNET > ");
        assert_eq!(refresher.sink().lock().await.last(), Some("10/12 TESTNET > "));
    }

    #[tokio::test]
    async fn test_missing_heights_show_zero() {
        let refresher = refresher(SnapshotSource::new(), Network::Mainnet);
        assert_eq!(refresher.refresh_once().await, "0/0 MAINNET > ");
    }

    #[tokio::test]
    async fn test_refresh_waits_for_foreground_lock() {
        let refresher = Arc::new(refresher(
            SnapshotSource::new().with_heights(5, 4),
            Network::Mainnet,
        ));
        let sink = refresher.sink();
        let guard = sink.lock().await;

        let background = Arc::clone(&refresher);
        let task = tokio::spawn(async move { background.refresh_once().await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(guard.prompts.is_empty());
        drop(guard);

        assert_eq!(task.await.unwrap(), "4/5 MAINNET > ");
        assert_eq!(sink.lock().await.prompts.len(), 1);
    }

    #[tokio::test]
    async fn test_spawn_and_stop() {
        let refresher = Arc::new(
            refresher(SnapshotSource::new().with_heights(2, 1), Network::Mainnet)
                .with_interval(Duration::from_millis(20)),
        );
        assert!(!refresher.is_running());

        let handle = Arc::clone(&refresher).spawn();
        assert!(refresher.is_running());
        tokio::time::sleep(Duration::from_millis(150)).await;
        refresher.stop();
        handle.await.unwrap();

        assert!(!refresher.is_running());
        let sink = refresher.sink();
        let sink = sink.lock().await;
        assert!(sink.prompts.len() >= 2);
        assert!(sink.prompts.iter().all(|p| p == "1/2 MAINNET > "));
    }
}
