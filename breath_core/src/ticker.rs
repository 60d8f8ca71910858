//! Cancellable fixed-interval tick source.
//!
//! The ticker runs its callback on a dedicated thread. The thread waits on a
//! cancel channel with a timeout equal to the interval, so `cancel` wakes it
//! immediately and then joins it: once `cancel` returns, the callback from
//! that schedule can never run again.

use crate::Result;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

struct Running {
    cancel_tx: Sender<()>,
    thread: JoinHandle<()>,
}

/// A 1 Hz (by default) time source with synchronous cancellation
pub struct Ticker {
    interval: Duration,
    running: Option<Running>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("interval", &self.interval)
            .field("running", &self.running.is_some())
            .finish()
    }
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Run `on_tick` once per interval until cancelled.
    ///
    /// Any previous schedule is cancelled first.
    pub fn begin<F>(&mut self, mut on_tick: F) -> Result<()>
    where
        F: FnMut() + Send + 'static,
    {
        self.cancel();

        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let interval = self.interval;

        let thread = thread::Builder::new()
            .name("breath-ticker".into())
            .spawn(move || loop {
                match cancel_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => on_tick(),
                    // Explicit cancel or the handle was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        tracing::debug!("Ticker started ({:?} interval)", interval);
        self.running = Some(Running { cancel_tx, thread });
        Ok(())
    }

    /// Stop future ticks and wait for the tick thread to exit.
    ///
    /// Safe to call repeatedly or when nothing is running.
    pub fn cancel(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        let _ = running.cancel_tx.send(());
        if running.thread.join().is_err() {
            tracing::error!("Ticker thread panicked");
        } else {
            tracing::debug!("Ticker cancelled");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_ticker(interval_ms: u64) -> (Ticker, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let mut ticker = Ticker::new(Duration::from_millis(interval_ms));
        let counter = Arc::clone(&count);
        ticker
            .begin(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        (ticker, count)
    }

    #[test]
    fn test_default_interval_is_one_second() {
        assert_eq!(Ticker::default().interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_ticks_fire() {
        let (mut ticker, count) = counting_ticker(5);
        assert!(ticker.is_running());

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            while count.load(Ordering::SeqCst) < 3 {
                thread::sleep(Duration::from_millis(1));
            }
            let _ = tx.send(());
        });
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());

        ticker.cancel();
        assert!(!ticker.is_running());
    }

    #[test]
    fn test_no_tick_after_cancel() {
        let (mut ticker, count) = counting_ticker(2);
        thread::sleep(Duration::from_millis(20));

        ticker.cancel();
        let after_cancel = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut ticker = Ticker::new(Duration::from_millis(10));
        ticker.cancel();

        ticker.begin(|| {}).unwrap();
        ticker.cancel();
        ticker.cancel();
        assert!(!ticker.is_running());
    }

    #[test]
    fn test_cancel_does_not_wait_for_interval() {
        let mut ticker = Ticker::new(Duration::from_secs(60));
        ticker.begin(|| {}).unwrap();

        let started = std::time::Instant::now();
        ticker.cancel();
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_begin_replaces_previous_schedule() {
        let (mut ticker, first) = counting_ticker(2);
        let second = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&second);
        ticker
            .begin(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        let frozen = first.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        ticker.cancel();

        assert_eq!(first.load(Ordering::SeqCst), frozen);
        assert!(second.load(Ordering::SeqCst) > 0);
    }
}
