use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// One heartbeat from the ticker. `seq` starts at 1 and never repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub seq: u64,
}

/// A cancellable periodic tick source.
///
/// The ticker only tells the caller that time passed; all elapsed-time math is
/// derived from session timestamps, so a missed or late tick never skews
/// anything. Late ticks are skipped rather than bursted.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a ticker emitting on `period`. Dropping the receiver stops the
    /// task on its next tick.
    #[must_use]
    pub fn spawn(period: Duration) -> (Self, mpsc::Receiver<Tick>) {
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first tick completes immediately; the loop starts one period in
            interval.tick().await;
            let mut seq = 0u64;
            loop {
                interval.tick().await;
                seq += 1;
                if tx.send(Tick { seq }).await.is_err() {
                    debug!(seq, "ticker receiver dropped, stopping");
                    break;
                }
            }
        });
        (Self { handle }, rx)
    }

    /// Stop the ticker immediately.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
