//! Progress reporting for pipeline runs
//!
//! The pipeline calls [`ProgressReporter::report`] once per finished query,
//! whether or not the query produced rows.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

/// Fraction of work done, in `[0, 1]`
///
/// A run with no work is complete.
pub fn progress_fraction(completed: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        (completed.min(total) as f64) / (total as f64)
    }
}

/// Observer notified after each completed query
pub trait ProgressReporter: Send + Sync {
    /// `completed` out of `total` queries are done
    fn report(&self, completed: usize, total: usize);
}

/// Discards progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _completed: usize, _total: usize) {}
}

/// Logs progress through `tracing`, at most once per `step` percent
#[derive(Debug, Clone, Copy)]
pub struct LogProgress {
    step: usize,
}

impl LogProgress {
    /// Log every `step` percent (clamped to 1..=100)
    pub fn every_percent(step: usize) -> Self {
        Self {
            step: step.clamp(1, 100),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::every_percent(10)
    }
}

impl ProgressReporter for LogProgress {
    fn report(&self, completed: usize, total: usize) {
        let percent = (progress_fraction(completed, total) * 100.0).floor() as usize;
        let previous = if completed == 0 {
            None
        } else {
            Some((progress_fraction(completed - 1, total) * 100.0).floor() as usize)
        };

        let crossed = match previous {
            None => true,
            Some(prev) => percent / self.step != prev / self.step,
        };
        if crossed || completed >= total {
            info!(completed, total, percent, "expansion progress");
        }
    }
}

/// Progress snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunProgress {
    /// Queries completed
    pub completed: usize,
    /// Total queries in the run
    pub total: usize,
}

impl RunProgress {
    /// Fraction complete in `[0, 1]`
    pub fn fraction(&self) -> f64 {
        progress_fraction(self.completed, self.total)
    }

    /// Percentage complete in `[0, 100]`
    pub fn percentage(&self) -> f64 {
        self.fraction() * 100.0
    }
}

/// Forwards snapshots over a tokio channel
///
/// Snapshots are dropped when the channel is full or closed; progress never
/// blocks the pipeline.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    tx: mpsc::Sender<RunProgress>,
}

impl ChannelProgress {
    /// Wrap a sender
    pub fn new(tx: mpsc::Sender<RunProgress>) -> Self {
        Self { tx }
    }

    /// Create a reporter and its receiving end
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<RunProgress>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

impl ProgressReporter for ChannelProgress {
    fn report(&self, completed: usize, total: usize) {
        let _ = self.tx.try_send(RunProgress { completed, total });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_guards_zero_total() {
        assert_eq!(progress_fraction(0, 0), 1.0);
        assert_eq!(progress_fraction(5, 0), 1.0);
    }

    #[test]
    fn test_fraction_reaches_exactly_one() {
        let total = 7;
        let fractions: Vec<f64> = (1..=total).map(|c| progress_fraction(c, total)).collect();
        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*fractions.last().unwrap(), 1.0);
    }

    #[test]
    fn test_fraction_is_clamped() {
        assert_eq!(progress_fraction(12, 10), 1.0);
    }

    #[test]
    fn test_run_progress_percentage() {
        let progress = RunProgress {
            completed: 50,
            total: 200,
        };
        assert_eq!(progress.percentage(), 25.0);
    }

    #[tokio::test]
    async fn test_channel_progress_delivers_snapshots() {
        let (reporter, mut rx) = ChannelProgress::channel(8);
        reporter.report(1, 2);
        reporter.report(2, 2);

        assert_eq!(rx.recv().await.unwrap().completed, 1);
        let last = rx.recv().await.unwrap();
        assert_eq!(last.fraction(), 1.0);
    }

    #[test]
    fn test_channel_progress_never_blocks_when_full() {
        let (reporter, _rx) = ChannelProgress::channel(1);
        reporter.report(1, 3);
        reporter.report(2, 3);
        reporter.report(3, 3);
    }

    #[test]
    fn test_log_progress_does_not_panic() {
        let reporter = LogProgress::every_percent(25);
        for completed in 0..=4 {
            reporter.report(completed, 4);
        }
        LogProgress::default().report(0, 0);
    }
}
