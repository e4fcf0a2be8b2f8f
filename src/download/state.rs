//! Per-item outcomes and the run summary.

use tokio::time::Instant;

/// Why an item was skipped without attempting a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The destination file already exists from a previous run.
    AlreadyExists,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::AlreadyExists => write!(f, "already exists"),
        }
    }
}

/// Final disposition of one catalog item. Produced exactly once per item
/// per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Skipped(SkipReason),
    Succeeded,
    Failed { attempts: u32 },
}

/// What one attempt observed on disk. Superseded by the next attempt or by
/// the final [`DownloadOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransferState {
    /// No filesystem evidence the transfer ever started.
    Unstarted,
    /// Evidence appeared; the completion clock runs from this instant.
    Pending(Instant),
    /// Final file present, in-progress sibling gone.
    Complete,
    /// Evidence appeared but completion never did within the bound.
    Timeout,
}

/// Aggregated dispositions for one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: Vec<String>,
    /// Set when a fatal session error stopped the batch early. Dispositions
    /// recorded up to that point remain valid and are still reported.
    pub aborted: Option<String>,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Record one item's disposition.
    pub fn record(&mut self, display_name: &str, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Succeeded => self.succeeded += 1,
            DownloadOutcome::Skipped(_) => self.skipped += 1,
            DownloadOutcome::Failed { .. } => self.failed.push(display_name.to_string()),
        }
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tallies_each_disposition() {
        let mut summary = RunSummary::new(3);
        summary.record("a.pdf", &DownloadOutcome::Succeeded);
        summary.record("b.pdf", &DownloadOutcome::Skipped(SkipReason::AlreadyExists));
        summary.record("c.pdf", &DownloadOutcome::Failed { attempts: 3 });

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, vec!["c.pdf".to_string()]);
        assert!(summary.aborted.is_none());
    }
}
