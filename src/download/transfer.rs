//! Per-item transfer state machine.
//!
//! A click on a download control produces no observable navigation event;
//! the only evidence of progress is what the browser's download manager
//! writes to disk. The wait is split into two phases, begin and complete,
//! because a click can fail silently and failing fast on "never started"
//! recovers far sooner than sitting out the full transfer timeout.

use std::path::Path;
use std::time::Duration;

use rand::Rng;
use tokio::time::{sleep, Instant};

use crate::catalog::Item;
use crate::config::DownloadTuning;
use crate::download::state::{DownloadOutcome, SkipReason, TransferState};
use crate::error::{Error, Result};
use crate::fs;
use crate::output::log::RunLog;
use crate::session::controls::{self, NameMatch, ProbeOpts};
use crate::session::PageSession;

/// Prioritized accessible names for the download control.
const DOWNLOAD_TIERS: &[NameMatch] = &[
    NameMatch::Exact("Download"),
    NameMatch::Exact("download"),
    NameMatch::Substring("download"),
];

/// Drives one item at a time to a final disposition.
pub struct Transfer<'a> {
    session: &'a dyn PageSession,
    tuning: &'a DownloadTuning,
    log: &'a RunLog,
}

impl<'a> Transfer<'a> {
    pub fn new(session: &'a dyn PageSession, tuning: &'a DownloadTuning, log: &'a RunLog) -> Self {
        Self {
            session,
            tuning,
            log,
        }
    }

    /// Acquire `item` into `dest`.
    ///
    /// Returns exactly one outcome per invocation. Transient UI failures
    /// consume attempts; only a fatal session error propagates. A `dest`
    /// already on disk short-circuits to `Skipped`, which is what makes
    /// whole re-runs idempotent.
    pub async fn acquire(&self, item: &Item, dest: &Path) -> Result<DownloadOutcome> {
        if dest.exists() {
            return Ok(DownloadOutcome::Skipped(SkipReason::AlreadyExists));
        }

        let max = self.tuning.max_attempts;
        for attempt in 1..=max {
            match self.attempt(item, dest).await {
                Ok(TransferState::Complete) => {
                    self.log.event(&format!("downloaded: {}", item.display_name));
                    return Ok(DownloadOutcome::Succeeded);
                }
                Ok(state) => {
                    tracing::warn!(
                        "attempt {attempt}/{max}: {} for '{}'",
                        describe(state),
                        item.display_name
                    );
                    self.log.event(&format!(
                        "attempt {attempt}/{max} {}: {}",
                        describe(state),
                        item.display_name
                    ));
                }
                Err(e) if e.is_fatal_session() => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "attempt {attempt}/{max} failed for '{}': {e}",
                        item.display_name
                    );
                    self.log
                        .event(&format!("attempt {attempt}/{max} failed: {e}"));
                }
            }
            if attempt < max {
                self.recover().await;
            }
        }

        self.log.event(&format!(
            "failed after {max} attempts: {}",
            item.display_name
        ));
        Ok(DownloadOutcome::Failed { attempts: max })
    }

    /// One attempt: navigate, activate the control, classify disk evidence.
    ///
    /// Every step re-locates its state from scratch, so repeating an
    /// attempt is always safe.
    async fn attempt(&self, item: &Item, dest: &Path) -> Result<TransferState> {
        self.session.navigate(&item.source_url).await?;

        let probe = ProbeOpts {
            timeout: self.tuning.control_probe_timeout(),
            poll_interval: self.tuning.poll_interval(),
        };
        let Some(control) = controls::locate_control(self.session, DOWNLOAD_TIERS, &probe).await?
        else {
            return Err(Error::TransientUi(format!(
                "no download control found for '{}'",
                item.display_name
            )));
        };

        controls::activate(control.as_ref()).await?;

        match self.observe_begin(dest).await {
            TransferState::Pending(started) => {
                self.log
                    .event(&format!("transfer began: {}", item.display_name));
                Ok(self.observe_completion(dest, started).await)
            }
            state => Ok(state),
        }
    }

    /// Poll for transfer-begin evidence: the final path or its in-progress
    /// sibling appearing within the begin bound.
    async fn observe_begin(&self, dest: &Path) -> TransferState {
        let deadline = Instant::now() + self.tuning.begin_timeout();
        loop {
            if fs::transfer_begun(dest) {
                return TransferState::Pending(Instant::now());
            }
            if Instant::now() >= deadline {
                return TransferState::Unstarted;
            }
            sleep(self.tuning.poll_interval()).await;
        }
    }

    /// Poll until the in-progress sibling disappears while the final path
    /// exists, which is the download manager's atomic rename on completion.
    async fn observe_completion(&self, dest: &Path, started: Instant) -> TransferState {
        let deadline = started + self.tuning.complete_timeout();
        loop {
            if fs::transfer_complete(dest) {
                return TransferState::Complete;
            }
            if Instant::now() >= deadline {
                return TransferState::Timeout;
            }
            sleep(self.tuning.poll_interval()).await;
        }
    }

    /// Between attempts: refresh the view and back off with a little jitter.
    async fn recover(&self) {
        if let Err(e) = self.session.refresh().await {
            tracing::debug!("refresh before retry failed: {e}");
        }
        let backoff = self.tuning.retry_backoff();
        let jitter_ms = (backoff.as_millis() as u64) / 4;
        let jitter = if jitter_ms > 0 {
            rand::thread_rng().gen_range(0..=jitter_ms)
        } else {
            0
        };
        sleep(backoff + Duration::from_millis(jitter)).await;
    }
}

fn describe(state: TransferState) -> &'static str {
    match state {
        TransferState::Unstarted => "transfer never started",
        TransferState::Timeout => "transfer stalled before completing",
        TransferState::Pending(_) => "transfer pending",
        TransferState::Complete => "transfer complete",
    }
}
