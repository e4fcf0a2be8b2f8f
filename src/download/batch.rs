//! Batch download orchestration.

use crate::catalog::{Catalog, Item};
use crate::config::Config;
use crate::download::state::{DownloadOutcome, RunSummary};
use crate::download::transfer::Transfer;
use crate::error::Result;
use crate::output::console::{print_error, print_info, print_success, print_warning};
use crate::output::log::RunLog;
use crate::output::progress::create_spinner;
use crate::session::PageSession;

/// Iterates the catalog in discovery order, one item at a time, and
/// accumulates the run summary.
///
/// One item's outcome never affects another's processing. Only a fatal
/// session error stops the batch, and the dispositions recorded up to that
/// point survive in the summary.
pub struct Downloader<'a> {
    session: &'a dyn PageSession,
    config: &'a Config,
    log: &'a RunLog,
}

impl<'a> Downloader<'a> {
    pub fn new(session: &'a dyn PageSession, config: &'a Config, log: &'a RunLog) -> Self {
        Self {
            session,
            config,
            log,
        }
    }

    /// Download every catalog item that is not already on disk.
    pub async fn run(&self, catalog: &Catalog) -> Result<RunSummary> {
        let out_dir = &self.config.options.output_directory;
        crate::fs::ensure_dir(out_dir)?;

        let mut summary = RunSummary::new(catalog.len());
        let transfer = Transfer::new(self.session, &self.config.download, self.log);

        for (index, item) in catalog.iter().enumerate() {
            let dest = out_dir.join(&item.display_name);

            let spinner = self.config.options.show_downloads.then(|| {
                create_spinner(&format!(
                    "[{}/{}] {}",
                    index + 1,
                    catalog.len(),
                    item.display_name
                ))
            });

            let result = transfer.acquire(item, &dest).await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }

            match result {
                Ok(outcome) => {
                    self.report(item, &outcome);
                    summary.record(&item.display_name, &outcome);
                }
                Err(e) => {
                    // Only fatal session errors escape acquire(). Stop the
                    // batch but keep what was already recorded.
                    print_error(&format!(
                        "browser session lost at '{}': {e}",
                        item.display_name
                    ));
                    self.log.event(&format!("batch aborted: {e}"));
                    summary.aborted = Some(e.to_string());
                    break;
                }
            }
        }

        Ok(summary)
    }

    fn report(&self, item: &Item, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Succeeded => {
                if self.config.options.show_downloads {
                    print_success(&format!("Downloaded: {}", item.display_name));
                }
            }
            DownloadOutcome::Skipped(reason) => {
                self.log
                    .event(&format!("skipped ({reason}): {}", item.display_name));
                if self.config.options.show_skipped {
                    print_info(&format!("Skipped ({reason}): {}", item.display_name));
                }
            }
            DownloadOutcome::Failed { attempts } => {
                print_warning(&format!(
                    "Failed after {attempts} attempts: {}",
                    item.display_name
                ));
            }
        }
    }
}
