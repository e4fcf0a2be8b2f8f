//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Shared-folder downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "sharefetch",
    version,
    about = "Download every file from a browser-rendered shared folder",
    long_about = "Enumerates a paginated, script-rendered shared-folder listing through a real \
                  browser session and downloads each file via the browser's own download \
                  manager.\n\nRe-running against the same output directory only fetches files \
                  that are not on disk yet."
)]
pub struct Args {
    /// Address of the shared-folder listing.
    #[arg(short, long, env = "SHAREFETCH_URL")]
    pub share: Option<String>,

    /// Directory downloads land in.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Run the browser without a visible window.
    #[arg(long)]
    pub headless: bool,

    /// CSS selector matching item links in the listing.
    #[arg(long)]
    pub selector: Option<String>,

    /// Crawl and print the catalog without downloading anything.
    #[arg(long)]
    pub list_only: bool,

    /// Print the enumerated catalog after the crawl.
    #[arg(long)]
    pub list: bool,

    /// Attempts per item before giving up.
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "sharefetch.toml")]
    pub config: PathBuf,

    /// Hide per-item progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(share) = self.share {
            config.share.url = Some(share);
        }

        if let Some(out) = self.out {
            config.options.output_directory = out;
        }

        if let Some(selector) = self.selector {
            config.options.link_selector = selector;
        }

        if let Some(attempts) = self.max_attempts {
            config.download.max_attempts = attempts;
        }

        // Boolean flags only override when set.
        if self.headless {
            config.options.headless = true;
        }

        if self.list_only {
            config.options.list_only = true;
        }

        if self.list {
            config.options.list_items = true;
        }

        if self.quiet {
            config.options.show_downloads = false;
            config.options.show_skipped = false;
        }
    }
}
