//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub share: ShareConfig,

    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub download: DownloadTuning,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// The shared-folder address, or an error when none was provided.
    pub fn share_url(&self) -> Result<&str> {
        self.share
            .url
            .as_deref()
            .ok_or_else(|| Error::MissingConfig("share.url (pass --share <url>)".to_string()))
    }
}

/// Share target configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Address of the shared-folder listing.
    #[serde(default)]
    pub url: Option<String>,
}

/// General behavior options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Directory downloads land in.
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,

    /// Run the browser without a visible window.
    #[serde(default)]
    pub headless: bool,

    /// CSS selector matching downloadable-item links in the listing.
    #[serde(default = "default_link_selector")]
    pub link_selector: String,

    /// Stop after the crawl and print the catalog instead of downloading.
    #[serde(default)]
    pub list_only: bool,

    /// Print the enumerated catalog after the crawl.
    #[serde(default)]
    pub list_items: bool,

    /// Whether to show per-item progress.
    #[serde(default = "default_true")]
    pub show_downloads: bool,

    /// Whether to mention skipped items.
    #[serde(default = "default_true")]
    pub show_skipped: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            headless: false,
            link_selector: default_link_selector(),
            list_only: false,
            list_items: false,
            show_downloads: true,
            show_skipped: true,
        }
    }
}

/// Crawl-phase wait tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Rounds waiting for the first matching element after navigation.
    #[serde(default = "default_initial_render_rounds")]
    pub initial_render_rounds: u32,

    #[serde(default = "default_initial_render_poll_ms")]
    pub initial_render_poll_ms: u64,

    /// Rounds in one stability wait.
    #[serde(default = "default_stability_rounds")]
    pub stability_rounds: u32,

    /// Consecutive equal item counts required to declare the view settled.
    #[serde(default = "default_stability_threshold")]
    pub stability_threshold: u32,

    #[serde(default = "default_stability_poll_ms")]
    pub stability_poll_ms: u64,

    /// Scroll-to-bottom rounds forcing lazy content in.
    #[serde(default = "default_scroll_rounds")]
    pub scroll_rounds: u32,

    #[serde(default = "default_scroll_poll_ms")]
    pub scroll_poll_ms: u64,

    /// Bound on waiting for an activated advance to change the listing.
    #[serde(default = "default_advance_confirm_secs")]
    pub advance_confirm_secs: u64,

    #[serde(default = "default_advance_poll_ms")]
    pub advance_poll_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            initial_render_rounds: default_initial_render_rounds(),
            initial_render_poll_ms: default_initial_render_poll_ms(),
            stability_rounds: default_stability_rounds(),
            stability_threshold: default_stability_threshold(),
            stability_poll_ms: default_stability_poll_ms(),
            scroll_rounds: default_scroll_rounds(),
            scroll_poll_ms: default_scroll_poll_ms(),
            advance_confirm_secs: default_advance_confirm_secs(),
            advance_poll_ms: default_advance_poll_ms(),
        }
    }
}

impl TimingConfig {
    pub fn advance_confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.advance_confirm_secs)
    }

    pub fn advance_poll(&self) -> Duration {
        Duration::from_millis(self.advance_poll_ms)
    }
}

/// Download-phase retry and wait tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadTuning {
    /// Attempts per item before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Bound on each control-lookup probe tier.
    #[serde(default = "default_control_probe_secs")]
    pub control_probe_secs: u64,

    /// Bound on waiting for transfer-begin evidence after a click.
    #[serde(default = "default_begin_timeout_secs")]
    pub begin_timeout_secs: u64,

    /// Bound on waiting for completion once a transfer began.
    #[serde(default = "default_complete_timeout_secs")]
    pub complete_timeout_secs: u64,

    /// Fixed backoff between attempts, jittered upward slightly.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Poll interval for filesystem evidence.
    #[serde(default = "default_evidence_poll_ms")]
    pub evidence_poll_ms: u64,
}

impl Default for DownloadTuning {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            control_probe_secs: default_control_probe_secs(),
            begin_timeout_secs: default_begin_timeout_secs(),
            complete_timeout_secs: default_complete_timeout_secs(),
            retry_backoff_ms: default_retry_backoff_ms(),
            evidence_poll_ms: default_evidence_poll_ms(),
        }
    }
}

impl DownloadTuning {
    pub fn control_probe_timeout(&self) -> Duration {
        Duration::from_secs(self.control_probe_secs)
    }

    pub fn begin_timeout(&self) -> Duration {
        Duration::from_secs(self.begin_timeout_secs)
    }

    pub fn complete_timeout(&self) -> Duration {
        Duration::from_secs(self.complete_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.evidence_poll_ms)
    }
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_link_selector() -> String {
    "a[href*='/file/']".to_string()
}

fn default_true() -> bool {
    true
}

fn default_initial_render_rounds() -> u32 {
    30
}

fn default_initial_render_poll_ms() -> u64 {
    500
}

fn default_stability_rounds() -> u32 {
    40
}

fn default_stability_threshold() -> u32 {
    3
}

fn default_stability_poll_ms() -> u64 {
    200
}

fn default_scroll_rounds() -> u32 {
    8
}

fn default_scroll_poll_ms() -> u64 {
    500
}

fn default_advance_confirm_secs() -> u64 {
    15
}

fn default_advance_poll_ms() -> u64 {
    500
}

fn default_max_attempts() -> u32 {
    3
}

fn default_control_probe_secs() -> u64 {
    8
}

fn default_begin_timeout_secs() -> u64 {
    60
}

fn default_complete_timeout_secs() -> u64 {
    600
}

fn default_retry_backoff_ms() -> u64 {
    2000
}

fn default_evidence_poll_ms() -> u64 {
    250
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_policy() {
        let config = Config::default();
        assert_eq!(config.options.output_directory, PathBuf::from("./downloads"));
        assert_eq!(config.options.link_selector, "a[href*='/file/']");
        assert_eq!(config.download.max_attempts, 3);
        assert_eq!(config.download.begin_timeout_secs, 60);
        assert_eq!(config.download.complete_timeout_secs, 600);
        assert_eq!(config.timing.stability_threshold, 3);
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [share]
            url = "https://viewer.test/s/abc"

            [download]
            max_attempts = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.share_url().unwrap(), "https://viewer.test/s/abc");
        assert_eq!(config.download.max_attempts, 5);
        assert_eq!(config.download.begin_timeout_secs, 60);
        assert!(config.options.show_downloads);
    }

    #[test]
    fn test_missing_share_url_is_an_error() {
        let config = Config::default();
        assert!(config.share_url().is_err());
    }
}
