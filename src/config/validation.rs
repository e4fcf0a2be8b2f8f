//! Configuration validation logic.

use url::Url;

use crate::config::loader::{Config, DownloadTuning};
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_share_url(config.share.url.as_deref())?;
    validate_selector(&config.options.link_selector)?;
    validate_download(&config.download)?;

    Ok(())
}

/// Validate the shared-folder address.
pub fn validate_share_url(url: Option<&str>) -> Result<()> {
    let Some(url) = url else {
        return Err(Error::MissingConfig(
            "share.url (pass --share <url>)".to_string(),
        ));
    };

    let parsed = Url::parse(url).map_err(|e| Error::ConfigValidation {
        field: "share.url".to_string(),
        message: format!("'{url}' is not a valid address: {e}"),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::ConfigValidation {
            field: "share.url".to_string(),
            message: format!("unsupported scheme '{other}' (expected http or https)"),
        }),
    }
}

/// Validate the item-link selector.
pub fn validate_selector(selector: &str) -> Result<()> {
    if selector.trim().is_empty() {
        return Err(Error::ConfigValidation {
            field: "options.link_selector".to_string(),
            message: "selector cannot be empty".to_string(),
        });
    }
    Ok(())
}

/// Validate download tuning: every wait must stay bounded and nonzero.
pub fn validate_download(tuning: &DownloadTuning) -> Result<()> {
    if tuning.max_attempts == 0 {
        return Err(Error::ConfigValidation {
            field: "download.max_attempts".to_string(),
            message: "at least one attempt is required".to_string(),
        });
    }

    if tuning.begin_timeout_secs == 0 || tuning.complete_timeout_secs == 0 {
        return Err(Error::ConfigValidation {
            field: "download".to_string(),
            message: "begin and completion timeouts must be nonzero".to_string(),
        });
    }

    if tuning.evidence_poll_ms == 0 {
        return Err(Error::ConfigValidation {
            field: "download.evidence_poll_ms".to_string(),
            message: "poll interval must be nonzero".to_string(),
        });
    }

    Ok(())
}
