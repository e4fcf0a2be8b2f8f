//! Accessible-name control lookup.
//!
//! Pagination and download both need to find "the control called X" in a
//! view full of unrelated buttons and links. The search runs in tiers:
//! exact accessible-name matches first, substring matches last, because a
//! broad needle can hit unrelated controls and must never shadow an exact
//! one.

use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::error::Result;
use crate::session::{ElementHandle, PageSession};

/// Selector covering button-like and link-like elements.
pub const CONTROL_SELECTOR: &str = "button, [role='button'], a";

/// One tier of the prioritized control search.
#[derive(Debug, Clone, Copy)]
pub enum NameMatch {
    /// Accessible name equals the needle exactly.
    Exact(&'static str),
    /// Accessible name contains the needle, case-insensitive.
    Substring(&'static str),
}

impl NameMatch {
    fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        match self {
            NameMatch::Exact(needle) => name == *needle,
            NameMatch::Substring(needle) => name.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}

/// Bounds for one control probe.
#[derive(Debug, Clone)]
pub struct ProbeOpts {
    /// How long each tier keeps re-scanning before the next tier runs.
    /// `Duration::ZERO` means a single scan per tier.
    pub timeout: Duration,
    pub poll_interval: Duration,
}

/// Find the first visible-and-enabled control whose accessible name matches,
/// trying each tier in order.
///
/// Each tier is itself a bounded poll: controls on script-rendered views can
/// lag the rest of the page. `None` means no tier produced a usable control.
pub async fn locate_control(
    session: &dyn PageSession,
    tiers: &[NameMatch],
    opts: &ProbeOpts,
) -> Result<Option<Box<dyn ElementHandle>>> {
    for tier in tiers {
        let deadline = Instant::now() + opts.timeout;
        loop {
            if let Some(control) = scan_once(session, *tier).await? {
                return Ok(Some(control));
            }
            if Instant::now() >= deadline {
                break;
            }
            sleep(opts.poll_interval).await;
        }
    }
    Ok(None)
}

/// Native click, falling back to a script-dispatched click when the input
/// event is intercepted.
pub async fn activate(element: &dyn ElementHandle) -> Result<()> {
    match element.click().await {
        Ok(()) => Ok(()),
        Err(e) if e.is_transient() => {
            tracing::debug!("native click failed ({e}), retrying via script");
            element.click_via_script().await
        }
        Err(e) => Err(e),
    }
}

/// One pass over the current view. Per-element failures are skips, not
/// faults: a handle can go stale between the query and the read.
async fn scan_once(
    session: &dyn PageSession,
    tier: NameMatch,
) -> Result<Option<Box<dyn ElementHandle>>> {
    for element in session.find_elements(CONTROL_SELECTOR).await? {
        let Ok(name) = accessible_name(element.as_ref()).await else {
            continue;
        };
        if !tier.matches(&name) {
            continue;
        }
        match (element.is_displayed().await, element.is_enabled().await) {
            (Ok(true), Ok(true)) => return Ok(Some(element)),
            _ => continue,
        }
    }
    Ok(None)
}

/// The accessibility label wins over visible text when both are present.
async fn accessible_name(element: &dyn ElementHandle) -> Result<String> {
    if let Some(label) = element.attribute("aria-label").await? {
        if !label.trim().is_empty() {
            return Ok(label);
        }
    }
    element.text().await
}
