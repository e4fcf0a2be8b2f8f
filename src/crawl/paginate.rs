//! Listing pagination.
//!
//! Per page cycle: collect, locate the advance control, activate it, then
//! confirm the listing actually changed. No control means the current page
//! is the last one; a confirmed-dead advance means the crawl stops with a
//! possibly-incomplete catalog rather than looping.

use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::crawl::collect::collect_items;
use crate::error::Result;
use crate::session::controls::{self, NameMatch, ProbeOpts};
use crate::session::PageSession;

/// Prioritized accessible names for the advance control. The exact
/// spellings run first: the bare substring can hit unrelated controls.
const ADVANCE_TIERS: &[NameMatch] = &[
    NameMatch::Exact("Next page"),
    NameMatch::Exact("next page"),
    NameMatch::Substring("next"),
];

/// Locate and activate the advance control.
///
/// Returns false when no visible-and-enabled control exists. The view has
/// already settled when this runs, so absence is treated as final evidence
/// of the last page, not as a glitch to retry.
pub async fn advance(session: &dyn PageSession) -> Result<bool> {
    let probe = ProbeOpts {
        timeout: Duration::ZERO,
        poll_interval: Duration::from_millis(250),
    };
    match controls::locate_control(session, ADVANCE_TIERS, &probe).await? {
        Some(control) => {
            controls::activate(control.as_ref()).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Confirm an activated advance actually changed the listing.
///
/// Success requires the first item's key to change from `prior_first_key`.
/// New items appearing is not enough: a page can reorder or append without
/// all items changing, and only a changed head proves the view moved on.
pub async fn confirm_advance(
    session: &dyn PageSession,
    selector: &str,
    prior_first_key: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        let items = collect_items(session, selector).await?;
        if let Some(first) = items.first() {
            if first.canonical_key != prior_first_key {
                return Ok(true);
            }
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::controls::CONTROL_SELECTOR;
    use crate::session::mock::{MockElement, MockSession};

    const SELECTOR: &str = "a[href*='/file/']";

    #[tokio::test]
    async fn test_advance_returns_false_without_a_control() {
        let session = MockSession::new("https://viewer.test/share");
        session.push_view(
            CONTROL_SELECTOR,
            vec![MockElement::control("Share"), MockElement::control("Sort by")],
        );
        assert!(!advance(&session).await.unwrap());
    }

    #[tokio::test]
    async fn test_advance_ignores_disabled_control() {
        let session = MockSession::new("https://viewer.test/share");
        session.push_view(
            CONTROL_SELECTOR,
            vec![MockElement::control("Next page").disabled()],
        );
        assert!(!advance(&session).await.unwrap());
    }

    #[tokio::test]
    async fn test_advance_clicks_the_exact_match_first() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let clicked = Arc::new(AtomicBool::new(false));
        let effect = Arc::clone(&clicked);
        let session = MockSession::new("https://viewer.test/share");
        session.push_view(
            CONTROL_SELECTOR,
            vec![
                MockElement::control("next chapter"),
                MockElement::control("Next page").on_click(move || {
                    effect.store(true, Ordering::SeqCst);
                }),
            ],
        );

        assert!(advance(&session).await.unwrap());
        assert!(clicked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_confirm_advance_sees_changed_first_key() {
        let session = MockSession::new("https://viewer.test/share");
        session.push_view(SELECTOR, vec![MockElement::link("/file/1", "a")]);
        session.push_view(SELECTOR, vec![MockElement::link("/file/9", "z")]);

        let confirmed = confirm_advance(
            &session,
            SELECTOR,
            "https://viewer.test/file/1",
            Duration::from_millis(100),
            Duration::ZERO,
        )
        .await
        .unwrap();
        assert!(confirmed);
    }

    #[tokio::test]
    async fn test_confirm_advance_times_out_on_unchanged_listing() {
        let session = MockSession::new("https://viewer.test/share");
        session.push_view(SELECTOR, vec![MockElement::link("/file/1", "a")]);

        let confirmed = confirm_advance(
            &session,
            SELECTOR,
            "https://viewer.test/file/1",
            Duration::ZERO,
            Duration::ZERO,
        )
        .await
        .unwrap();
        assert!(!confirmed);
    }
}
