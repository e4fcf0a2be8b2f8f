//! Render-stability heuristics.
//!
//! The rendered item count is the only observable signal that a listing has
//! finished loading, and it is noisy: network latency and incremental
//! rendering make it grow in bursts. Every wait here is a bounded polling
//! loop whose answer is "probably settled", never "provably done".

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::{Error, Result};
use crate::session::PageSession;

/// Tuning for one bounded stability wait.
#[derive(Debug, Clone)]
pub struct WaitOpts {
    pub max_rounds: u32,
    /// Consecutive equal readings required to declare the view settled.
    pub stable_threshold: u32,
    pub poll_interval: Duration,
}

/// Tuning for one growth-forcing wait.
#[derive(Debug, Clone)]
pub struct GrowthOpts {
    pub max_rounds: u32,
    pub poll_interval: Duration,
}

/// Poll `probe` until it returns the same count `stable_threshold` times in
/// a row, or the round budget runs out.
///
/// Budget exhaustion is not an error: "stable enough" is a heuristic, and
/// the final count is returned either way.
pub async fn settle<P, F>(mut probe: P, opts: &WaitOpts) -> Result<usize>
where
    P: FnMut() -> F,
    F: Future<Output = Result<usize>>,
{
    let mut last_count = probe().await?;
    let mut stable_rounds: u32 = 0;

    for _ in 0..opts.max_rounds {
        if stable_rounds >= opts.stable_threshold {
            break;
        }
        sleep(opts.poll_interval).await;
        let count = probe().await?;
        if count == last_count {
            stable_rounds += 1;
        } else {
            stable_rounds = 0;
            last_count = count;
        }
    }

    Ok(last_count)
}

/// Bounded wait for the first matching element after a navigation.
///
/// Unlike [`settle`], coming up empty here is a hard failure: nothing
/// downstream can proceed against a view that never rendered a listing.
pub async fn await_first<P, F>(mut probe: P, selector: &str, opts: &WaitOpts) -> Result<usize>
where
    P: FnMut() -> F,
    F: Future<Output = Result<usize>>,
{
    for round in 0..opts.max_rounds {
        let count = probe().await?;
        if count > 0 {
            return Ok(count);
        }
        if round + 1 < opts.max_rounds {
            sleep(opts.poll_interval).await;
        }
    }

    Err(Error::RenderTimeout {
        selector: selector.to_string(),
        waited_ms: u64::from(opts.max_rounds) * opts.poll_interval.as_millis() as u64,
    })
}

/// Growth-forcing variant of [`settle`]: scroll to the bottom before each
/// probe so lazy-loaded content has a chance to materialize.
///
/// Terminates early when `target` is reached or the document height stops
/// growing; returns the final count.
pub async fn force_growth<P, F>(
    session: &dyn PageSession,
    mut probe: P,
    target: Option<usize>,
    opts: &GrowthOpts,
) -> Result<usize>
where
    P: FnMut() -> F,
    F: Future<Output = Result<usize>>,
{
    let mut last_height = document_height(session).await;
    let mut count = probe().await?;

    for _ in 0..opts.max_rounds {
        if target.is_some_and(|t| count >= t) {
            break;
        }
        scroll_to_bottom(session).await;
        sleep(opts.poll_interval).await;
        count = probe().await?;

        let height = document_height(session).await;
        if height == last_height {
            break;
        }
        last_height = height;
    }

    Ok(count)
}

/// Best-effort scroll of the window and the usual lazy-list containers.
/// A failed scroll just means no new content gets forced in.
async fn scroll_to_bottom(session: &dyn PageSession) {
    let _ = session
        .evaluate(
            "window.scrollTo(0, document.body.scrollHeight); \
             document.querySelectorAll('[data-scrollable], .scroll-container, main, [role=\"main\"]')\
                 .forEach(el => { el.scrollTop = el.scrollHeight; });",
        )
        .await;
}

async fn document_height(session: &dyn PageSession) -> i64 {
    session
        .evaluate("document.body.scrollHeight")
        .await
        .ok()
        .and_then(|v| v.as_i64())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::mock::MockSession;
    use tokio_test::assert_ok;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast(max_rounds: u32, stable_threshold: u32) -> WaitOpts {
        WaitOpts {
            max_rounds,
            stable_threshold,
            poll_interval: Duration::ZERO,
        }
    }

    /// Probe serving a scripted sequence, repeating the last value.
    fn sequence(counts: &'static [usize]) -> impl FnMut() -> std::future::Ready<Result<usize>> {
        let calls = AtomicUsize::new(0);
        move || {
            let index = calls.fetch_add(1, Ordering::SeqCst).min(counts.len() - 1);
            std::future::ready(Ok(counts[index]))
        }
    }

    #[tokio::test]
    async fn test_settle_waits_for_consecutive_equal_readings() {
        let probe = sequence(&[1, 3, 5, 5, 5]);
        let count = tokio_test::assert_ok!(settle(probe, &fast(40, 2)).await);
        assert_eq!(count, 5);
    }

    #[tokio::test]
    async fn test_settle_terminates_on_round_budget_without_error() {
        // A count that never repeats: the budget must still bound the loop.
        let calls = AtomicUsize::new(0);
        let probe = || std::future::ready(Ok(calls.fetch_add(1, Ordering::SeqCst)));
        let count = settle(probe, &fast(10, 3)).await.unwrap();
        assert_eq!(count, 10);
    }

    #[tokio::test]
    async fn test_await_first_returns_once_elements_appear() {
        let probe = sequence(&[0, 0, 4]);
        let count = await_first(probe, "a", &fast(30, 1)).await.unwrap();
        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn test_await_first_times_out_on_empty_view() {
        let probe = || std::future::ready(Ok(0));
        let err = await_first(probe, "a[href*='/file/']", &fast(5, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RenderTimeout { .. }));
    }

    #[tokio::test]
    async fn test_force_growth_stops_once_target_reached() {
        let session = MockSession::new("https://viewer.test/share");
        let probe = || std::future::ready(Ok(10));
        let opts = GrowthOpts {
            max_rounds: 8,
            poll_interval: Duration::ZERO,
        };
        let count = force_growth(&session, probe, Some(10), &opts).await.unwrap();
        assert_eq!(count, 10);
    }

    #[tokio::test]
    async fn test_force_growth_stops_when_height_stops_growing() {
        let session = MockSession::new("https://viewer.test/share");
        let calls = AtomicUsize::new(0);
        let probe = || std::future::ready(Ok(calls.fetch_add(1, Ordering::SeqCst)));
        let opts = GrowthOpts {
            max_rounds: 8,
            poll_interval: Duration::ZERO,
        };
        // The mock page reports a constant height, so one scroll round is
        // enough to conclude nothing more is coming.
        force_growth(&session, probe, None, &opts).await.unwrap();
        assert!(calls.load(Ordering::SeqCst) <= 3);
    }
}
