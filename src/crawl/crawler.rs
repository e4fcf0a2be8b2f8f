//! Crawl orchestration: drive the page cycle to exhaustion.

use std::time::Duration;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::crawl::collect::collect_items;
use crate::crawl::paginate;
use crate::crawl::stability::{self, GrowthOpts, WaitOpts};
use crate::error::Result;
use crate::output::console::print_warning;
use crate::output::log::RunLog;
use crate::session::PageSession;

/// Outcome of one full crawl.
#[derive(Debug)]
pub struct CrawlReport {
    pub catalog: Catalog,
    /// Pages visited, for diagnostics.
    pub pages: u32,
}

/// Composes the stability waits, the collector, and the paginator into the
/// loop that produces the complete, deduplicated catalog.
///
/// Termination is guaranteed by construction: every wait has a bounded
/// budget, and each page cycle either advances to confirmed-new content or
/// ends the crawl.
pub struct Crawler<'a> {
    session: &'a dyn PageSession,
    config: &'a Config,
    log: &'a RunLog,
}

impl<'a> Crawler<'a> {
    pub fn new(session: &'a dyn PageSession, config: &'a Config, log: &'a RunLog) -> Self {
        Self {
            session,
            config,
            log,
        }
    }

    /// Crawl the listing at `share_url` across all of its pages.
    pub async fn run(&self, share_url: &str) -> Result<CrawlReport> {
        let selector = self.config.options.link_selector.as_str();
        let timing = &self.config.timing;

        self.session.navigate(share_url).await?;
        self.log.event(&format!("crawl started: {share_url}"));

        // Absorb initial render latency. A view that never shows a single
        // matching element fails the whole crawl; nothing downstream can
        // work without a catalog.
        stability::await_first(
            || count_matches(self.session, selector),
            selector,
            &self.initial_render_opts(),
        )
        .await?;

        let mut catalog = Catalog::new();
        let mut pages: u32 = 1;

        loop {
            stability::settle(|| count_matches(self.session, selector), &self.settle_opts()).await?;
            stability::force_growth(
                self.session,
                || count_matches(self.session, selector),
                None,
                &self.growth_opts(),
            )
            .await?;

            let page_items = collect_items(self.session, selector).await?;
            let prior_first_key = page_items.first().map(|item| item.canonical_key.clone());
            let added = catalog.merge(page_items);
            tracing::debug!("page {}: {} new items, {} total", pages, added, catalog.len());
            self.log.event(&format!(
                "page {pages}: {added} new items, catalog at {}",
                catalog.len()
            ));

            match paginate::advance(self.session).await {
                Ok(false) => {
                    // The only normal termination: no advance control means
                    // this was the last page.
                    tracing::debug!("no advance control on page {pages}; crawl complete");
                    break;
                }
                Ok(true) => {
                    let Some(prior) = prior_first_key else {
                        // An advance control over an empty listing has
                        // nothing to confirm against; stop rather than loop.
                        print_warning("advance control present on an empty page; stopping");
                        break;
                    };
                    let confirmed = paginate::confirm_advance(
                        self.session,
                        selector,
                        &prior,
                        timing.advance_confirm_timeout(),
                        timing.advance_poll(),
                    )
                    .await?;
                    if !confirmed {
                        // Favor a possibly-incomplete catalog over an
                        // infinite loop on a wedged pager.
                        print_warning("listing did not change after advancing; stopping crawl");
                        self.log.event(&format!("advance stalled on page {pages}"));
                        break;
                    }
                    pages += 1;
                }
                Err(e) if e.is_transient() => {
                    print_warning(&format!("advance control failed ({e}); stopping crawl"));
                    self.log.event(&format!("advance failed on page {pages}: {e}"));
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        self.log.event(&format!(
            "crawl finished: {} items across {pages} page(s)",
            catalog.len()
        ));

        Ok(CrawlReport { catalog, pages })
    }

    fn initial_render_opts(&self) -> WaitOpts {
        WaitOpts {
            max_rounds: self.config.timing.initial_render_rounds,
            stable_threshold: 1,
            poll_interval: Duration::from_millis(self.config.timing.initial_render_poll_ms),
        }
    }

    fn settle_opts(&self) -> WaitOpts {
        WaitOpts {
            max_rounds: self.config.timing.stability_rounds,
            stable_threshold: self.config.timing.stability_threshold,
            poll_interval: Duration::from_millis(self.config.timing.stability_poll_ms),
        }
    }

    fn growth_opts(&self) -> GrowthOpts {
        GrowthOpts {
            max_rounds: self.config.timing.scroll_rounds,
            poll_interval: Duration::from_millis(self.config.timing.scroll_poll_ms),
        }
    }
}

async fn count_matches(session: &dyn PageSession, selector: &str) -> Result<usize> {
    Ok(session.find_elements(selector).await?.len())
}
