//! chromiumoxide-backed browser session.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::error::CdpError;
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::session::{ElementHandle, PageSession};

/// Upper bound on waiting for the load event after a navigation. Pages that
/// never fire it are still usable; the crawl's own bounded waits take over.
const NAV_SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

const VISIBLE_FN: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden' && style.display !== 'none';
}"#;

const ENABLED_FN: &str = r#"function() {
    return !this.disabled && this.getAttribute('aria-disabled') !== 'true';
}"#;

const CLICK_FN: &str = "function() { this.click(); }";

/// Map a CDP failure onto the crate taxonomy: transport-level failures mean
/// the session is gone, anything else is a transient UI condition.
fn classify(err: CdpError) -> Error {
    match err {
        CdpError::Ws(_) | CdpError::ChannelSendError(_) | CdpError::NoResponse => {
            Error::Session(err.to_string())
        }
        other => Error::TransientUi(other.to_string()),
    }
}

/// Live Chrome session driving a single page.
///
/// One session is the only shared resource of a run; all access to it is
/// serialized by the callers.
pub struct ChromeSession {
    browser: Mutex<Browser>,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    /// Launch a browser and open a blank page.
    pub async fn launch(headless: bool) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(1920, 1080)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage");
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(Error::Session)?;

        let (browser, mut events) = Browser::launch(config)
            .await
            .map_err(|e| Error::Session(format!("failed to launch browser: {e}")))?;

        // The CDP event stream must be drained for the connection to make
        // progress; a stream error means the connection is gone.
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::Session(format!("failed to open page: {e}")))?;

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handler,
        })
    }

    /// Point the browser's download manager at `dir`. Transfers initiated by
    /// clicking download controls land there as `<name>.crdownload` siblings
    /// that are renamed in place on completion.
    pub async fn allow_downloads_to(&self, dir: &Path) -> Result<()> {
        let params = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(dir.to_string_lossy().to_string())
            .build()
            .map_err(Error::Session)?;
        let browser = self.browser.lock().await;
        browser.execute(params).await.map_err(classify)?;
        Ok(())
    }
}

#[async_trait]
impl PageSession for ChromeSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page.goto(url).await.map_err(classify)?;
        // Best-effort settle; script-rendered views keep loading long after
        // the load event anyway.
        let _ = tokio::time::timeout(NAV_SETTLE_TIMEOUT, self.page.wait_for_navigation()).await;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        let evaluation = self.page.evaluate(script).await.map_err(classify)?;
        Ok(evaluation.value().cloned().unwrap_or(Value::Null))
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>> {
        match self.page.find_elements(selector).await {
            Ok(elements) => Ok(elements
                .into_iter()
                .map(|inner| Box::new(ChromeElement { inner }) as Box<dyn ElementHandle>)
                .collect()),
            // No matching nodes is expected-absent, not a fault.
            Err(CdpError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(classify(e)),
        }
    }

    async fn refresh(&self) -> Result<()> {
        self.page.reload().await.map_err(classify)?;
        Ok(())
    }

    async fn current_address(&self) -> Result<String> {
        self.page
            .url()
            .await
            .map_err(classify)?
            .ok_or_else(|| Error::TransientUi("page has no address yet".to_string()))
    }

    async fn close(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        let _ = browser.close().await;
        let _ = browser.wait().await;
        self.handler.abort();
        Ok(())
    }
}

/// [`ElementHandle`] over a chromiumoxide element.
struct ChromeElement {
    inner: Element,
}

impl ChromeElement {
    /// Run a zero-argument function against the element and read back a bool.
    async fn js_bool(&self, function: &str) -> Result<bool> {
        let returns = self
            .inner
            .call_js_fn(function, false)
            .await
            .map_err(classify)?;
        Ok(returns
            .result
            .value
            .as_ref()
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }
}

#[async_trait]
impl ElementHandle for ChromeElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.inner.attribute(name).await.map_err(classify)
    }

    async fn text(&self) -> Result<String> {
        Ok(self
            .inner
            .inner_text()
            .await
            .map_err(classify)?
            .unwrap_or_default())
    }

    async fn is_displayed(&self) -> Result<bool> {
        self.js_bool(VISIBLE_FN).await
    }

    async fn is_enabled(&self) -> Result<bool> {
        self.js_bool(ENABLED_FN).await
    }

    async fn click(&self) -> Result<()> {
        self.inner.click().await.map_err(classify)?;
        Ok(())
    }

    async fn click_via_script(&self) -> Result<()> {
        self.inner
            .call_js_fn(CLICK_FN, false)
            .await
            .map_err(classify)?;
        Ok(())
    }
}
