//! Browser session capability.
//!
//! This module provides:
//! - The narrow capability traits the crawl and download phases consume
//! - The chromiumoxide-backed implementation used by the CLI
//! - Accessible-name control lookup shared by pagination and downloads
//!
//! The core never depends on a specific browser product; everything above
//! this module talks to [`PageSession`] and [`ElementHandle`] only.

pub mod chrome;
pub mod controls;
#[cfg(test)]
pub(crate) mod mock;

pub use chrome::ChromeSession;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// One rendered page inside a live browser session.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// Navigate the page to an absolute address.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Evaluate a JavaScript expression in the page, returning its value.
    async fn evaluate(&self, script: &str) -> Result<Value>;

    /// All elements currently matching a CSS selector.
    ///
    /// An empty vector means "none right now", not an error.
    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>>;

    /// Reload the current page.
    async fn refresh(&self) -> Result<()>;

    /// The page's current absolute address.
    async fn current_address(&self) -> Result<String>;

    /// Tear the session down.
    async fn close(&self) -> Result<()>;
}

/// Handle to one element returned by [`PageSession::find_elements`].
///
/// Handles are snapshots of a mutating DOM: a re-render can invalidate one
/// at any time, in which case operations fail with a transient error and
/// callers re-locate fresh handles.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// An attribute value, or `None` when the attribute is absent.
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// The element's rendered text.
    async fn text(&self) -> Result<String>;

    async fn is_displayed(&self) -> Result<bool>;

    async fn is_enabled(&self) -> Result<bool>;

    /// Native input-event click.
    async fn click(&self) -> Result<()>;

    /// Script-dispatched click, for elements a native click cannot reach.
    async fn click_via_script(&self) -> Result<()>;
}
