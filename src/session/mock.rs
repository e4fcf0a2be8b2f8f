//! Scriptable in-memory session for tests.
//!
//! Each selector serves a programmed sequence of element sets; once the
//! sequence is exhausted the last set repeats, so polling loops observe a
//! stable view.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::session::{ElementHandle, PageSession};

type ClickEffect = Arc<dyn Fn() + Send + Sync>;

/// Blueprint for one element a [`MockSession`] serves.
#[derive(Clone, Default)]
pub struct MockElement {
    pub href: Option<String>,
    pub aria_label: Option<String>,
    pub text: String,
    pub displayed: bool,
    pub enabled: bool,
    on_click: Option<ClickEffect>,
    failing_clicks: Arc<AtomicUsize>,
}

impl MockElement {
    /// A visible, enabled link.
    pub fn link(href: &str, text: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            text: text.to_string(),
            displayed: true,
            enabled: true,
            ..Default::default()
        }
    }

    /// A visible, enabled control with an accessibility label.
    pub fn control(label: &str) -> Self {
        Self {
            aria_label: Some(label.to_string()),
            displayed: true,
            enabled: true,
            ..Default::default()
        }
    }

    pub fn with_aria_label(mut self, label: &str) -> Self {
        self.aria_label = Some(label.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Run `effect` on every successful click.
    pub fn on_click(mut self, effect: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(effect));
        self
    }

    /// Make the next `n` click dispatches fail with a transient error.
    pub fn fail_clicks(self, n: usize) -> Self {
        self.failing_clicks.store(n, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl ElementHandle for MockElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(match name {
            "href" => self.href.clone(),
            "aria-label" => self.aria_label.clone(),
            _ => None,
        })
    }

    async fn text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    async fn is_displayed(&self) -> Result<bool> {
        Ok(self.displayed)
    }

    async fn is_enabled(&self) -> Result<bool> {
        Ok(self.enabled)
    }

    async fn click(&self) -> Result<()> {
        if take_one(&self.failing_clicks) {
            return Err(Error::TransientUi("scripted click failure".to_string()));
        }
        if let Some(effect) = &self.on_click {
            effect();
        }
        Ok(())
    }

    async fn click_via_script(&self) -> Result<()> {
        self.click().await
    }
}

#[derive(Default)]
struct Script {
    responses: Vec<Vec<MockElement>>,
    served: usize,
}

/// Scripted [`PageSession`].
#[derive(Default)]
pub struct MockSession {
    scripts: Mutex<HashMap<String, Script>>,
    pub navigations: Mutex<Vec<String>>,
    pub refreshes: AtomicUsize,
    address: Mutex<String>,
    fail_navigations: AtomicUsize,
    fatal_navigations: AtomicUsize,
}

impl MockSession {
    pub fn new(address: &str) -> Self {
        Self {
            address: Mutex::new(address.to_string()),
            ..Default::default()
        }
    }

    /// Append one served element set for `selector`.
    pub fn push_view(&self, selector: &str, elements: Vec<MockElement>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(selector.to_string())
            .or_default()
            .responses
            .push(elements);
    }

    /// Make the next `n` navigations fail transiently.
    pub fn fail_navigations(&self, n: usize) {
        self.fail_navigations.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` navigations fail fatally (session lost).
    pub fn fatal_navigations(&self, n: usize) {
        self.fatal_navigations.store(n, Ordering::SeqCst);
    }

    pub fn navigation_count(&self) -> usize {
        self.navigations.lock().unwrap().len()
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSession for MockSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.navigations.lock().unwrap().push(url.to_string());
        if take_one(&self.fatal_navigations) {
            return Err(Error::Session("scripted session loss".to_string()));
        }
        if take_one(&self.fail_navigations) {
            return Err(Error::TransientUi("scripted navigation failure".to_string()));
        }
        *self.address.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn evaluate(&self, _script: &str) -> Result<Value> {
        Ok(Value::Null)
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>> {
        let mut scripts = self.scripts.lock().unwrap();
        let Some(script) = scripts.get_mut(selector) else {
            return Ok(Vec::new());
        };
        if script.responses.is_empty() {
            return Ok(Vec::new());
        }
        let index = script.served.min(script.responses.len() - 1);
        script.served += 1;
        Ok(script.responses[index]
            .iter()
            .cloned()
            .map(|element| Box::new(element) as Box<dyn ElementHandle>)
            .collect())
    }

    async fn refresh(&self) -> Result<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn current_address(&self) -> Result<String> {
        Ok(self.address.lock().unwrap().clone())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Decrement `counter` if positive, reporting whether a unit was taken.
fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}
