//! In-memory fakes for the chat capability traits.

use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::browser::{By, WaitState};
use crate::error::{Error, Result};

use super::lookup::{ChatPage, ElementLookup};
use super::session::{ChatSession, SessionProvider};

// ============================================================================
// FakePage
// ============================================================================

/// How a registered selector behaves when waited for.
#[derive(Debug, Clone, Copy)]
pub enum Probe {
    /// Resolves immediately to an element with this text.
    Present(&'static str),
    /// Waits out the timeout, then reports no match.
    Missing,
    /// Never completes.
    Hang,
    /// Fails the lookup.
    Error,
}

/// Handle returned by [`FakePage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeElement {
    pub selector: String,
    pub text: String,
}

#[derive(Debug, Default)]
struct PageState {
    probes: FxHashMap<String, Probe>,
    click_failures: FxHashSet<String>,
    fill_fails: bool,
    body: Option<String>,
    lookups: Mutex<Vec<String>>,
    filled: Mutex<Vec<(String, String)>>,
    clicked: Mutex<Vec<String>>,
}

/// A scripted page. Clones share recorded calls. The body is empty text
/// unless configured otherwise.
#[derive(Debug, Clone)]
pub struct FakePage {
    state: Arc<PageState>,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            state: Arc::new(PageState {
                body: Some(String::new()),
                ..PageState::default()
            }),
        }
    }

    fn configure(mut self, f: impl FnOnce(&mut PageState)) -> Self {
        let state = Arc::get_mut(&mut self.state).expect("configure before sharing");
        f(state);
        self
    }

    pub fn with_element(self, selector: &str, probe: Probe) -> Self {
        self.configure(|s| {
            s.probes.insert(selector.to_string(), probe);
        })
    }

    pub fn with_click_failure(self, selector: &str) -> Self {
        self.configure(|s| {
            s.click_failures.insert(selector.to_string());
        })
    }

    pub fn with_fill_failure(self) -> Self {
        self.configure(|s| s.fill_fails = true)
    }

    pub fn with_body(self, body: &str) -> Self {
        self.configure(|s| s.body = Some(body.to_string()))
    }

    pub fn with_body_failure(self) -> Self {
        self.configure(|s| s.body = None)
    }

    pub fn lookups(&self) -> Vec<String> {
        self.state.lookups.lock().clone()
    }

    pub fn filled(&self) -> Vec<(String, String)> {
        self.state.filled.lock().clone()
    }

    pub fn clicked(&self) -> Vec<String> {
        self.state.clicked.lock().clone()
    }
}

#[async_trait]
impl ElementLookup for FakePage {
    type Handle = FakeElement;

    async fn wait_for(
        &self,
        by: &By,
        _state: WaitState,
        timeout: Duration,
    ) -> Result<Option<FakeElement>> {
        let selector = by.value().to_string();
        self.state.lookups.lock().push(selector.clone());

        match self.state.probes.get(&selector).copied().unwrap_or(Probe::Missing) {
            Probe::Present(text) => Ok(Some(FakeElement {
                selector,
                text: text.to_string(),
            })),
            Probe::Missing => {
                tokio::time::sleep(timeout).await;
                Ok(None)
            }
            Probe::Hang => pending().await,
            Probe::Error => Err(Error::protocol(format!("lookup of {selector} failed"))),
        }
    }
}

#[async_trait]
impl ChatPage for FakePage {
    async fn fill(&self, element: &FakeElement, text: &str) -> Result<()> {
        if self.state.fill_fails {
            return Err(Error::script_error("element is not editable"));
        }
        self.state
            .filled
            .lock()
            .push((element.selector.clone(), text.to_string()));
        Ok(())
    }

    async fn click(&self, element: &FakeElement) -> Result<()> {
        if self.state.click_failures.contains(&element.selector) {
            return Err(Error::script_error("element detached"));
        }
        self.state.clicked.lock().push(element.selector.clone());
        Ok(())
    }

    async fn inner_text(&self, element: &FakeElement) -> Result<String> {
        Ok(element.text.clone())
    }

    async fn body_text(&self) -> Result<String> {
        self.state
            .body
            .clone()
            .ok_or_else(|| Error::script_error("document.body is null"))
    }
}

// ============================================================================
// FakeProvider
// ============================================================================

/// A recorded session lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Acquire,
    Navigate(String),
    Release,
}

/// Hands out sessions over a shared [`FakePage`] and records lifecycle calls.
#[derive(Debug)]
pub struct FakeProvider {
    page: FakePage,
    calls: Arc<Mutex<Vec<Call>>>,
    acquire_error: Option<fn() -> Error>,
    navigation_error: Option<fn() -> Error>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::with_page(FakePage::new())
    }

    pub fn with_page(page: FakePage) -> Self {
        Self {
            page,
            calls: Arc::default(),
            acquire_error: None,
            navigation_error: None,
        }
    }

    pub fn with_acquire_error(mut self, error: fn() -> Error) -> Self {
        self.acquire_error = Some(error);
        self
    }

    pub fn with_navigation_error(mut self, error: fn() -> Error) -> Self {
        self.navigation_error = Some(error);
        self
    }

    pub fn page(&self) -> FakePage {
        self.page.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn acquire_count(&self) -> usize {
        self.count(&Call::Acquire)
    }

    pub fn release_count(&self) -> usize {
        self.count(&Call::Release)
    }

    fn count(&self, call: &Call) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }
}

pub struct FakeSession {
    page: FakePage,
    calls: Arc<Mutex<Vec<Call>>>,
    navigation_error: Option<fn() -> Error>,
}

#[async_trait]
impl SessionProvider for FakeProvider {
    type Session = FakeSession;

    async fn acquire(&self) -> Result<FakeSession> {
        self.calls.lock().push(Call::Acquire);
        if let Some(error) = self.acquire_error {
            return Err(error());
        }
        Ok(FakeSession {
            page: self.page.clone(),
            calls: Arc::clone(&self.calls),
            navigation_error: self.navigation_error,
        })
    }
}

#[async_trait]
impl ChatSession for FakeSession {
    type Page = FakePage;

    fn page(&self) -> &FakePage {
        &self.page
    }

    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<()> {
        self.calls.lock().push(Call::Navigate(url.to_string()));
        match self.navigation_error {
            Some(error) => Err(error()),
            None => Ok(()),
        }
    }

    async fn release(self) {
        self.calls.lock().push(Call::Release);
    }
}
