//! Session lifecycle management.
//!
//! A session is one browser plus one page in a fresh, isolated browsing
//! context, alive for exactly one message/reply cycle. [`with_session`]
//! acquires it, navigates to the chat page, hands the page to the caller's
//! closure, and releases it on every exit path.
//!
//! If the enclosing future is dropped mid-flight, release cannot run; the
//! browser's process guard and the temporary profile's drop still kill the
//! process and delete the profile.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::browser::{Browser, Page};
use crate::driver::Driver;
use crate::error::Result;

use super::FlowError;
use super::lookup::ChatPage;

// ============================================================================
// Traits
// ============================================================================

/// Produces chat sessions.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Session type handed out.
    type Session: ChatSession;

    /// Acquires a browser and a fresh isolated page.
    ///
    /// On error nothing is left running.
    async fn acquire(&self) -> Result<Self::Session>;
}

/// An acquired browser and page.
#[async_trait]
pub trait ChatSession: Send + Sync + Sized {
    /// Page type exposed to the flow.
    type Page: ChatPage;

    /// Returns the page.
    fn page(&self) -> &Self::Page;

    /// Navigates to `url` and waits for the network to go idle, bounded by `timeout`.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Tears the session down. Never fails; problems are logged.
    async fn release(self);
}

// ============================================================================
// with_session
// ============================================================================

/// Runs `f` against a freshly acquired, navigated session.
///
/// Acquisition and navigation failures become [`FlowError::Acquisition`].
/// The session is released exactly once whenever it was acquired, whatever
/// `f` returns.
///
/// # Errors
///
/// Returns [`FlowError::Acquisition`] or whatever `f` returns.
pub async fn with_session<P, T, F>(
    provider: &P,
    url: &str,
    navigation_timeout: Duration,
    f: F,
) -> std::result::Result<T, FlowError>
where
    P: SessionProvider + ?Sized,
    F: AsyncFnOnce(&<P::Session as ChatSession>::Page) -> std::result::Result<T, FlowError>,
{
    let session = provider.acquire().await.map_err(FlowError::Acquisition)?;
    debug!("Session acquired");

    let outcome = match session.navigate(url, navigation_timeout).await {
        Ok(()) => {
            info!(url = %url, "Chat page loaded");
            f(session.page()).await
        }
        Err(e) => Err(FlowError::Acquisition(e)),
    };

    session.release().await;
    debug!("Session released");

    outcome
}

// ============================================================================
// Browser-backed Session
// ============================================================================

/// A session backed by a real browser process.
#[derive(Debug)]
pub struct BrowserSession {
    browser: Browser,
    page: Page,
}

impl BrowserSession {
    /// Returns the browser.
    #[inline]
    #[must_use]
    pub fn browser(&self) -> &Browser {
        &self.browser
    }
}

#[async_trait]
impl SessionProvider for Driver {
    type Session = BrowserSession;

    async fn acquire(&self) -> Result<BrowserSession> {
        let browser = self.launch().await?;

        match browser.new_page().await {
            Ok(page) => Ok(BrowserSession { browser, page }),
            Err(e) => {
                browser.close().await;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl ChatSession for BrowserSession {
    type Page = Page;

    fn page(&self) -> &Page {
        &self.page
    }

    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        self.page.goto(url, timeout).await
    }

    async fn release(self) {
        self.page.close().await;
        self.browser.close().await;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::chat::testing::{Call, FakeProvider};
    use crate::error::Error;

    const URL: &str = "https://chat.example.com/new";

    #[tokio::test]
    async fn test_success_releases_once() {
        let provider = FakeProvider::new();

        let value = with_session(&provider, URL, Duration::from_secs(1), async |_page| {
            Ok::<_, FlowError>(42)
        })
        .await
        .expect("flow ok");

        assert_eq!(value, 42);
        assert_eq!(
            provider.calls(),
            vec![Call::Acquire, Call::Navigate(URL.to_string()), Call::Release]
        );
    }

    #[tokio::test]
    async fn test_closure_failure_still_releases() {
        let provider = FakeProvider::new();

        let err = with_session(&provider, URL, Duration::from_secs(1), async |_page| {
            Err::<(), _>(FlowError::InputNotFound { tried: 4 })
        })
        .await
        .unwrap_err();

        assert!(matches!(err, FlowError::InputNotFound { tried: 4 }));
        assert_eq!(provider.calls().last(), Some(&Call::Release));
        assert_eq!(provider.release_count(), 1);
    }

    #[tokio::test]
    async fn test_navigation_failure_is_acquisition_and_releases() {
        let provider =
            FakeProvider::new().with_navigation_error(|| Error::timeout("navigation", 30_000));

        let mut ran = false;
        let err = with_session(&provider, URL, Duration::from_secs(1), async |_page| {
            ran = true;
            Ok::<_, FlowError>(())
        })
        .await
        .unwrap_err();

        assert!(!ran);
        assert!(matches!(err, FlowError::Acquisition(ref e) if e.is_timeout()));
        assert_eq!(provider.release_count(), 1);
    }

    #[tokio::test]
    async fn test_acquire_failure_has_nothing_to_release() {
        let provider = FakeProvider::new().with_acquire_error(|| Error::connection("no browser"));

        let err = with_session(&provider, URL, Duration::from_secs(1), async |_page| {
            Ok::<_, FlowError>(())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, FlowError::Acquisition(_)));
        assert_eq!(provider.calls(), vec![Call::Acquire]);
    }
}
