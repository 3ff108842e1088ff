//! Per-test browser acquisition and teardown.
//!
//! Each test owns exactly one browser for its duration; the fixture hands out
//! the page handle and guarantees the browser is closed again. Page objects
//! only ever borrow the handle, so the fixture outlives them on every exit
//! path.

use crate::browser::{Browser, BrowserConfig, Page};
use crate::result::{BuscarError, BuscarResult};
use tracing::debug;

/// A scoped browser for one test.
///
/// Acquire at the start of a test, read the page handle with
/// [`BrowserFixture::page`], and call [`BrowserFixture::close`] at the end.
/// If the test unwinds before `close`, dropping the fixture shuts the
/// browser process down with it.
#[derive(Debug)]
pub struct BrowserFixture {
    browser: Option<Browser>,
    page: Page,
}

impl BrowserFixture {
    /// Acquire a browser with the default configuration
    ///
    /// # Errors
    ///
    /// Returns a fixture error if the browser cannot be launched
    pub async fn acquire() -> BuscarResult<Self> {
        Self::with_config(BrowserConfig::default()).await
    }

    /// Acquire a browser with an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns a fixture error if the browser cannot be launched
    pub async fn with_config(config: BrowserConfig) -> BuscarResult<Self> {
        let browser = Browser::launch(config).await.map_err(|e| BuscarError::Fixture {
            message: format!("browser setup failed: {e}"),
        })?;
        let page = browser.new_page().await.map_err(|e| BuscarError::Fixture {
            message: format!("page setup failed: {e}"),
        })?;
        debug!("browser fixture acquired");
        Ok(Self {
            browser: Some(browser),
            page,
        })
    }

    /// The page handle supplied to page objects
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Tear down the browser
    ///
    /// # Errors
    ///
    /// Returns a fixture error if the browser refuses to shut down
    pub async fn close(mut self) -> BuscarResult<()> {
        if let Some(browser) = self.browser.take() {
            browser.close().await.map_err(|e| BuscarError::Fixture {
                message: format!("browser teardown failed: {e}"),
            })?;
        }
        debug!("browser fixture closed");
        Ok(())
    }
}

impl Drop for BrowserFixture {
    fn drop(&mut self) {
        // Explicit close is preferred; dropping the browser handle still
        // terminates the chromium process.
        if self.browser.is_some() {
            debug!("browser fixture dropped without explicit close");
        }
    }
}

#[cfg(test)]
#[cfg(not(feature = "browser"))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_acquire_and_close() {
        let fixture = BrowserFixture::acquire().await.unwrap();
        fixture.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_page_handle_is_usable() {
        let fixture = BrowserFixture::acquire().await.unwrap();
        fixture.page().goto("https://duckduckgo.com/").await.unwrap();
        fixture.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_drop_without_close_does_not_panic() {
        let fixture = BrowserFixture::acquire().await.unwrap();
        drop(fixture);
    }
}
