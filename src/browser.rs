//! Browser control for driving the search UI.
//!
//! With the `browser` feature enabled, this module drives a real Chromium
//! instance over CDP (Chrome `DevTools` Protocol) via chromiumoxide. Without
//! the feature, it provides an in-memory DOM implementation with the same
//! async surface, so page objects and their tests compile and run without a
//! browser.

use crate::locator::Selector;
use crate::result::{BuscarError, BuscarResult};

/// Error for a submitted query that did not produce a navigation
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
fn submit_navigation_failure(selector: &Selector, message: impl std::fmt::Display) -> BuscarError {
    BuscarError::Input {
        message: format!("submit of {} did not navigate: {message}", selector.describe()),
    }
}

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 800,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{BrowserConfig, BuscarError, BuscarResult};
    use crate::locator::Selector;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tokio::sync::Mutex;
    use tracing::{debug, info};

    /// Browser instance with a live CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance
        ///
        /// # Errors
        ///
        /// Returns error if the browser cannot be launched
        pub async fn launch(config: BrowserConfig) -> BuscarResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder.build().map_err(|e| BuscarError::BrowserLaunch {
                message: e.to_string(),
            })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| BuscarError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            // Drive the CDP event loop until the connection drops
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            info!(headless = config.headless, "browser launched");

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Create a new page
        ///
        /// # Errors
        ///
        /// Returns error if the page cannot be created
        pub async fn new_page(&self) -> BuscarResult<Page> {
            let browser = self.inner.lock().await;
            let cdp_page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| BuscarError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            Ok(Page {
                inner: Arc::new(Mutex::new(cdp_page)),
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        ///
        /// # Errors
        ///
        /// Returns error if the browser refuses to shut down
        pub async fn close(self) -> BuscarResult<()> {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| BuscarError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    /// A browser page backed by a live CDP connection.
    ///
    /// All read accessors re-query the DOM at call time; nothing is cached.
    #[derive(Debug, Clone)]
    pub struct Page {
        inner: Arc<Mutex<CdpPage>>,
    }

    impl Page {
        /// Navigate to a URL
        ///
        /// # Errors
        ///
        /// Returns error if navigation fails
        pub async fn goto(&self, url: &str) -> BuscarResult<()> {
            debug!(url, "navigating");
            let page = self.inner.lock().await;
            page.goto(url)
                .await
                .map_err(|e| BuscarError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            page.wait_for_navigation()
                .await
                .map_err(|e| BuscarError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        /// Get the document title
        ///
        /// # Errors
        ///
        /// Returns error if the title cannot be read
        pub async fn title(&self) -> BuscarResult<String> {
            let page = self.inner.lock().await;
            let title = page.get_title().await.map_err(|e| BuscarError::Evaluation {
                message: e.to_string(),
            })?;
            Ok(title.unwrap_or_default())
        }

        /// Evaluate a JavaScript expression and deserialize the result
        ///
        /// # Errors
        ///
        /// Returns error if evaluation or deserialization fails
        pub async fn eval<T: serde::de::DeserializeOwned>(&self, expr: &str) -> BuscarResult<T> {
            let page = self.inner.lock().await;
            let result = page.evaluate(expr).await.map_err(|e| BuscarError::Evaluation {
                message: e.to_string(),
            })?;
            Ok(result.into_value()?)
        }

        /// Count elements matching a selector
        ///
        /// # Errors
        ///
        /// Returns error if the query cannot be evaluated
        pub async fn count(&self, selector: &Selector) -> BuscarResult<u64> {
            self.eval(&selector.to_count_query()).await
        }

        /// Assert that at least one element matches the selector
        ///
        /// # Errors
        ///
        /// Returns [`BuscarError::ElementNotFound`] if nothing matches
        pub async fn find(&self, selector: &Selector) -> BuscarResult<()> {
            if self.count(selector).await? == 0 {
                return Err(BuscarError::ElementNotFound {
                    selector: selector.describe(),
                });
            }
            Ok(())
        }

        /// Visible text of the first element matching the selector
        ///
        /// # Errors
        ///
        /// Returns [`BuscarError::ElementNotFound`] if nothing matches
        pub async fn text_of(&self, selector: &Selector) -> BuscarResult<String> {
            let text: Option<String> = self.eval(&selector.to_text_query()).await?;
            text.ok_or_else(|| BuscarError::ElementNotFound {
                selector: selector.describe(),
            })
        }

        /// Visible text of every element matching the selector, in document
        /// order
        ///
        /// # Errors
        ///
        /// Returns [`BuscarError::ElementNotFound`] if nothing matches
        pub async fn texts_of(&self, selector: &Selector) -> BuscarResult<Vec<String>> {
            let texts: Vec<String> = self.eval(&selector.to_all_text_query()).await?;
            if texts.is_empty() {
                return Err(BuscarError::ElementNotFound {
                    selector: selector.describe(),
                });
            }
            Ok(texts)
        }

        /// Current `value` of the first matching input element
        ///
        /// # Errors
        ///
        /// Returns [`BuscarError::ElementNotFound`] if nothing matches
        pub async fn value_of(&self, selector: &Selector) -> BuscarResult<String> {
            let value: Option<String> = self.eval(&selector.to_value_query()).await?;
            value.ok_or_else(|| BuscarError::ElementNotFound {
                selector: selector.describe(),
            })
        }

        /// Click the input matching the selector, type `text` into it, and
        /// submit with Enter
        ///
        /// # Errors
        ///
        /// Returns [`BuscarError::ElementNotFound`] if the input cannot be
        /// located, or an input error if the keystrokes fail
        pub async fn fill_and_submit(&self, selector: &Selector, text: &str) -> BuscarResult<()> {
            debug!(selector = %selector.describe(), text, "fill and submit");
            self.find(selector).await?;

            let css = match selector {
                Selector::Css(s) | Selector::CssWithText { css: s, .. } => s.clone(),
            };

            let page = self.inner.lock().await;
            let element =
                page.find_element(css.as_str())
                    .await
                    .map_err(|_| BuscarError::ElementNotFound {
                        selector: selector.describe(),
                    })?;

            element.click().await.map_err(|e| BuscarError::Input {
                message: e.to_string(),
            })?;
            element.type_str(text).await.map_err(|e| BuscarError::Input {
                message: e.to_string(),
            })?;
            element
                .press_key("Enter")
                .await
                .map_err(|e| BuscarError::Input {
                    message: e.to_string(),
                })?;

            page.wait_for_navigation()
                .await
                .map_err(|e| super::submit_navigation_failure(selector, e))?;
            Ok(())
        }

        /// Poll until at least one element matches the selector
        ///
        /// # Errors
        ///
        /// Returns [`BuscarError::Timeout`] if nothing matches within
        /// `timeout`
        pub async fn wait_for(
            &self,
            selector: &Selector,
            timeout: Duration,
        ) -> BuscarResult<()> {
            let deadline = Instant::now() + timeout;
            loop {
                if self.count(selector).await? > 0 {
                    return Ok(());
                }
                if Instant::now() >= deadline {
                    return Err(BuscarError::Timeout {
                        ms: timeout.as_millis() as u64,
                    });
                }
                tokio::time::sleep(Selector::default_poll_interval()).await;
            }
        }
    }
}

// ============================================================================
// In-memory DOM (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod dom {
    use super::{BrowserConfig, BuscarError, BuscarResult};
    use crate::locator::Selector;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tracing::debug;

    #[derive(Debug, Default)]
    struct DomState {
        url: String,
        title: String,
        /// selector -> visible texts, in document order
        elements: HashMap<String, Vec<String>>,
        /// selector -> current input value
        values: HashMap<String, String>,
        last_submitted: Option<String>,
    }

    /// Browser instance over an in-memory DOM
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
    }

    impl Browser {
        /// Launch a new browser instance
        ///
        /// # Errors
        ///
        /// Infallible for the in-memory DOM; signature matches the CDP
        /// implementation
        pub async fn launch(config: BrowserConfig) -> BuscarResult<Self> {
            Ok(Self { config })
        }

        /// Create a new page with an empty DOM
        ///
        /// # Errors
        ///
        /// Infallible for the in-memory DOM
        pub async fn new_page(&self) -> BuscarResult<Page> {
            Ok(Page {
                state: Arc::new(Mutex::new(DomState::default())),
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        ///
        /// # Errors
        ///
        /// Infallible for the in-memory DOM
        pub async fn close(self) -> BuscarResult<()> {
            Ok(())
        }
    }

    /// A page over an in-memory DOM.
    ///
    /// Tests stage content with [`Page::set_title`], [`Page::set_elements`],
    /// and [`Page::set_value`]; the read accessors behave like the CDP
    /// implementation, including element-not-found errors.
    #[derive(Debug, Clone)]
    pub struct Page {
        state: Arc<Mutex<DomState>>,
    }

    impl Page {
        fn lock(&self) -> std::sync::MutexGuard<'_, DomState> {
            // Lock poisoning only happens if a staging call panicked
            self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
        }

        /// Navigate to a URL
        ///
        /// # Errors
        ///
        /// Infallible for the in-memory DOM
        pub async fn goto(&self, url: &str) -> BuscarResult<()> {
            debug!(url, "navigating");
            self.lock().url = url.to_string();
            Ok(())
        }

        /// Get the document title
        ///
        /// # Errors
        ///
        /// Infallible for the in-memory DOM
        pub async fn title(&self) -> BuscarResult<String> {
            Ok(self.lock().title.clone())
        }

        /// Count elements matching a selector
        ///
        /// # Errors
        ///
        /// Infallible for the in-memory DOM
        pub async fn count(&self, selector: &Selector) -> BuscarResult<u64> {
            let state = self.lock();
            let n = matching_texts(&state, selector).len() as u64;
            if n == 0 && state.values.contains_key(&base_css(selector)) {
                return Ok(1);
            }
            Ok(n)
        }

        /// Assert that at least one element matches the selector
        ///
        /// # Errors
        ///
        /// Returns [`BuscarError::ElementNotFound`] if nothing matches
        pub async fn find(&self, selector: &Selector) -> BuscarResult<()> {
            if self.count(selector).await? == 0 {
                return Err(BuscarError::ElementNotFound {
                    selector: selector.describe(),
                });
            }
            Ok(())
        }

        /// Visible text of the first element matching the selector
        ///
        /// # Errors
        ///
        /// Returns [`BuscarError::ElementNotFound`] if nothing matches
        pub async fn text_of(&self, selector: &Selector) -> BuscarResult<String> {
            let state = self.lock();
            matching_texts(&state, selector)
                .first()
                .cloned()
                .ok_or_else(|| BuscarError::ElementNotFound {
                    selector: selector.describe(),
                })
        }

        /// Visible text of every element matching the selector, in document
        /// order
        ///
        /// # Errors
        ///
        /// Returns [`BuscarError::ElementNotFound`] if nothing matches
        pub async fn texts_of(&self, selector: &Selector) -> BuscarResult<Vec<String>> {
            let state = self.lock();
            let texts = matching_texts(&state, selector);
            if texts.is_empty() {
                return Err(BuscarError::ElementNotFound {
                    selector: selector.describe(),
                });
            }
            Ok(texts)
        }

        /// Current `value` of the first matching input element
        ///
        /// # Errors
        ///
        /// Returns [`BuscarError::ElementNotFound`] if nothing matches
        pub async fn value_of(&self, selector: &Selector) -> BuscarResult<String> {
            let state = self.lock();
            state
                .values
                .get(&base_css(selector))
                .cloned()
                .ok_or_else(|| BuscarError::ElementNotFound {
                    selector: selector.describe(),
                })
        }

        /// Type `text` into the input matching the selector and submit
        ///
        /// # Errors
        ///
        /// Returns [`BuscarError::ElementNotFound`] if the input was not
        /// staged
        pub async fn fill_and_submit(&self, selector: &Selector, text: &str) -> BuscarResult<()> {
            debug!(selector = %selector.describe(), text, "fill and submit");
            let mut state = self.lock();
            let css = base_css(selector);
            if !state.values.contains_key(&css) {
                return Err(BuscarError::ElementNotFound {
                    selector: selector.describe(),
                });
            }
            state.values.insert(css, text.to_string());
            state.last_submitted = Some(text.to_string());
            Ok(())
        }

        /// Poll until at least one element matches the selector
        ///
        /// # Errors
        ///
        /// Returns [`BuscarError::Timeout`] immediately if nothing matches;
        /// the in-memory DOM never changes concurrently
        pub async fn wait_for(
            &self,
            selector: &Selector,
            timeout: Duration,
        ) -> BuscarResult<()> {
            if self.count(selector).await? > 0 {
                return Ok(());
            }
            Err(BuscarError::Timeout {
                ms: timeout.as_millis() as u64,
            })
        }

        // ---- staging API, used by tests to fake rendered content ----

        /// Set the document title
        pub fn set_title(&self, title: impl Into<String>) {
            self.lock().title = title.into();
        }

        /// Stage the visible texts of elements matching a CSS selector
        pub fn set_elements(&self, css: impl Into<String>, texts: Vec<String>) {
            self.lock().elements.insert(css.into(), texts);
        }

        /// Stage an input element with a current value
        pub fn set_value(&self, css: impl Into<String>, value: impl Into<String>) {
            self.lock().values.insert(css.into(), value.into());
        }

        /// The phrase most recently submitted through [`Page::fill_and_submit`]
        #[must_use]
        pub fn last_submitted(&self) -> Option<String> {
            self.lock().last_submitted.clone()
        }

        /// Current URL
        #[must_use]
        pub fn current_url(&self) -> String {
            self.lock().url.clone()
        }
    }

    fn base_css(selector: &Selector) -> String {
        match selector {
            Selector::Css(s) | Selector::CssWithText { css: s, .. } => s.clone(),
        }
    }

    fn matching_texts(state: &DomState, selector: &Selector) -> Vec<String> {
        let texts = state
            .elements
            .get(&base_css(selector))
            .cloned()
            .unwrap_or_default();
        match selector {
            Selector::Css(_) => texts,
            Selector::CssWithText { text, .. } => {
                texts.into_iter().filter(|t| t.contains(text)).collect()
            }
        }
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};

#[cfg(not(feature = "browser"))]
pub use dom::{Browser, Page};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_navigation_failure_names_selector() {
        let sel = Selector::css("#search_form_input_homepage");
        let err = submit_navigation_failure(&sel, "timed out");
        assert!(matches!(err, BuscarError::Input { .. }));
        let msg = err.to_string();
        assert!(msg.contains("#search_form_input_homepage"));
        assert!(msg.contains("did not navigate"));
        assert!(msg.contains("timed out"));
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_default_is_headless_sandboxed() {
            let config = BrowserConfig::default();
            assert!(config.headless);
            assert!(config.sandbox);
            assert!(config.chromium_path.is_none());
        }

        #[test]
        fn test_builder_chain() {
            let config = BrowserConfig::default()
                .with_viewport(1024, 768)
                .with_headless(false)
                .with_no_sandbox()
                .with_chromium_path("/usr/bin/chromium");

            assert_eq!(config.viewport_width, 1024);
            assert_eq!(config.viewport_height, 768);
            assert!(!config.headless);
            assert!(!config.sandbox);
            assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
        }
    }

    #[cfg(not(feature = "browser"))]
    mod dom_tests {
        use super::*;
        use crate::locator::Selector;
        use std::time::Duration;

        async fn page() -> Page {
            let browser = Browser::launch(BrowserConfig::default()).await.unwrap();
            browser.new_page().await.unwrap()
        }

        #[tokio::test]
        async fn test_goto_records_url() {
            let page = page().await;
            page.goto("https://duckduckgo.com/").await.unwrap();
            assert_eq!(page.current_url(), "https://duckduckgo.com/");
        }

        #[tokio::test]
        async fn test_texts_of_preserves_document_order() {
            let page = page().await;
            page.set_elements(
                "a.result__a",
                vec!["first".to_string(), "second".to_string()],
            );
            let sel = Selector::css("a.result__a");
            assert_eq!(page.texts_of(&sel).await.unwrap(), vec!["first", "second"]);
        }

        #[tokio::test]
        async fn test_missing_element_is_not_found() {
            let page = page().await;
            let sel = Selector::css(".result__snippet");
            let err = page.texts_of(&sel).await.unwrap_err();
            assert!(matches!(err, BuscarError::ElementNotFound { .. }));
        }

        #[tokio::test]
        async fn test_fill_and_submit_requires_staged_input() {
            let page = page().await;
            let sel = Selector::css("#search_form_input_homepage");
            let err = page.fill_and_submit(&sel, "python").await.unwrap_err();
            assert!(matches!(err, BuscarError::ElementNotFound { .. }));

            page.set_value("#search_form_input_homepage", "");
            page.fill_and_submit(&sel, "python -snake").await.unwrap();
            assert_eq!(page.last_submitted().as_deref(), Some("python -snake"));
            assert_eq!(page.value_of(&sel).await.unwrap(), "python -snake");
        }

        #[tokio::test]
        async fn test_text_filter_narrows_matches() {
            let page = page().await;
            page.set_elements(
                "a.result__a",
                vec!["Python tutorial".to_string(), "Rust book".to_string()],
            );
            let sel = Selector::css("a.result__a").with_text("Python");
            assert_eq!(page.count(&sel).await.unwrap(), 1);
        }

        #[tokio::test]
        async fn test_wait_for_times_out_on_absent_element() {
            let page = page().await;
            let sel = Selector::css("a.result__a");
            let err = page
                .wait_for(&sel, Duration::from_millis(100))
                .await
                .unwrap_err();
            assert!(matches!(err, BuscarError::Timeout { ms: 100 }));
        }
    }
}
