//! The DuckDuckGo home page: navigate to it and submit a search phrase.

use super::PageObject;
use crate::browser::Page;
use crate::locator::Selector;
use crate::result::BuscarResult;
use tracing::info;

/// DuckDuckGo home URL
pub const HOME_URL: &str = "https://duckduckgo.com/";

/// Query input on the home page
const SEARCH_INPUT: &str = "#search_form_input_homepage";

/// Page object for the search engine's home/query surface.
///
/// Borrows the page handle for its lifetime; the fixture that supplied the
/// handle owns it and performs teardown.
#[derive(Debug)]
pub struct SearchPage<'a> {
    page: &'a Page,
    search_input: Selector,
}

impl<'a> SearchPage<'a> {
    /// Create a search page against a browser handle.
    ///
    /// The handle is expected to be ready to display the home page; this is
    /// not verified here.
    #[must_use]
    pub fn new(page: &'a Page) -> Self {
        Self {
            page,
            search_input: Selector::css(SEARCH_INPUT),
        }
    }

    /// Navigate to the home page.
    ///
    /// Returns the page object itself so test setup can chain construction
    /// and navigation.
    ///
    /// # Errors
    ///
    /// Propagates navigation failures from the browser handle
    pub async fn load(&self) -> BuscarResult<&Self> {
        self.page.goto(HOME_URL).await?;
        Ok(self)
    }

    /// Type `phrase` into the query input and submit.
    ///
    /// The phrase is caller-supplied and unvalidated; operator syntax such as
    /// a leading `-` or quoted substrings passes through verbatim. Triggers
    /// navigation to the results page.
    ///
    /// # Errors
    ///
    /// Returns an element-not-found error if the query input cannot be
    /// located
    pub async fn search(&self, phrase: &str) -> BuscarResult<()> {
        info!(phrase, "searching");
        self.page.fill_and_submit(&self.search_input, phrase).await
    }
}

impl PageObject for SearchPage<'_> {
    fn url_pattern(&self) -> &str {
        "/"
    }

    async fn is_loaded(&self) -> bool {
        self.page.count(&self.search_input).await.unwrap_or(0) > 0
    }
}

#[cfg(test)]
#[cfg(not(feature = "browser"))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::browser::{Browser, BrowserConfig};
    use crate::result::BuscarError;

    async fn page() -> Page {
        let browser = Browser::launch(BrowserConfig::default()).await.unwrap();
        browser.new_page().await.unwrap()
    }

    #[tokio::test]
    async fn test_load_navigates_home() {
        let page = page().await;
        let search_page = SearchPage::new(&page);
        search_page.load().await.unwrap();
        assert_eq!(page.current_url(), HOME_URL);
    }

    #[tokio::test]
    async fn test_load_returns_self_for_chaining() {
        let page = page().await;
        page.set_value(SEARCH_INPUT, "");
        SearchPage::new(&page)
            .load()
            .await
            .unwrap()
            .search("python")
            .await
            .unwrap();
        assert_eq!(page.last_submitted().as_deref(), Some("python"));
    }

    #[tokio::test]
    async fn test_search_passes_operator_syntax_verbatim() {
        let page = page().await;
        page.set_value(SEARCH_INPUT, "");
        let search_page = SearchPage::new(&page);
        search_page.search("python -snake").await.unwrap();
        assert_eq!(page.last_submitted().as_deref(), Some("python -snake"));
    }

    #[tokio::test]
    async fn test_search_fails_without_query_input() {
        let page = page().await;
        let search_page = SearchPage::new(&page);
        let err = search_page.search("python").await.unwrap_err();
        assert!(matches!(err, BuscarError::ElementNotFound { .. }));
    }

    #[tokio::test]
    async fn test_page_object_metadata() {
        let page = page().await;
        let search_page = SearchPage::new(&page);
        assert_eq!(search_page.url_pattern(), "/");
        assert!(search_page.page_name().contains("SearchPage"));
    }

    #[tokio::test]
    async fn test_is_loaded_tracks_query_input() {
        let page = page().await;
        let search_page = SearchPage::new(&page);
        assert!(!search_page.is_loaded().await);

        page.set_value(SEARCH_INPUT, "");
        assert!(search_page.is_loaded().await);
    }
}
