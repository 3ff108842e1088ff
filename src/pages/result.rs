//! The DuckDuckGo results page: read-only accessors over rendered content.

use super::PageObject;
use crate::browser::Page;
use crate::locator::Selector;
use crate::result::BuscarResult;

/// Query input echoed on the results page
const SEARCH_INPUT: &str = "#search_form_input";

/// Clickable headline of one organic result
const RESULT_LINKS: &str = "a.result__a";

/// Descriptive excerpt beneath a result link
const RESULT_SNIPPETS: &str = ".result__snippet";

/// Page object for the rendered results surface.
///
/// All accessors re-query the DOM at call time; nothing is cached, so
/// repeated calls reflect the current rendered state. Each accessor fails
/// with an element-not-found error if the expected result structure is
/// absent (e.g., a zero-results page).
#[derive(Debug)]
pub struct ResultPage<'a> {
    page: &'a Page,
    search_input: Selector,
    result_links: Selector,
    result_snippets: Selector,
}

impl<'a> ResultPage<'a> {
    /// Create a result page against a browser handle.
    ///
    /// The handle is expected to be displaying a results page already; this
    /// is not verified here.
    #[must_use]
    pub fn new(page: &'a Page) -> Self {
        Self {
            page,
            search_input: Selector::css(SEARCH_INPUT),
            result_links: Selector::css(RESULT_LINKS),
            result_snippets: Selector::css(RESULT_SNIPPETS),
        }
    }

    /// Poll until the result structure has rendered.
    ///
    /// # Errors
    ///
    /// Returns a timeout error if no result links appear
    pub async fn wait_until_loaded(&self) -> BuscarResult<()> {
        self.page
            .wait_for(&self.result_links, Selector::default_timeout())
            .await
    }

    /// Current value of the query input, used to verify the query was echoed
    /// verbatim (including operator syntax)
    ///
    /// # Errors
    ///
    /// Returns an element-not-found error if the query input is absent
    pub async fn search_input_value(&self) -> BuscarResult<String> {
        self.page.value_of(&self.search_input).await
    }

    /// Browser tab/document title
    ///
    /// # Errors
    ///
    /// Propagates read failures from the browser handle
    pub async fn title(&self) -> BuscarResult<String> {
        self.page.title().await
    }

    /// Visible text of every result link, in document order
    ///
    /// # Errors
    ///
    /// Returns an element-not-found error if no result links are present
    pub async fn result_link_titles(&self) -> BuscarResult<Vec<String>> {
        self.page.texts_of(&self.result_links).await
    }

    /// Visible text of every result snippet, in document order
    ///
    /// # Errors
    ///
    /// Returns an element-not-found error if no snippets are present
    pub async fn result_snippets(&self) -> BuscarResult<Vec<String>> {
        self.page.texts_of(&self.result_snippets).await
    }
}

impl PageObject for ResultPage<'_> {
    fn url_pattern(&self) -> &str {
        "/?q=*"
    }

    async fn is_loaded(&self) -> bool {
        self.page.count(&self.result_links).await.unwrap_or(0) > 0
    }
}
