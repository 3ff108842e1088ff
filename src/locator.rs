//! Locator abstraction for element selection.
//!
//! Page objects own their selectors; everything above them sees only
//! operations. A selector compiles to a JavaScript query expression that the
//! browser handle evaluates, so the locator scheme stays opaque configuration.

use std::time::Duration;

/// Default timeout for auto-waiting (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default polling interval for auto-waiting (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Selector for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g., "a.result__a")
    Css(String),
    /// CSS selector filtered by text content
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Filter by text content
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        match self {
            Self::Css(css) | Self::CssWithText { css, .. } => Self::CssWithText {
                css,
                text: text.into(),
            },
        }
    }

    /// Human-readable form for error messages
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Css(s) => s.clone(),
            Self::CssWithText { css, text } => format!("{css} :text({text})"),
        }
    }

    /// Convert to a query returning the first matching element, or `null`
    /// if nothing matches
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::CssWithText { css, text } => {
                format!("Array.from(document.querySelectorAll({css:?})).find(el => el.textContent.includes({text:?}))")
            }
        }
    }

    /// Convert to a query counting matching elements
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelectorAll({s:?}).length"),
            Self::CssWithText { css, text } => {
                format!("Array.from(document.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?})).length")
            }
        }
    }

    /// Convert to a query returning the visible text of the first match,
    /// or `null` if nothing matches
    #[must_use]
    pub fn to_text_query(&self) -> String {
        format!(
            "(() => {{ const els = {}; return els.length ? els[0].innerText : null; }})()",
            self.to_elements_expr()
        )
    }

    /// Convert to a query returning the visible text of every match, in
    /// document order
    #[must_use]
    pub fn to_all_text_query(&self) -> String {
        format!("{}.map(el => el.innerText)", self.to_elements_expr())
    }

    /// Convert to a query returning the current `value` of the first
    /// matching input element, or `null` if nothing matches
    #[must_use]
    pub fn to_value_query(&self) -> String {
        format!(
            "(() => {{ const els = {}; return els.length ? els[0].value : null; }})()",
            self.to_elements_expr()
        )
    }

    /// JS expression evaluating to the array of matching elements
    fn to_elements_expr(&self) -> String {
        match self {
            Self::Css(s) => format!("Array.from(document.querySelectorAll({s:?}))"),
            Self::CssWithText { css, text } => {
                format!("Array.from(document.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?}))")
            }
        }
    }

    /// Default auto-wait timeout
    #[must_use]
    pub const fn default_timeout() -> Duration {
        Duration::from_millis(DEFAULT_TIMEOUT_MS)
    }

    /// Default auto-wait polling interval
    #[must_use]
    pub const fn default_poll_interval() -> Duration {
        Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod query_generation_tests {
        use super::*;

        #[test]
        fn test_query_selects_first_match() {
            let sel = Selector::css("a.result__a");
            assert_eq!(sel.to_query(), "document.querySelector(\"a.result__a\")");
        }

        #[test]
        fn test_query_with_text_filter_scans_matches() {
            let sel = Selector::css("a.result__a").with_text("python");
            let query = sel.to_query();
            assert!(query.contains("find(el => el.textContent.includes(\"python\"))"));
        }

        #[test]
        fn test_count_query_escapes_selector() {
            let sel = Selector::css("input[name='q']");
            let query = sel.to_count_query();
            assert!(query.contains("querySelectorAll(\"input[name='q']\")"));
            assert!(query.ends_with(".length"));
        }

        #[test]
        fn test_text_query_handles_missing_element() {
            let sel = Selector::css("a.result__a");
            let query = sel.to_text_query();
            assert!(query.contains("innerText"));
            assert!(query.contains("null"));
        }

        #[test]
        fn test_all_text_query_maps_every_match() {
            let sel = Selector::css(".result__snippet");
            let query = sel.to_all_text_query();
            assert!(query.starts_with("Array.from"));
            assert!(query.contains(".map(el => el.innerText)"));
        }

        #[test]
        fn test_value_query_reads_input_value() {
            let sel = Selector::css("#search_form_input");
            assert!(sel.to_value_query().contains("els[0].value"));
        }

        #[test]
        fn test_text_filter_narrows_matches() {
            let sel = Selector::css("a.result__a").with_text("python");
            let query = sel.to_count_query();
            assert!(query.contains("textContent.includes(\"python\")"));
        }
    }

    mod describe_tests {
        use super::*;

        #[test]
        fn test_describe_css() {
            assert_eq!(Selector::css("a.result__a").describe(), "a.result__a");
        }

        #[test]
        fn test_describe_text_filtered() {
            let sel = Selector::css("button").with_text("Search");
            assert_eq!(sel.describe(), "button :text(Search)");
        }
    }
}
