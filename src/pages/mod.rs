//! Page objects for the DuckDuckGo search UI.
//!
//! Each UI surface is a narrow interface over a borrowed [`crate::browser::Page`]
//! handle: locators stay private to one implementation unit, tests see only
//! operations. Page objects are stateless beyond the handle and are created
//! per test (construct, use, discard).

pub mod result;
pub mod search;

pub use result::ResultPage;
pub use search::SearchPage;

/// Trait for page objects representing one surface of the UI.
#[allow(async_fn_in_trait)]
pub trait PageObject {
    /// URL pattern that identifies this page (e.g., "/", "/?q=*")
    fn url_pattern(&self) -> &str;

    /// Whether the page-identifying element is currently present.
    ///
    /// Does not wait; a handle displaying some other page reports `false`.
    async fn is_loaded(&self) -> bool;

    /// Page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
