//! Buscar: page-object end-to-end tests for DuckDuckGo search operators.
//!
//! The suite drives the search engine's UI through a browser handle and
//! asserts on rendered result content. Two page objects isolate locators
//! from assertions:
//!
//! - [`pages::SearchPage`] owns the home/query surface (navigate, submit a
//!   phrase),
//! - [`pages::ResultPage`] owns read access to the results surface (echoed
//!   query, title, result link titles, result snippets).
//!
//! Both borrow a [`browser::Page`] handle supplied by a
//! [`fixture::BrowserFixture`]; no page object ever owns or shares it. With
//! the `browser` cargo feature the handle is a real Chromium instance over
//! CDP; without it, an in-memory DOM with the same surface backs unit tests.
//!
//! ```ignore
//! let fixture = BrowserFixture::acquire().await?;
//! SearchPage::new(fixture.page()).load().await?.search("python -snake").await?;
//!
//! let results = ResultPage::new(fixture.page());
//! results.wait_until_loaded().await?;
//! assert_eq!(results.search_input_value().await?, "python -snake");
//! fixture.close().await?;
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod browser;
pub mod fixture;
pub mod locator;
pub mod pages;
pub mod result;

/// Commonly used types
pub mod prelude {
    pub use crate::browser::{Browser, BrowserConfig, Page};
    pub use crate::fixture::BrowserFixture;
    pub use crate::locator::Selector;
    pub use crate::pages::{PageObject, ResultPage, SearchPage};
    pub use crate::result::{BuscarError, BuscarResult};
}
