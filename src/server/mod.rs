//! HTTP boundary: routing, validation, CORS and the `tiny_http` listener.

pub mod handler;
pub mod listener;

pub use handler::{AnalyzeService, HttpResponse};
pub use listener::serve;

const INDEX_HTML: &str = include_str!("../../static/index.html");
const FILE_BADGES_SLOT: &str = "{{FILE_BADGES}}";

/// Browser UI served at `GET /`, showing at most `file_badges` files per suggestion.
pub fn index_page(file_badges: usize) -> String {
    INDEX_HTML.replace(FILE_BADGES_SLOT, &file_badges.to_string())
}
