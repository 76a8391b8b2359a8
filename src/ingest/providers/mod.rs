// src/ingest/providers/mod.rs
pub mod html;
pub mod http;

pub use crate::ingest::providers::html::HtmlHeadlineExtractor;
pub use crate::ingest::providers::http::HttpFetcher;
