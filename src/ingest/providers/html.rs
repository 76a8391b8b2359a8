// src/ingest/providers/html.rs
//! Heading/link heuristics for search-result pages.
//!
//! An element is a candidate when it is an `h1`-`h3`, when one of its classes
//! mentions title/headline/header, or when it is a link whose normalized text
//! is longer than 30 chars (result lists are mostly long links).

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::ingest::normalize_text;
use crate::ingest::types::HeadlineExtractor;

static CANDIDATES: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, a").expect("static selector"));

const LONG_LINK_CHARS: usize = 30;
const CLASS_HINTS: &[&str] = &["title", "headline", "header"];

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlHeadlineExtractor;

impl HtmlHeadlineExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl HeadlineExtractor for HtmlHeadlineExtractor {
    fn extract(&self, raw: &str) -> Vec<String> {
        if raw.trim().is_empty() {
            return Vec::new();
        }
        let document = Html::parse_document(raw);
        document
            .select(&CANDIDATES)
            .filter_map(|el| {
                let text = el.text().collect::<String>();
                looks_like_headline(&el, &text).then_some(text)
            })
            .collect()
    }
}

fn looks_like_headline(el: &ElementRef<'_>, text: &str) -> bool {
    let normalized = normalize_text(text);
    if normalized.is_empty() {
        return false;
    }
    let tag = el.value().name();
    if matches!(tag, "h1" | "h2" | "h3") {
        return true;
    }
    let class_hint = el.value().classes().any(|c| {
        let c = c.to_lowercase();
        CLASS_HINTS.iter().any(|h| c.contains(h))
    });
    if class_hint {
        return true;
    }
    tag == "a" && normalized.chars().count() > LONG_LINK_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
  <nav><a href="/">Home</a><a href="/login">Login</a></nav>
  <h1>Search results</h1>
  <article>
    <h3 class="post-card__title">Bitcoin ETF inflows hit a three-week high</h3>
    <a class="post-card__header" href="/a">Short</a>
    <a href="/b">Ethereum staking yields compress as validators pile in</a>
    <a href="/c">Read more</a>
  </article>
  <footer><a href="/privacy">Privacy policy and cookie settings here</a></footer>
</body></html>"#;

    #[test]
    fn extracts_headings_hinted_and_long_links_in_order() {
        let out: Vec<String> = HtmlHeadlineExtractor::new()
            .extract(PAGE)
            .iter()
            .map(|s| normalize_text(s))
            .collect();
        assert_eq!(
            out,
            vec![
                "Search results".to_string(),
                "Bitcoin ETF inflows hit a three-week high".to_string(),
                "Short".to_string(),
                "Ethereum staking yields compress as validators pile in".to_string(),
                "Privacy policy and cookie settings here".to_string(),
            ]
        );
    }

    #[test]
    fn empty_page_yields_nothing() {
        assert!(HtmlHeadlineExtractor::new().extract("").is_empty());
    }
}
