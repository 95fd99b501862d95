//! The HTML parse interface consumed by the page fetcher (`spec.md` §6).
//!
//! The engine only ever touches this through the [`HtmlParser`] trait, so
//! the actual parsing library stays swappable and testable in isolation
//! from the network layer.

use scraper::{Html, Selector};

/// Output of parsing one page's HTML body.
///
/// `title` is empty and `links` is empty when parsing fails outright —
/// partial/malformed HTML is common and is not treated as an error
/// (`spec.md` §7).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub title: String,
    pub links: Vec<String>,
}

/// Extracts `<title>` text and every `<a href>` from an HTML byte stream,
/// in document order.
pub trait HtmlParser: Send + Sync {
    fn parse(&self, body: &[u8]) -> ParsedPage;
}

/// Default [`HtmlParser`] backed by the `scraper` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperHtmlParser;

impl HtmlParser for ScraperHtmlParser {
    fn parse(&self, body: &[u8]) -> ParsedPage {
        let text = String::from_utf8_lossy(body);
        let document = Html::parse_document(&text);

        let title = Selector::parse("title")
            .ok()
            .and_then(|sel| document.select(&sel).next())
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default();

        let links = Selector::parse("a")
            .map(|sel| {
                document
                    .select(&sel)
                    .filter_map(|el| el.value().attr("href"))
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        ParsedPage { title, links }
    }
}
