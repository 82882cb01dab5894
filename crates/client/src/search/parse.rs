//! Result-page parsing for the DuckDuckGo HTML endpoint.

use scraper::{Html, Selector};
use url::Url;

use skry_core::SearchHit;

/// Parse a DuckDuckGo HTML result page into hits, in page order.
///
/// Ad blocks are skipped; results whose link cannot be resolved to an
/// absolute http(s) URL are dropped.
pub fn parse_result_page(html: &str) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let result_sel = Selector::parse("div.result").expect("invalid selector");
    let title_sel = Selector::parse("a.result__a").expect("invalid selector");
    let snippet_sel = Selector::parse(".result__snippet").expect("invalid selector");

    let mut hits = Vec::new();

    for block in document.select(&result_sel) {
        if block.value().classes().any(|c| c == "result--ad") {
            continue;
        }

        let Some(anchor) = block.select(&title_sel).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_redirect(href) else {
            continue;
        };

        let title = collapse_whitespace(anchor.text());
        if title.is_empty() {
            continue;
        }

        let snippet = block
            .select(&snippet_sel)
            .next()
            .map(|s| collapse_whitespace(s.text()))
            .filter(|s| !s.is_empty());

        hits.push(SearchHit { url, title, snippet });
    }

    hits
}

/// Join text fragments with single spaces, dropping markup line breaks.
fn collapse_whitespace<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    fragments
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unwrap DuckDuckGo's redirect links.
///
/// Result hrefs come wrapped as `//duckduckgo.com/l/?uddg=<target>`;
/// direct http(s) links pass through unchanged, anything else is dropped.
fn resolve_redirect(href: &str) -> Option<String> {
    let absolute = if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{href}")
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    if parsed.path().starts_with("/l/") {
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned());
    }

    Some(absolute)
}
