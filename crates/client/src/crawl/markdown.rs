//! HTML to Markdown rendering for crawled pages.
//!
//! A deliberately small renderer: block structure (headings, paragraphs,
//! lists, quotes, code fences) is preserved, boilerplate containers
//! (script/style/nav/chrome) are dropped, links resolve against the final
//! URL, and every rendered page starts with a YAML front-matter header
//! naming its title, source, and fetch time.

use chrono::{DateTime, SecondsFormat, Utc};
use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{Html, Selector};
use url::Url;

use skry_core::Error;

use crate::fetch::FetchResponse;

/// Tags whose subtrees carry no readable content.
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "form", "iframe", "svg", "button",
    "select", "option", "label", "input", "canvas",
];

/// Tags that open a new block when found inside an unknown container.
const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "pre", "blockquote", "hr", "div", "section", "article",
    "main", "table", "figure",
];

/// Render a fetched page to markdown, according to its content type.
///
/// HTML is converted; plain text and markdown pass through under the same
/// front-matter header; anything else fails this page only.
pub fn render_page(response: &FetchResponse, fetched_at: &DateTime<Utc>) -> Result<String, Error> {
    let content_type = response.content_type.as_deref().unwrap_or("text/html");
    let body = String::from_utf8_lossy(&response.bytes);

    if content_type.contains("text/html") || content_type.contains("application/xhtml") {
        Ok(render_html(&body, &response.final_url, fetched_at))
    } else if content_type.contains("text/plain") || content_type.contains("text/markdown") {
        Ok(format!("{}\n{}", front_matter(None, &response.final_url, fetched_at), body.trim()))
    } else {
        Err(Error::ExtractFailed(format!("unsupported content type: {}", content_type)))
    }
}

/// Convert an HTML document to front-matter plus markdown body.
pub fn render_html(html: &str, source: &Url, fetched_at: &DateTime<Utc>) -> String {
    let document = Html::parse_document(html);
    let title = extract_title(&document);
    let body = markdown_body(&document, source);

    let mut rendered = front_matter(title.as_deref(), source, fetched_at);
    rendered.push('\n');
    rendered.push_str(&body);
    rendered
}

/// Extract the document title, if any.
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").expect("invalid selector");
    document
        .select(&selector)
        .next()
        .map(|t| collapse(&t.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

/// YAML front-matter header for a rendered page.
///
/// Format:
/// ```yaml
/// ---
/// title: <page title>
/// source: <final url>
/// fetched_at: <ISO8601 timestamp>
/// ---
/// ```
fn front_matter(title: Option<&str>, source: &Url, fetched_at: &DateTime<Utc>) -> String {
    format!(
        "---\ntitle: {title}\nsource: {source}\nfetched_at: {timestamp}\n---\n",
        title = escape_yaml(title.unwrap_or("Untitled")),
        source = source.as_str(),
        timestamp = fetched_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Escape special YAML characters in a string.
fn escape_yaml(s: &str) -> String {
    if s.contains('\n') || s.contains(':') {
        format!("\"{}\"", s.replace('"', "\\\""))
    } else if s.is_empty() {
        "\"\"".to_string()
    } else {
        s.to_string()
    }
}

fn markdown_body(document: &Html, base: &Url) -> String {
    let body_sel = Selector::parse("body").expect("invalid selector");
    let mut blocks = Vec::new();

    if let Some(body) = document.select(&body_sel).next() {
        render_blocks(*body, base, &mut blocks);
    }

    blocks.join("\n\n")
}

/// Walk block-level children, appending one string per output block.
fn render_blocks(node: NodeRef<'_, Node>, base: &Url, blocks: &mut Vec<String>) {
    for child in node.children() {
        let Some(element) = child.value().as_element() else {
            if let Some(text) = child.value().as_text() {
                let text = collapse(&text.text);
                if !text.is_empty() {
                    blocks.push(text);
                }
            }
            continue;
        };

        let tag = element.name();
        if SKIP_TAGS.contains(&tag) {
            continue;
        }

        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<usize>().unwrap_or(1);
                let text = inline_of(child, base);
                if !text.is_empty() {
                    blocks.push(format!("{} {}", "#".repeat(level), text));
                }
            }
            "p" => {
                let text = inline_of(child, base);
                if !text.is_empty() {
                    blocks.push(text);
                }
            }
            "ul" | "ol" => {
                let list = render_list(child, base, tag == "ol");
                if !list.is_empty() {
                    blocks.push(list);
                }
            }
            "pre" => {
                let text = raw_text(child);
                if !text.trim().is_empty() {
                    blocks.push(format!("```\n{}\n```", text.trim_end()));
                }
            }
            "blockquote" => {
                let text = inline_of(child, base);
                if !text.is_empty() {
                    blocks.push(format!("> {}", text));
                }
            }
            "hr" => blocks.push("---".to_string()),
            _ => {
                if has_block_children(child) {
                    render_blocks(child, base, blocks);
                } else {
                    let text = inline_of(child, base);
                    if !text.is_empty() {
                        blocks.push(text);
                    }
                }
            }
        }
    }
}

fn render_list(node: NodeRef<'_, Node>, base: &Url, ordered: bool) -> String {
    let mut lines = Vec::new();
    let mut index = 1;

    for child in node.children() {
        let is_item = child.value().as_element().is_some_and(|el| el.name() == "li");
        if !is_item {
            continue;
        }

        let text = inline_of(child, base);
        if text.is_empty() {
            continue;
        }

        if ordered {
            lines.push(format!("{}. {}", index, text));
            index += 1;
        } else {
            lines.push(format!("- {}", text));
        }
    }

    lines.join("\n")
}

fn has_block_children(node: NodeRef<'_, Node>) -> bool {
    node.children()
        .filter_map(|c| c.value().as_element().map(|el| el.name().to_string()))
        .any(|tag| BLOCK_TAGS.contains(&tag.as_str()))
}

/// Render inline content (text, links, emphasis, code) to one line.
fn inline_of(node: NodeRef<'_, Node>, base: &Url) -> String {
    let mut out = String::new();
    render_inline(node, base, &mut out);
    collapse(&out)
}

fn render_inline(node: NodeRef<'_, Node>, base: &Url, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&text.text),
            Node::Element(element) => {
                let tag = element.name();
                if SKIP_TAGS.contains(&tag) {
                    continue;
                }
                match tag {
                    "a" => {
                        let mut label = String::new();
                        render_inline(child, base, &mut label);
                        let label = collapse(&label);

                        match element.attr("href").and_then(|href| base.join(href).ok()) {
                            Some(href) if matches!(href.scheme(), "http" | "https") => {
                                let label = if label.is_empty() { href.to_string() } else { label };
                                out.push_str(&format!(" [{}]({}) ", label, href));
                            }
                            _ => out.push_str(&label),
                        }
                    }
                    "strong" | "b" => wrap_inline(child, base, out, "**"),
                    "em" | "i" => wrap_inline(child, base, out, "*"),
                    "code" => {
                        let mut text = String::new();
                        render_inline(child, base, &mut text);
                        let text = collapse(&text);
                        if !text.is_empty() {
                            out.push_str(&format!(" `{}` ", text));
                        }
                    }
                    "br" => out.push(' '),
                    "img" => {
                        if let Some(alt) = element.attr("alt").map(str::trim).filter(|a| !a.is_empty()) {
                            out.push_str(&format!(" {} ", alt));
                        }
                    }
                    _ => render_inline(child, base, out),
                }
            }
            _ => {}
        }
    }
}

fn wrap_inline(node: NodeRef<'_, Node>, base: &Url, out: &mut String, marker: &str) {
    let mut text = String::new();
    render_inline(node, base, &mut text);
    let text = collapse(&text);
    if !text.is_empty() {
        out.push_str(&format!(" {marker}{text}{marker} "));
    }
}

/// Collect descendant text verbatim (for code fences).
fn raw_text(node: NodeRef<'_, Node>) -> String {
    let mut out = String::new();
    collect_raw_text(node, &mut out);
    out
}

fn collect_raw_text(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&text.text),
            Node::Element(_) => collect_raw_text(child, out),
            _ => {}
        }
    }
}

/// Squeeze runs of whitespace down to single spaces.
fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use reqwest::StatusCode;

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn base() -> Url {
        Url::parse("https://example.com/article").unwrap()
    }

    const ARTICLE: &str = r#"
        <!DOCTYPE html>
        <html>
        <head><title>Cache Design</title><style>body { color: red; }</style></head>
        <body>
            <nav><a href="/home">Home</a></nav>
            <article>
                <h1>Cache Design</h1>
                <p>Entries expire after a <strong>fixed</strong> interval.</p>
                <h2>Eviction</h2>
                <p>See <a href="/docs/lru">the LRU notes</a> for details.</p>
                <ul>
                    <li>bounded capacity</li>
                    <li>recency refresh</li>
                </ul>
                <pre><code>store.put(key, value);</code></pre>
            </article>
            <footer>copyright</footer>
            <script>alert("hi");</script>
        </body>
        </html>
    "#;

    #[test]
    fn test_render_html_structure() {
        let markdown = render_html(ARTICLE, &base(), &fixed_time());

        assert!(markdown.starts_with("---\ntitle: Cache Design\n"));
        assert!(markdown.contains("source: https://example.com/article\n"));
        assert!(markdown.contains("fetched_at: 2025-06-01T12:00:00Z\n"));
        assert!(markdown.contains("# Cache Design"));
        assert!(markdown.contains("## Eviction"));
        assert!(markdown.contains("**fixed**"));
        assert!(markdown.contains("[the LRU notes](https://example.com/docs/lru)"));
        assert!(markdown.contains("- bounded capacity\n- recency refresh"));
        assert!(markdown.contains("```\nstore.put(key, value);\n```"));
    }

    #[test]
    fn test_render_html_drops_boilerplate() {
        let markdown = render_html(ARTICLE, &base(), &fixed_time());

        assert!(!markdown.contains("alert"));
        assert!(!markdown.contains("color: red"));
        assert!(!markdown.contains("copyright"));
        assert!(!markdown.contains("Home"));
    }

    #[test]
    fn test_render_ordered_list() {
        let html = "<body><ol><li>first</li><li>second</li></ol></body>";
        let markdown = render_html(html, &base(), &fixed_time());
        assert!(markdown.contains("1. first\n2. second"));
    }

    #[test]
    fn test_render_untitled_page() {
        let markdown = render_html("<body><p>hello</p></body>", &base(), &fixed_time());
        assert!(markdown.contains("title: Untitled"));
        assert!(markdown.contains("hello"));
    }

    #[test]
    fn test_title_with_colon_is_quoted() {
        let html = "<head><title>Rust: ownership</title></head><body></body>";
        let markdown = render_html(html, &base(), &fixed_time());
        assert!(markdown.contains("title: \"Rust: ownership\""));
    }

    #[test]
    fn test_relative_links_resolve_against_base() {
        let html = r#"<body><p><a href="sibling">next</a></p></body>"#;
        let markdown = render_html(html, &base(), &fixed_time());
        assert!(markdown.contains("[next](https://example.com/sibling)"));
    }

    #[test]
    fn test_non_http_links_render_as_text() {
        let html = r#"<body><p><a href="javascript:void(0)">click</a></p></body>"#;
        let markdown = render_html(html, &base(), &fixed_time());
        assert!(markdown.contains("click"));
        assert!(!markdown.contains("javascript"));
    }

    fn response(content_type: &str, body: &'static str) -> FetchResponse {
        FetchResponse {
            url: base(),
            final_url: base(),
            status: StatusCode::OK,
            content_type: Some(content_type.to_string()),
            bytes: Bytes::from_static(body.as_bytes()),
            fetch_ms: 3,
        }
    }

    #[test]
    fn test_render_page_plain_text_passthrough() {
        let rendered = render_page(&response("text/plain; charset=utf-8", "just text\n"), &fixed_time()).unwrap();
        assert!(rendered.contains("title: Untitled"));
        assert!(rendered.ends_with("just text"));
    }

    #[test]
    fn test_render_page_rejects_binary() {
        let result = render_page(&response("application/pdf", "%PDF-1.4"), &fixed_time());
        assert!(matches!(result, Err(Error::ExtractFailed(_))));
    }

    #[test]
    fn test_render_page_defaults_to_html() {
        let mut resp = response("text/html", "<body><p>content</p></body>");
        resp.content_type = None;
        let rendered = render_page(&resp, &fixed_time()).unwrap();
        assert!(rendered.contains("content"));
    }
}
