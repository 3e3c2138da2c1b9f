//! Page content extraction
//!
//! Two strategies are provided:
//! - [`MarkdownExtractor`]: takes `<main>` (or `<body>` when there is no
//!   `<main>`), strips link and image markup down to their text and converts
//!   the rest to markdown with `htmd`
//! - [`FullTextExtractor`]: every text node of the page on its own line
//!
//! Both run the result through [`clean_text`].

use crate::config::ExtractionMode;
use ego_tree::NodeRef;
use htmd::HtmlToMarkdown;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::{Arc, OnceLock};

/// Elements whose content is never page text
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "svg", "canvas", "head",
];

/// Elements without a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "wbr"];

/// Title and text of one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: String,
    pub text: String,
}

/// Capability to turn a parsed document into text
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, document: &Html) -> ExtractedContent;
}

/// Main-content extraction with markdown conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExtractor;

impl ContentExtractor for MarkdownExtractor {
    fn extract(&self, document: &Html) -> ExtractedContent {
        ExtractedContent {
            title: extract_title(document),
            text: extract_main_markdown(document),
        }
    }
}

/// Whole-page plain text extraction
#[derive(Debug, Clone, Copy, Default)]
pub struct FullTextExtractor;

impl ContentExtractor for FullTextExtractor {
    fn extract(&self, document: &Html) -> ExtractedContent {
        ExtractedContent {
            title: extract_title(document),
            text: extract_all_text(document),
        }
    }
}

/// Returns the extractor for a configured mode
pub fn extractor_for(mode: ExtractionMode) -> Arc<dyn ContentExtractor> {
    match mode {
        ExtractionMode::Markdown => Arc::new(MarkdownExtractor),
        ExtractionMode::Text => Arc::new(FullTextExtractor),
    }
}

/// Extracts the page title, or an empty string if there is none
///
/// Internal whitespace runs are collapsed to single spaces.
pub fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| {
            element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

/// Extracts all visible text, one text block per line
pub fn extract_all_text(document: &Html) -> String {
    let root = select_first(document, "body").unwrap_or_else(|| document.root_element());

    let lines: Vec<&str> = root
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) if !inside_skipped(node) => Some(text.trim()),
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect();

    clean_text(&lines.join("\n"))
}

/// Extracts the main content of a page as markdown-like text
///
/// Prefers the first `<main>` element and falls back to `<body>`. Headings,
/// lists, emphasis and code keep their markdown form; links and images are
/// reduced to their text and alt text.
pub fn extract_main_markdown(document: &Html) -> String {
    let scope = select_first(document, "main")
        .or_else(|| select_first(document, "body"))
        .unwrap_or_else(|| document.root_element());

    let mut html = String::new();
    write_stripped(*scope, &mut html);

    let converter = HtmlToMarkdown::builder()
        .skip_tags(SKIPPED_ELEMENTS.to_vec())
        .build();

    let markdown = match converter.convert(&html) {
        Ok(markdown) => markdown,
        Err(e) => {
            tracing::debug!(error = %e, "Markdown conversion failed, using plain text");
            scope.text().collect::<Vec<_>>().join(" ")
        }
    };

    clean_text(&unescape_markdown(&markdown))
}

/// Removes the backslash escapes `htmd` puts in front of literal text
///
/// Link and image markup is stripped before conversion, so every escaped
/// character outside a code fence is page text (`file\_name`, `2\*3`,
/// `\[draft\]`). Fenced code blocks are left as they are.
fn unescape_markdown(markdown: &str) -> String {
    if !markdown.contains('\\') {
        return markdown.to_string();
    }

    let mut in_code_fence = false;
    markdown
        .lines()
        .map(|line| {
            if line.trim_start().starts_with("```") {
                in_code_fence = !in_code_fence;
                return line.to_string();
            }
            if in_code_fence {
                return line.to_string();
            }
            markdown_escapes().replace_all(line, "$1").into_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalizes extracted text
///
/// - removes control characters other than newline and tab
/// - trims trailing whitespace on every line
/// - collapses runs of two or more blank lines into one
/// - strips leading and trailing blank lines
pub fn clean_text(text: &str) -> String {
    let without_controls: String = text
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();

    let trimmed_lines = without_controls
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");

    blank_line_runs()
        .replace_all(&trimmed_lines, "\n\n")
        .trim_matches('\n')
        .to_string()
}

fn blank_line_runs() -> &'static Regex {
    static BLANK_LINE_RUNS: OnceLock<Regex> = OnceLock::new();
    BLANK_LINE_RUNS.get_or_init(|| Regex::new(r"\n{3,}").expect("blank line pattern is valid"))
}

fn markdown_escapes() -> &'static Regex {
    static MARKDOWN_ESCAPES: OnceLock<Regex> = OnceLock::new();
    MARKDOWN_ESCAPES.get_or_init(|| {
        Regex::new(r"\\([\\`*_{}\[\]()#+\-.!|~<>])").expect("markdown escape pattern is valid")
    })
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

fn inside_skipped(node: NodeRef<'_, Node>) -> bool {
    node.ancestors().any(|ancestor| {
        ancestor
            .value()
            .as_element()
            .map_or(false, |element| SKIPPED_ELEMENTS.contains(&element.name()))
    })
}

/// Serializes a subtree with link and image markup removed
///
/// `<a>` is replaced by its children and `<img>` by its alt text, so the
/// markdown converter never sees them. Attributes are dropped; the
/// converter only needs element names.
fn write_stripped(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&html_escape::encode_text(&**text)),
        Node::Element(element) => {
            let name = element.name();

            if SKIPPED_ELEMENTS.contains(&name) {
                return;
            }

            match name {
                "a" => write_children(node, out),
                "img" => {
                    if let Some(alt) = element.attr("alt").map(str::trim).filter(|a| !a.is_empty()) {
                        out.push_str(&html_escape::encode_text(alt));
                    }
                }
                _ if VOID_ELEMENTS.contains(&name) => {
                    out.push('<');
                    out.push_str(name);
                    out.push('>');
                }
                _ => {
                    out.push('<');
                    out.push_str(name);
                    out.push('>');
                    write_children(node, out);
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
        }
        Node::Document | Node::Fragment => write_children(node, out),
        _ => {}
    }
}

fn write_children(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        write_stripped(child, out);
    }
}
