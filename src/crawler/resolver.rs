//! Link resolution for a fetched page
//!
//! Turns the hyperlinks of a parsed document into the absolute, normalized,
//! same-site URLs that have not been visited yet. Output order follows the
//! order of `<a href>` elements in the document, which in turn fixes the
//! order siblings are crawled in.

use crate::crawler::frontier::VisitedSet;
use crate::url::{normalize_parsed, same_site};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Capability to find follow-up URLs in a page
pub trait LinkResolver: Send + Sync {
    fn resolve_links(
        &self,
        current_url: &Url,
        root_domain: &str,
        document: &Html,
        visited: &VisitedSet,
    ) -> Vec<String>;
}

/// Default resolver: same registrable domain, unvisited, fragment-free
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainLinkResolver;

impl LinkResolver for DomainLinkResolver {
    fn resolve_links(
        &self,
        current_url: &Url,
        root_domain: &str,
        document: &Html,
        visited: &VisitedSet,
    ) -> Vec<String> {
        resolve_links(current_url, root_domain, document, visited)
    }
}

/// Extracts the crawlable links of a document
///
/// # Link Rules
///
/// **Include** `<a href="...">` elements whose target, resolved against
/// `current_url` and normalized (fragment removed), is:
/// - HTTP or HTTPS
/// - on the same registrable domain as `root_domain`
/// - not in `visited`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - repeats of a URL already returned for this document
///
/// The function is pure: identical inputs give identical ordered output.
///
/// # Example
///
/// ```
/// use page_harvest::crawler::{resolve_links, VisitedSet};
/// use scraper::Html;
/// use url::Url;
///
/// let page = Url::parse("https://www.example.edu/admissions/").unwrap();
/// let html = Html::parse_document(r#"<a href="apply">Apply</a><a href="https://example.org/">Out</a>"#);
/// let links = resolve_links(&page, "example.edu", &html, &VisitedSet::default());
/// assert_eq!(links, vec!["https://www.example.edu/admissions/apply"]);
/// ```
pub fn resolve_links(
    current_url: &Url,
    root_domain: &str,
    document: &Html,
    visited: &VisitedSet,
) -> Vec<String> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        // Skip if it has the download attribute
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(absolute) = resolve_link(href, current_url) else {
            continue;
        };

        if !same_site(&absolute, root_domain) {
            tracing::trace!(url = %absolute, "Rejecting off-site link");
            continue;
        }

        let url = absolute.to_string();
        if visited.contains(&url) || !seen.insert(url.clone()) {
            continue;
        }

        links.push(url);
    }

    links
}

/// Resolves a link href to a normalized absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    // Relative and scheme-relative hrefs resolve against the current page
    let absolute = base_url.join(href).ok()?;
    normalize_parsed(absolute).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://www.example.edu/admissions/index.html").unwrap()
    }

    fn links_of(html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        resolve_links(&page_url(), "example.edu", &document, &VisitedSet::default())
    }

    #[test]
    fn test_includes_subdomain_link() {
        let links = links_of(r#"<a href="https://apply.example.edu/x">Apply</a>"#);
        assert_eq!(links, vec!["https://apply.example.edu/x"]);
    }

    #[test]
    fn test_excludes_other_domain() {
        let links = links_of(r#"<a href="https://example.org/x">Elsewhere</a>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_fragment_is_stripped_before_dedup() {
        let links = links_of(
            r##"<a href="https://example.edu/page#section">A</a>
                <a href="https://example.edu/page">B</a>"##,
        );
        assert_eq!(links, vec!["https://example.edu/page"]);
    }

    #[test]
    fn test_fragment_of_visited_page_is_excluded() {
        let document =
            Html::parse_document(r##"<a href="#apply">Jump</a><a href="/page#top">Page</a>"##);
        let visited: VisitedSet = [
            "https://www.example.edu/admissions/index.html",
            "https://www.example.edu/page",
        ]
        .into_iter()
        .collect();

        let links = resolve_links(&page_url(), "example.edu", &document, &visited);
        assert!(links.is_empty());
    }

    #[test]
    fn test_relative_links_resolve_against_current_page() {
        let links = links_of(
            r#"<a href="deadlines">Deadlines</a>
               <a href="/tuition">Tuition</a>
               <a href="../about/">About</a>"#,
        );
        assert_eq!(
            links,
            vec![
                "https://www.example.edu/admissions/deadlines",
                "https://www.example.edu/tuition",
                "https://www.example.edu/about/",
            ]
        );
    }

    #[test]
    fn test_scheme_relative_link() {
        let links = links_of(r#"<a href="//apply.example.edu/start">Start</a>"#);
        assert_eq!(links, vec!["https://apply.example.edu/start"]);
    }

    #[test]
    fn test_excludes_visited() {
        let document = Html::parse_document(
            r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#,
        );
        let visited: VisitedSet = ["https://www.example.edu/b"].into_iter().collect();

        let links = resolve_links(&page_url(), "example.edu", &document, &visited);
        assert_eq!(
            links,
            vec!["https://www.example.edu/a", "https://www.example.edu/c"]
        );
    }

    #[test]
    fn test_document_order_is_preserved() {
        let links = links_of(
            r#"<nav><a href="/c">C</a></nav>
               <main><a href="/a">A</a><p><a href="/b">B</a></p></main>"#,
        );
        assert_eq!(
            links,
            vec![
                "https://www.example.edu/c",
                "https://www.example.edu/a",
                "https://www.example.edu/b",
            ]
        );
    }

    #[test]
    fn test_skips_special_schemes_and_downloads() {
        let links = links_of(
            r#"<a href="javascript:void(0)">JS</a>
               <a href="mailto:admissions@example.edu">Mail</a>
               <a href="tel:+15555550100">Call</a>
               <a href="data:text/html,hi">Data</a>
               <a href="ftp://example.edu/file">FTP</a>
               <a href="/brochure.pdf" download>Brochure</a>
               <a href="">Empty</a>"#,
        );
        assert!(links.is_empty());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let document = Html::parse_document(
            r#"<a href="/x">X</a><a href="https://sub.example.edu/y">Y</a><a href="/x">X again</a>"#,
        );
        let visited = VisitedSet::default();

        let first = resolve_links(&page_url(), "example.edu", &document, &visited);
        let second = resolve_links(&page_url(), "example.edu", &document, &visited);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_trait_object_delegates() {
        let resolver: &dyn LinkResolver = &DomainLinkResolver;
        let document = Html::parse_document(r#"<a href="/x">X</a>"#);
        let links = resolver.resolve_links(
            &page_url(),
            "example.edu",
            &document,
            &VisitedSet::default(),
        );
        assert_eq!(links, vec!["https://www.example.edu/x"]);
    }
}
