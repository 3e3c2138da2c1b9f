use url::{Host, Url};

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (which shouldn't happen for valid HTTP(S) URLs), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use page_harvest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the registrable domain of a hostname
///
/// The registrable domain is the public suffix plus one label, looked up in
/// the Public Suffix List: `apply.example.edu` → `example.edu`,
/// `news.bbc.co.uk` → `bbc.co.uk`. Hosts that have no label beyond a public
/// suffix (`localhost`, `co.uk`) and IP addresses are their own registrable
/// domain, so a crawl rooted at them still matches itself.
///
/// # Examples
///
/// ```
/// use page_harvest::url::registrable_domain;
///
/// assert_eq!(registrable_domain("apply.example.edu"), "example.edu");
/// assert_eq!(registrable_domain("WWW.Example.co.uk"), "example.co.uk");
/// assert_eq!(registrable_domain("127.0.0.1"), "127.0.0.1");
/// ```
pub fn registrable_domain(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_lowercase();

    if is_ip_literal(&host) {
        return host;
    }

    psl::domain_str(&host)
        .map(str::to_string)
        .unwrap_or(host)
}

/// Returns true if `url` belongs to the same registrable domain as `root_domain`
///
/// `root_domain` may be given with or without subdomain labels; only the
/// registrable parts are compared, so `www.example.edu` and
/// `apply.example.edu` are the same site while `example.org` is not.
pub fn same_site(url: &Url, root_domain: &str) -> bool {
    let host = match url.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        None => return false,
    };

    registrable_domain(&host) == registrable_domain(root_domain)
}

fn is_ip_literal(host: &str) -> bool {
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    bare.parse::<std::net::IpAddr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_mixed_case() {
        let url = Url::parse("https://Example.COM/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_registrable_domain_strips_subdomains() {
        assert_eq!(registrable_domain("apply.example.edu"), "example.edu");
        assert_eq!(registrable_domain("www.example.edu"), "example.edu");
        assert_eq!(registrable_domain("a.b.c.example.edu"), "example.edu");
        assert_eq!(registrable_domain("example.edu"), "example.edu");
    }

    #[test]
    fn test_registrable_domain_multi_label_suffix() {
        assert_eq!(registrable_domain("news.bbc.co.uk"), "bbc.co.uk");
        assert_eq!(registrable_domain("foo.co.uk"), "foo.co.uk");
    }

    #[test]
    fn test_registrable_domain_ip_and_single_label() {
        assert_eq!(registrable_domain("127.0.0.1"), "127.0.0.1");
        assert_eq!(registrable_domain("localhost"), "localhost");
    }

    #[test]
    fn test_same_site_accepts_subdomain() {
        let url = Url::parse("https://apply.example.edu/x").unwrap();
        assert!(same_site(&url, "example.edu"));
        assert!(same_site(&url, "www.example.edu"));
    }

    #[test]
    fn test_same_site_rejects_other_domain() {
        let url = Url::parse("https://example.org/x").unwrap();
        assert!(!same_site(&url, "example.edu"));
    }

    #[test]
    fn test_same_site_is_not_a_substring_match() {
        let lookalike = Url::parse("https://example.edu.evil.com/").unwrap();
        assert!(!same_site(&lookalike, "example.edu"));

        let prefixed = Url::parse("https://notexample.edu/").unwrap();
        assert!(!same_site(&prefixed, "example.edu"));
    }

    #[test]
    fn test_same_site_is_suffix_aware() {
        let uk = Url::parse("https://www.foo.co.uk/").unwrap();
        assert!(same_site(&uk, "foo.co.uk"));
        assert!(!same_site(&uk, "foo.co.us"));

        let other_uk = Url::parse("https://bar.co.uk/").unwrap();
        assert!(!same_site(&other_uk, "foo.co.uk"));
    }

    #[test]
    fn test_same_site_ip_host() {
        let url = Url::parse("http://127.0.0.1:8080/page").unwrap();
        assert!(same_site(&url, "127.0.0.1"));
        assert!(!same_site(&url, "127.0.0.2"));
    }
}
