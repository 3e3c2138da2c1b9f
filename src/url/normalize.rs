use crate::UrlError;
use url::{form_urlencoded, Url};

/// List of tracking query parameters to remove during normalization
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
];

/// Normalizes a URL into the form used for visited-set comparison
///
/// The normalized URL is also the URL that gets fetched, so only changes
/// that never alter which resource a server returns are applied.
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not HTTP or HTTPS
/// 3. Reject URLs without a host
/// 4. Remove fragment (everything after #)
/// 5. Remove tracking query parameters, dropping an empty query string;
///    the remaining parameters keep their original text
///
/// Host lowercasing, dot-segment removal and the empty-path-to-`/` rule are
/// applied by the `url` parser itself.
///
/// # Examples
///
/// ```
/// use page_harvest::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.edu/page?utm_source=x#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.edu/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Normalizes an already parsed URL (see [`normalize_url`])
pub fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    if let Some(stripped) = url.query().and_then(strip_tracking_params) {
        url.set_query(Some(stripped.as_str()).filter(|q| !q.is_empty()));
    }

    Ok(url)
}

/// Removes tracking parameters from a raw query string
///
/// Returns `None` when nothing was removed. Kept parameters are copied
/// byte for byte, so their encoding and order are unchanged.
fn strip_tracking_params(query: &str) -> Option<String> {
    let segments: Vec<&str> = query.split('&').collect();
    let kept: Vec<&str> = segments
        .iter()
        .copied()
        .filter(|segment| !is_tracking_segment(segment))
        .collect();

    (kept.len() != segments.len()).then(|| kept.join("&"))
}

fn is_tracking_segment(segment: &str) -> bool {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map_or(false, |(key, _)| is_tracking_param(&key))
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
