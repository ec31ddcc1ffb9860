use url::Url;

/// Extracts the origin (`scheme://host[:port]`) of an http(s) URL
///
/// The origin is where a site's robots.txt lives and is the cache key for
/// crawl policy. Hosts are lowercased by the parser and default ports are
/// omitted.
///
/// # Arguments
///
/// * `url` - The URL to extract the origin from
///
/// # Returns
///
/// * `Some(String)` - The serialized origin
/// * `None` - If the URL does not parse or is not http(s)
///
/// # Examples
///
/// ```
/// use topical_crawler::url::extract_origin;
///
/// assert_eq!(
///     extract_origin("https://Example.com/path/"),
///     Some("https://example.com".to_string())
/// );
/// assert_eq!(extract_origin("mailto:a@b.com"), None);
/// ```
pub fn extract_origin(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }

    parsed.host_str()?;
    Some(parsed.origin().ascii_serialization())
}
