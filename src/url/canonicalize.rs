use crate::url::CanonicalUrl;
use crate::UrlError;

/// Explicit default HTTP port, removed wherever it marks a port
const DEFAULT_PORT_MARKER: &str = ":80";

/// Final segments that name a directory's default document
const INDEX_PAGES: &[&str] = &["index.htm", "index.html"];

/// Canonicalizes a raw URL string, discarding the reason on failure
///
/// This is the form used for discovered links: anything that cannot be
/// canonicalized (non-http schemes, empty input, missing host) is simply
/// skipped by the caller.
///
/// # Examples
///
/// ```
/// use topical_crawler::url::canonicalize;
///
/// let url = canonicalize("www.Example.com").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/");
///
/// assert!(canonicalize("mailto:someone@example.com").is_none());
/// ```
pub fn canonicalize(raw: &str) -> Option<CanonicalUrl> {
    try_canonicalize(raw).ok()
}

/// Canonicalizes a raw URL string
///
/// # Canonicalization Steps
///
/// 1. Reject empty input and any scheme other than `http`/`https`
/// 2. Strip the explicit default port marker `:80`
/// 3. Repair the prefix: add a missing `http://`, drop a leading `www.`
/// 4. Lowercase the host (the first segment after the scheme)
/// 5. Clean the final segment:
///    - `index.htm` / `index.html` is dropped
///    - a fragment is truncated, or the segment dropped if it is only a fragment
///    - a query not at the start of the segment is truncated
/// 6. Reassemble as `scheme://` followed by every segment and a `/`
///
/// The steps are reapplied until the string stops changing, so
/// `canonicalize(canonicalize(u)) == canonicalize(u)` for every accepted input.
///
/// # Arguments
///
/// * `raw` - The URL string to canonicalize
///
/// # Returns
///
/// * `Ok(CanonicalUrl)` - The canonical URL
/// * `Err(UrlError)` - The input is empty, malformed or not http(s)
pub fn try_canonicalize(raw: &str) -> Result<CanonicalUrl, UrlError> {
    let mut current = canonicalize_once(raw)?;

    loop {
        let next = canonicalize_once(&current)?;
        if next == current {
            return Ok(CanonicalUrl::new_unchecked(current));
        }
        current = next;
    }
}

/// Applies every canonicalization step once
fn canonicalize_once(raw: &str) -> Result<String, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let (scheme, remainder) = split_scheme(trimmed)?;
    let remainder = strip_default_port(remainder);

    let mut segments: Vec<String> = remainder.split('/').map(str::to_string).collect();
    drop_trailing_empty(&mut segments);

    // Host is lowercased and loses a leading www. token
    let host = segments[0].to_lowercase();
    segments[0] = match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    };

    let last = segments.len() - 1;
    match clean_last_segment(&segments[last]) {
        Some(word) => segments[last] = word,
        None if last == 0 => return Err(UrlError::MissingHost),
        None => {
            segments.pop();
            drop_trailing_empty(&mut segments);
        }
    }

    validate_host(&segments[0], trimmed)?;

    let mut assembled = format!("{}://", scheme);
    for segment in &segments {
        assembled.push_str(segment);
        assembled.push('/');
    }

    Ok(assembled)
}

/// Splits off the scheme, supplying `http` when none is present
///
/// A scheme is a leading run of ASCII letters followed by `:`; a colon
/// followed by a digit is a port (`localhost:8080`), not a scheme.
fn split_scheme(input: &str) -> Result<(&'static str, &str), UrlError> {
    match detect_scheme(input) {
        Some((name, rest)) => {
            let scheme = if name.eq_ignore_ascii_case("http") {
                "http"
            } else if name.eq_ignore_ascii_case("https") {
                "https"
            } else {
                return Err(UrlError::UnsupportedScheme(name.to_ascii_lowercase()));
            };

            let rest = rest
                .strip_prefix("//")
                .ok_or_else(|| UrlError::Malformed(input.to_string()))?;
            Ok((scheme, rest))
        }
        // Scheme-less and protocol-relative URLs default to http
        None => Ok(("http", input.strip_prefix("//").unwrap_or(input))),
    }
}

fn detect_scheme(input: &str) -> Option<(&str, &str)> {
    let (name, rest) = input.split_once(':')?;

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    Some((name, rest))
}

/// Removes every `:80` that is followed by `/` or ends the input
fn strip_default_port(input: &str) -> String {
    let mut stripped = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find(DEFAULT_PORT_MARKER) {
        let after = &rest[pos + DEFAULT_PORT_MARKER.len()..];
        stripped.push_str(&rest[..pos]);
        if !(after.is_empty() || after.starts_with('/')) {
            stripped.push_str(DEFAULT_PORT_MARKER);
        }
        rest = after;
    }

    stripped.push_str(rest);
    stripped
}

/// Cleans the last path word, returning `None` when it should be dropped
fn clean_last_segment(segment: &str) -> Option<String> {
    if INDEX_PAGES
        .iter()
        .any(|page| segment.eq_ignore_ascii_case(page))
    {
        return None;
    }

    let mut word = segment;

    if let Some(pos) = word.find('#') {
        if pos == 0 {
            return None;
        }
        word = &word[..pos];
    }

    if let Some(pos) = word.find('?') {
        if pos > 0 {
            word = &word[..pos];
        }
    }

    Some(word.to_string())
}

fn drop_trailing_empty(segments: &mut Vec<String>) {
    while segments.len() > 1 && segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
}

fn validate_host(host: &str, original: &str) -> Result<(), UrlError> {
    let name = host.split(':').next().unwrap_or(host);
    if name.is_empty() || name.starts_with(['?', '#']) {
        return Err(UrlError::MissingHost);
    }

    if host
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '\\' | '?' | '#'))
    {
        return Err(UrlError::Malformed(original.to_string()));
    }

    Ok(())
}
