use crate::UrlError;
use url::Url;

/// Canonicalizes a raw href into a comparable absolute URL
///
/// # Normalization Steps
///
/// 1. Resolve the href against the base URL per standard URL-resolution
///    rules (relative paths, protocol-relative refs, absolute URLs)
/// 2. Strip the fragment component
///
/// Scheme, host, path, and query are otherwise left untouched. The result
/// is the identity used for all link-target deduplication, so the function
/// is idempotent: normalizing an already-normalized URL yields the same
/// value.
///
/// # Arguments
///
/// * `href` - The raw href string as found in the page
/// * `base` - The URL of the page the href was found on
///
/// # Returns
///
/// * `Ok(Url)` - Canonical absolute URL
/// * `Err(UrlError)` - The href cannot be resolved to a URL
pub fn normalize_href(href: &str, base: &Url) -> Result<Url, UrlError> {
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Parse("empty href".to_string()));
    }

    let mut resolved = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("'{}': {}", href, e)))?;

    resolved.set_fragment(None);

    if resolved.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(resolved)
}

/// Strips the fragment from an already-absolute URL
///
/// Used to canonicalize a fetched page's own URL before it enters the
/// statistics tables.
pub fn strip_fragment(url: &Url) -> Url {
    let mut canonical = url.clone();
    canonical.set_fragment(None);
    canonical
}
