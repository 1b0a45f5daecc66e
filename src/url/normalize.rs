use crate::UrlError;
use url::Url;

/// Query parameters that identify a click source rather than the resource
const TRACKING_PARAMS: &[&str] = &["ref", "source", "fbclid", "gclid", "mc_eid"];

/// Strips tracking query parameters from a URL before it is requested
///
/// Removes every `utm_*` parameter along with `ref` and `source`. The
/// remaining parameters keep their original order, and an emptied query
/// string is dropped entirely. Fragments are removed since they are never
/// sent to the server anyway.
///
/// # Examples
///
/// ```
/// use sole_scout::url::clean_url;
///
/// let url = clean_url("https://site.com/p?utm_source=x&id=7").unwrap();
/// assert_eq!(url.as_str(), "https://site.com/p?id=7");
/// ```
pub fn clean_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    Ok(url)
}

/// Checks if a query parameter is a tracking parameter
pub fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}

/// Resolves a listing href against the page it was found on
///
/// Returns None for hrefs that can never point at a product page.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute.to_string()),
        _ => None,
    }
}
