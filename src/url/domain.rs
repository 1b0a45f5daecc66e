use crate::UrlError;
use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sole_scout::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Nike.com/w?q=dunk").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.nike.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Key under which a session is kept for a URL
///
/// Host plus explicit port, so two servers on the same host never share
/// cookies.
pub fn session_key(url: &Url) -> Result<String, UrlError> {
    let domain = extract_domain(url).ok_or(UrlError::MissingDomain)?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", domain, port),
        None => domain,
    })
}

/// Origin of a URL with a trailing slash, used as the Referer header
pub fn origin_of(url: &Url) -> Result<String, UrlError> {
    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }
    Ok(format!("{}/", url.origin().ascii_serialization()))
}
