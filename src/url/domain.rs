use url::Url;

/// Extracts the lowercase domain of a source page URL for metadata rows
///
/// Returns an empty string when the URL is absent, unparseable, or has no
/// host, so the metadata column is always present even for candidates whose
/// result blob carried no source page.
///
/// # Examples
///
/// ```
/// use image_seine::url::source_domain;
///
/// assert_eq!(source_domain(Some("https://Example.COM/post/1")), "example.com");
/// assert_eq!(source_domain(None), "");
/// assert_eq!(source_domain(Some("not a url")), "");
/// ```
pub fn source_domain(page_url: Option<&str>) -> String {
    page_url
        .and_then(|raw| Url::parse(raw).ok())
        .and_then(|url| url.host_str().map(|h| h.to_lowercase()))
        .unwrap_or_default()
}
