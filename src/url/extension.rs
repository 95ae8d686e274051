use url::Url;

/// Recognized image extensions, normalized form
const KNOWN_EXTENSIONS: &[&str] = &["jpg", "png", "gif", "bmp", "webp"];

/// Guesses a file extension from an image URL's path suffix
///
/// Only the URL path is considered, never the query string. `jpeg` is
/// normalized to `jpg`. Anything unrecognized, including URLs that fail to
/// parse or paths without a suffix, falls back to `jpg`.
///
/// # Examples
///
/// ```
/// use image_seine::url::guess_extension;
///
/// assert_eq!(guess_extension("https://img.example.com/a/photo.PNG"), "png");
/// assert_eq!(guess_extension("https://img.example.com/a/photo.jpeg"), "jpg");
/// assert_eq!(guess_extension("https://img.example.com/a/photo"), "jpg");
/// ```
pub fn guess_extension(image_url: &str) -> &'static str {
    let path = match Url::parse(image_url) {
        Ok(url) => url.path().to_string(),
        Err(_) => return "jpg",
    };

    let tail = match path.rsplit_once('.') {
        Some((_, tail)) => tail.to_lowercase(),
        None => return "jpg",
    };

    if tail == "jpeg" {
        return "jpg";
    }

    KNOWN_EXTENSIONS
        .iter()
        .find(|&&ext| ext == tail)
        .copied()
        .unwrap_or("jpg")
}
