//! Search-results parser
//!
//! Each result on an image search page is an `<a class="iusc">` anchor
//! carrying its metadata as a JSON blob in the `m` attribute. The blob
//! occasionally arrives with literal HTML-escaped quote entities, so a
//! failed decode is retried once after entity normalization. Decode
//! failures are per-anchor: the anchor is skipped and the page continues.

use scraper::{Html, Selector};
use serde::Deserialize;

/// One extracted image reference, before any download or dedup decision
///
/// Page order is preserved by the parser; it determines the sequence
/// numbers of accepted filenames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Direct URL of the full-size image
    pub image_url: String,

    /// URL of the page the image appeared on
    pub source_page_url: Option<String>,

    /// Thumbnail URL
    pub thumbnail_url: Option<String>,

    /// Result title
    pub title: Option<String>,
}

/// Wire shape of the `m` attribute payload
#[derive(Debug, Deserialize)]
struct ResultBlob {
    murl: Option<String>,
    purl: Option<String>,
    turl: Option<String>,
    #[serde(rename = "t")]
    title: Option<String>,
}

/// Parses one page of search-results markup into ordered candidates
///
/// Pure function of its input: re-parsing identical markup yields an
/// identical sequence. Returns an empty vector (not an error) when the
/// page has no result anchors, which is the pagination termination
/// signal for the crawl loop.
pub fn parse_results(html: &str) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    let mut candidates = Vec::new();

    if let Ok(selector) = Selector::parse("a.iusc") {
        for anchor in document.select(&selector) {
            let raw = match anchor.value().attr("m") {
                Some(raw) => raw,
                None => continue,
            };

            let blob = match decode_blob(raw) {
                Some(blob) => blob,
                None => {
                    tracing::debug!("Skipping result anchor with undecodable metadata");
                    continue;
                }
            };

            // A result without an image URL is invalid; drop it silently
            let image_url = match blob.murl {
                Some(url) if !url.is_empty() => url,
                _ => continue,
            };

            candidates.push(Candidate {
                image_url,
                source_page_url: blob.purl.filter(|p| !p.is_empty()),
                thumbnail_url: blob.turl,
                title: blob.title,
            });
        }
    }

    candidates
}

/// Decodes the metadata payload, retrying once after entity normalization
fn decode_blob(raw: &str) -> Option<ResultBlob> {
    match serde_json::from_str(raw) {
        Ok(blob) => Some(blob),
        Err(_) => {
            let normalized = html_escape::decode_html_entities(raw);
            serde_json::from_str(normalized.as_ref()).ok()
        }
    }
}
