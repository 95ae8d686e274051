//! Output handling for Image-Seine
//!
//! The metadata sink is the durable record of the run: one CSV row per
//! accepted image, in acceptance order across all keywords. The sink is
//! opened once at run start and kept open for the run's duration; any
//! write failure is fatal to the whole run.

mod csv_sink;

pub use csv_sink::MetadataSink;

/// A downloaded image that survived deduplication
///
/// Persisted exactly once, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedImage {
    /// The keyword that produced this image
    pub keyword: String,

    /// Path of the stored file, relative to the working directory
    pub local_path: String,

    /// Direct URL the image bytes were fetched from
    pub image_url: String,

    /// URL of the page the image appeared on (may be empty)
    pub source_page: String,

    /// Lowercase domain of the source page (empty when unknown)
    pub source_domain: String,
}
