//! URL handling module for Image-Seine
//!
//! Small helpers over candidate and source-page URLs: extracting the source
//! domain for metadata rows and guessing a file extension from an image
//! URL's path suffix.

mod domain;
mod extension;

// Re-export main functions
pub use domain::source_domain;
pub use extension::guess_extension;
