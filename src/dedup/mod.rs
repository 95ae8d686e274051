//! Content-addressed deduplication
//!
//! The dedup store is a run-wide registry of content digests for every
//! accepted image, shared across all keywords. It is owned by the
//! orchestrator and passed explicitly, never held in process-global state.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Run-wide registry of accepted content hashes
///
/// Grows monotonically for the lifetime of a run. No two accepted images
/// ever share a digest.
#[derive(Debug, Default)]
pub struct DedupStore {
    seen: HashSet<String>,
}

impl DedupStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically tests membership and inserts if absent
    ///
    /// Returns `true` if this is the first time the digest has been
    /// observed (the image should be kept), `false` for a duplicate.
    pub fn check_and_insert(&mut self, digest: &str) -> bool {
        self.seen.insert(digest.to_string())
    }

    /// Number of distinct digests accepted so far
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no digests have been accepted yet
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Computes the hex-encoded SHA-256 digest of a file's full contents
///
/// Reads in fixed-size chunks so large downloads are never buffered whole.
///
/// # Arguments
///
/// * `path` - Path of the downloaded file
///
/// # Returns
///
/// * `Ok(String)` - Hex digest over every byte of the file
/// * `Err(std::io::Error)` - File missing or unreadable
pub fn hash_file(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}
