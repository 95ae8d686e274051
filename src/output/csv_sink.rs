use crate::output::AcceptedImage;
use crate::SeineError;
use std::fs::File;
use std::path::Path;

/// Column order of the metadata file
const HEADER: [&str; 5] = [
    "keyword",
    "local_path",
    "image_url",
    "source_page",
    "source_domain",
];

/// Append-only CSV sink for accepted-image metadata
///
/// Rows are written in acceptance order and flushed immediately, so the
/// file on disk always reflects every image accepted so far.
pub struct MetadataSink {
    writer: csv::Writer<File>,
}

impl MetadataSink {
    /// Creates the metadata file and writes the header row
    ///
    /// Truncates any existing file at `path`. Parent directories are
    /// created as needed.
    pub fn create(path: &Path) -> Result<Self, SeineError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(HEADER)?;
        writer.flush()?;

        Ok(Self { writer })
    }

    /// Appends one accepted-image record
    ///
    /// Errors here are fatal to the run; the caller must not continue
    /// accepting images once an append has failed.
    pub fn append(&mut self, record: &AcceptedImage) -> Result<(), SeineError> {
        self.writer.write_record([
            record.keyword.as_str(),
            record.local_path.as_str(),
            record.image_url.as_str(),
            record.source_page.as_str(),
            record.source_domain.as_str(),
        ])?;
        self.writer.flush()?;
        Ok(())
    }
}
