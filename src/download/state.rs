//! Download state tracking.

use std::path::PathBuf;

/// Result of handling one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Bytes fetched and written.
    Written { path: PathBuf, bytes: u64 },
    /// Final file already present; nothing fetched.
    Skipped { path: PathBuf },
}

/// Per-work download state.
#[derive(Debug, Default)]
pub struct DownloadState {
    // Work info
    pub work_id: String,
    pub work_name: Option<String>,
    pub artist_name: Option<String>,
    pub page_count: usize,

    // Outputs
    pub written: Vec<PathBuf>,
    pub metadata_path: Option<PathBuf>,

    // Statistics
    pub downloaded_count: u64,
    pub skipped_count: u64,
    pub bytes_written: u64,
}

impl DownloadState {
    /// Create a new download state for a work.
    pub fn new(work_id: String) -> Self {
        Self {
            work_id,
            ..Default::default()
        }
    }

    /// Record the outcome of one page.
    pub fn record(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Written { path, bytes } => {
                self.downloaded_count += 1;
                self.bytes_written += bytes;
                self.written.push(path);
            }
            PageOutcome::Skipped { path } => {
                tracing::warn!("Skipped existing file: {}", path.display());
                self.skipped_count += 1;
            }
        }
    }
}
