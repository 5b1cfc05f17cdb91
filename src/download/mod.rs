//! Download module for works.
//!
//! This module provides:
//! - Download state tracking
//! - Page resolution and fetching
//! - Metadata sidecars
//! - The per-work download pipeline

pub mod metadata;
pub mod pages;
pub mod pipeline;
pub mod state;

pub use metadata::write_metadata;
pub use pages::{fetch_pages, resolve_pages};
pub use pipeline::{download_work, DownloadRequest};
pub use state::{DownloadState, PageOutcome};
