//! Configuration module for the pixiv-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Writing the defaults on first run
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{ClientConfig, Config, DownloadConfig, LoginConfig, LogoutConfig, Naming};
pub use validation::{parse_work_id, validate_config, MAX_CONCURRENCY};
