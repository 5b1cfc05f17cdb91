//! Pixiv Downloader - a session-aware pixiv work downloader
//!
//! This library provides functionality for logging in to pixiv and downloading
//! the pages of a work.
//!
//! # Features
//!
//! - Login and logout with a persisted cookie session
//! - Work metadata extraction from the work page
//! - Single-page illustrations and multi-page manga
//! - Configurable naming templates
//! - Ordered concurrent page downloads
//! - JSON metadata sidecars
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use pixiv_downloader::{download_work, Config, DownloadRequest, PixivApi};
//! use pixiv_downloader::api::CookieFile;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let api = PixivApi::new(&config.client)?;
//!     CookieFile::new(config.cookie_file()).load_into(api.jar(), &api.cookie_urls())?;
//!
//!     let request = DownloadRequest::from_config(&config, "123".to_string());
//!     let state = download_work(&api, &request).await?;
//!     println!("{} page(s) written", state.downloaded_count);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;
pub mod work;

// Re-exports for convenience
pub use api::{PixivApi, SessionState};
pub use config::Config;
pub use download::{download_work, DownloadRequest, DownloadState};
pub use error::{Error, Result};
pub use work::{Artist, Page, Work, WorkType};
