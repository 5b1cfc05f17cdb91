//! Filesystem module.
//!
//! Provides:
//! - Naming template rendering and filename sanitizing
//! - Page and metadata target paths

pub mod naming;
pub mod paths;

pub use naming::{render_template, sanitize_path_component, NamingContext};
pub use paths::{metadata_path, plan_page_targets, work_folder, PageTarget};
