//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Progress bars
//! - Statistics reporting

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    print_banner, print_download_summary, print_error, print_info, print_success, print_warning,
};
pub use progress::{create_page_bar, create_session_spinner};
pub use stats::print_work_stats;
