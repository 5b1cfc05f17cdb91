//! Progress indicators for session requests and page downloads.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(120);

/// Spinner shown while a login or logout round trip is in flight.
pub fn create_session_spinner(action: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner().with_message(format!("{}...", action));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(TICK);
    spinner
}

/// Bar counting the pages of one work, written or skipped.
pub fn create_page_bar(work_id: &str, pages: u64) -> ProgressBar {
    let bar = ProgressBar::new(pages).with_prefix(format!("work {}", work_id));
    if let Ok(style) =
        ProgressStyle::with_template("{prefix:.bold} [{wide_bar:.cyan/blue}] {pos}/{len} pages ({eta})")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}
