//! Console output utilities.

use console::{style, StyledObject};

/// Severity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Info,
    Success,
    Warning,
    Error,
}

impl Status {
    fn label(self) -> StyledObject<&'static str> {
        match self {
            Status::Info => style("INFO").cyan().bold(),
            Status::Success => style("OK").green().bold(),
            Status::Warning => style("WARN").yellow().bold(),
            Status::Error => style("ERROR").red().bold(),
        }
    }
}

fn status_line(status: Status, message: &str) -> String {
    format!("{} {}", status.label(), message)
}

pub fn print_info(message: &str) {
    println!("{}", status_line(Status::Info, message));
}

pub fn print_success(message: &str) {
    println!("{}", status_line(Status::Success, message));
}

pub fn print_warning(message: &str) {
    println!("{}", status_line(Status::Warning, message));
}

/// Errors go to stderr so piped output stays clean.
pub fn print_error(message: &str) {
    eprintln!("{}", status_line(Status::Error, message));
}

/// Print the application banner.
pub fn print_banner() {
    println!(
        "{} {}",
        style("pixiv-downloader").magenta().bold(),
        style(env!("CARGO_PKG_VERSION")).dim()
    );
    println!("{}", style("illustrations, manga and their metadata").dim());
    println!();
}

/// Print the settings a download runs with.
pub fn print_download_summary(work_id: &str, directory: &str, concurrency: usize, metadata: bool) {
    let rows = [
        ("Work", work_id.to_string()),
        ("Directory", directory.to_string()),
        ("Concurrency", concurrency.to_string()),
        ("Metadata", if metadata { "yes" } else { "no" }.to_string()),
    ];

    println!("{}", style("Download:").bold());
    for (key, value) in rows {
        println!("  {:<12} {}", style(key).dim(), value);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_labels() {
        console::set_colors_enabled(false);

        assert_eq!(status_line(Status::Info, "checking"), "INFO checking");
        assert_eq!(status_line(Status::Success, "done"), "OK done");
        assert_eq!(status_line(Status::Warning, "skipped"), "WARN skipped");
        assert_eq!(status_line(Status::Error, "failed"), "ERROR failed");
    }
}
