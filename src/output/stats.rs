//! Statistics reporting.

use console::style;

use crate::download::DownloadState;

/// Print statistics for a downloaded work.
pub fn print_work_stats(state: &DownloadState) {
    let work_name = state.work_name.as_deref().unwrap_or("unknown");
    let artist_name = state.artist_name.as_deref().unwrap_or("unknown");

    println!();
    println!(
        "{}",
        style(format!("Work {} \"{}\" by {}:", state.work_id, work_name, artist_name)).bold()
    );
    println!("  Pages:      {}", state.page_count);
    println!("  Downloaded: {}", style(state.downloaded_count).green());
    println!("  Skipped:    {} (already present)", style(state.skipped_count).yellow());
    println!("  Written:    {}", format_bytes(state.bytes_written));
    if let Some(path) = &state.metadata_path {
        println!("  Metadata:   {}", path.display());
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MiB");
    }
}
