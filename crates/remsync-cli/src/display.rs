//! Styled summary output

use console::style;
use remsync_types::TransferCounters;

/// Print the end-of-run summary
pub fn print_summary(counters: &TransferCounters) {
    println!();
    println!("{}", style("Upload Summary:").bold().underlined());
    println!("  Files uploaded: {}", style(counters.uploaded).green());
    println!("  Files skipped: {}", style(counters.skipped).yellow());
    println!(
        "  Size transferred: {}",
        style(format_bytes(counters.total_bytes)).cyan()
    );
    if counters.errors > 0 {
        println!("  Errors: {}", style(counters.errors).red());
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}
