//! Run summary and catalog reporting.

use console::style;

use crate::catalog::Catalog;
use crate::download::state::RunSummary;

/// Print the final tally and the failed display names.
pub fn print_run_summary(summary: &RunSummary) {
    let failed = summary.failed_count();

    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!(
        "Total: {} | Downloaded: {} | Skipped: {} | Failed: {}",
        summary.total,
        style(summary.succeeded).green(),
        style(summary.skipped).yellow(),
        if failed > 0 {
            style(failed).red()
        } else {
            style(failed).green()
        },
    );
    for name in &summary.failed {
        println!("  {} {}", style("failed:").red(), name);
    }
    if let Some(reason) = &summary.aborted {
        println!("  {} {}", style("aborted:").red().bold(), reason);
    }
    println!("{}", style("═".repeat(50)).dim());
}

/// Enumerate the discovered catalog in discovery order.
pub fn print_catalog(catalog: &Catalog) {
    for (index, item) in catalog.iter().enumerate() {
        println!(
            "{:02}: {} ({})",
            index + 1,
            style(&item.display_name).bold(),
            item.source_url
        );
    }
}
