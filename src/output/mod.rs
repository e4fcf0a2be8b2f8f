//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Spinners for long bounded waits
//! - Run summary reporting
//! - The per-run transition log

pub mod console;
pub mod log;
pub mod progress;
pub mod stats;

pub use console::{
    print_banner, print_config_summary, print_error, print_info, print_success, print_warning,
};
pub use log::RunLog;
pub use progress::create_spinner;
pub use stats::{print_catalog, print_run_summary};
