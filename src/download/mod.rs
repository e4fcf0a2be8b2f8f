//! Download phase.
//!
//! This module provides:
//! - The per-item transfer state machine
//! - Batch orchestration over the catalog
//! - Outcome and summary types

pub mod batch;
pub mod state;
pub mod transfer;

pub use batch::Downloader;
pub use state::{DownloadOutcome, RunSummary, SkipReason};
pub use transfer::Transfer;
