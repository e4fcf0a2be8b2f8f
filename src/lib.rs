//! sharefetch - downloader for browser-rendered shared folders.
//!
//! This library crawls a paginated, JavaScript-rendered shared-folder
//! listing through a real browser session and downloads every file it
//! exposes, using only the filesystem side effects of the browser's
//! download manager as evidence of progress.
//!
//! # Features
//!
//! - Stability-based detection of "the listing finished rendering"
//! - Catalog deduplication by query-stripped canonical address
//! - Pagination with confirmed advances and a strict termination rule
//! - Two-phase transfer waits (begin, then complete) with bounded retries
//! - Idempotent re-runs: files already on disk are skipped
//!
//! # Example
//!
//! ```no_run
//! use sharefetch::output::RunLog;
//! use sharefetch::session::ChromeSession;
//! use sharefetch::{Config, Crawler, Downloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let session = ChromeSession::launch(true).await?;
//!     session.allow_downloads_to(&config.options.output_directory).await?;
//!     let log = RunLog::disabled();
//!
//!     let report = Crawler::new(&session, &config, &log)
//!         .run("https://example.com/s/abc123")
//!         .await?;
//!     let summary = Downloader::new(&session, &config, &log)
//!         .run(&report.catalog)
//!         .await?;
//!
//!     println!("downloaded {} of {}", summary.succeeded, summary.total);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;
pub mod session;

// Re-exports for convenience
pub use catalog::{Catalog, Item};
pub use config::Config;
pub use crawl::{CrawlReport, Crawler};
pub use download::{DownloadOutcome, Downloader, RunSummary};
pub use error::{Error, Result};
