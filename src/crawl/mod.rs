//! Listing crawl: stability waits, link collection, pagination.

pub mod collect;
pub mod crawler;
pub mod paginate;
pub mod stability;

pub use collect::collect_items;
pub use crawler::{CrawlReport, Crawler};
pub use stability::{GrowthOpts, WaitOpts};
