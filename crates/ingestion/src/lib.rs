//! PaperNest Ingestion
//!
//! Pulls paper metadata from the arXiv Atom API and upserts it into the
//! PaperNest store:
//! 1. Builds the search query and fetches the feed (rate limited)
//! 2. Decodes the Atom document and converts entries to paper records
//! 3. Upserts each paper by canonical id
//! 4. Repeats on a fixed schedule

pub mod client;
pub mod errors;
pub mod feed;
pub mod identity;
pub mod pipeline;
pub mod scheduler;
pub mod text;

#[cfg(test)]
mod testing;

pub use client::{ArxivClient, FetchParams};
pub use errors::{EntryError, IngestionError};
pub use feed::{Conversion, Feed};
pub use pipeline::{CycleReport, Pipeline};
pub use scheduler::{CycleRunner, Schedule, Scheduler, SchedulerHandle, SchedulerState};
