//! Fetch, convert and store: one ingestion cycle
//!
//! Entry-level problems are logged and counted but never abort the cycle.
//! Only a failed fetch or an undecodable response does.

use crate::client::{ArxivClient, FetchParams};
use crate::errors::IngestionError;
use crate::feed::Feed;
use crate::scheduler::CycleRunner;
use async_trait::async_trait;
use papernest_common::config::ArxivConfig;
use papernest_common::metrics::{record_cycle, record_entries_skipped};
use papernest_common::PaperStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Outcome counts of one cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Entries present in the feed
    pub fetched: usize,
    /// Papers upserted
    pub stored: usize,
    /// Entries that could not be converted
    pub skipped: usize,
    /// Papers whose upsert failed
    pub failed: usize,
}

/// The ingestion pipeline: client, search parameters and store
#[derive(Clone)]
pub struct Pipeline {
    client: ArxivClient,
    store: Arc<dyn PaperStore>,
    params: FetchParams,
}

impl Pipeline {
    pub fn new(client: ArxivClient, store: Arc<dyn PaperStore>, params: FetchParams) -> Self {
        Self { client, store, params }
    }

    /// Build the client and search parameters from configuration
    pub fn from_config(config: &ArxivConfig, store: Arc<dyn PaperStore>) -> Result<Self, IngestionError> {
        let client = ArxivClient::new(config)?;
        Ok(Self::new(client, store, FetchParams::from_config(config)))
    }

    pub fn params(&self) -> &FetchParams {
        &self.params
    }

    /// Fetch new papers and store them once
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> Result<CycleReport, IngestionError> {
        self.run_search("manual").await
    }

    /// Re-fetch specific papers by id and store them
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn refresh(&self, ids: &[String]) -> Result<CycleReport, IngestionError> {
        let started = Instant::now();
        let result = match self.client.fetch_by_ids(ids).await {
            Ok(feed) => Ok(self.store_feed(&feed).await),
            Err(e) => Err(e),
        };
        Self::finish("refresh", started, result)
    }

    async fn run_search(&self, trigger: &'static str) -> Result<CycleReport, IngestionError> {
        let started = Instant::now();
        info!(trigger, query = %self.params.search_query(), "Starting ingestion cycle");

        let result = match self.client.fetch_new(&self.params).await {
            Ok(feed) => Ok(self.store_feed(&feed).await),
            Err(e) => Err(e),
        };
        Self::finish(trigger, started, result)
    }

    /// Convert every entry and upsert the papers one by one
    async fn store_feed(&self, feed: &Feed) -> CycleReport {
        let conversion = feed.to_papers();

        for (index, err) in &conversion.skipped {
            warn!(index, reason = err.reason(), error = %err, "Skipping feed entry");
            record_entries_skipped(err.reason(), 1);
        }

        let mut report = CycleReport {
            fetched: feed.len(),
            skipped: conversion.skipped.len(),
            ..Default::default()
        };

        for paper in &conversion.papers {
            match self.store.upsert_paper(paper).await {
                Ok(()) => report.stored += 1,
                Err(e) => {
                    report.failed += 1;
                    error!(paper_id = %paper.id, error = %e, "Failed to store paper");
                }
            }
        }

        report
    }

    fn finish(
        trigger: &'static str,
        started: Instant,
        result: Result<CycleReport, IngestionError>,
    ) -> Result<CycleReport, IngestionError> {
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(report) => {
                info!(
                    trigger,
                    fetched = report.fetched,
                    stored = report.stored,
                    skipped = report.skipped,
                    failed = report.failed,
                    duration_secs = elapsed,
                    "Ingestion cycle complete"
                );
                record_cycle(trigger, true, report.stored as u64, report.failed as u64, elapsed);
            }
            Err(e) => {
                error!(trigger, kind = e.kind(), error = %e, "Ingestion cycle failed");
                record_cycle(trigger, false, 0, 0, elapsed);
            }
        }

        result
    }
}

#[async_trait]
impl CycleRunner for Pipeline {
    async fn run_cycle(&self) -> Result<CycleReport, IngestionError> {
        self.run_search("scheduled").await
    }
}
