//! arXiv API client
//!
//! One GET per call against the Atom query endpoint. After every response the
//! client waits the configured rate-limit delay before returning, so callers
//! issuing sequential requests stay within the API's usage policy.

use crate::errors::IngestionError;
use crate::feed::Feed;
use papernest_common::config::{ArxivConfig, FeedSortBy, FeedSortOrder};
use papernest_common::metrics::record_fetch;
use reqwest::{Client, Url};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Response bodies of failed requests are cut to this many bytes
const MAX_ERROR_BODY: usize = 2048;

/// Filters and ordering for a search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    pub max_results: u32,
    pub sort_by: FeedSortBy,
    pub sort_order: FeedSortOrder,
    /// Offset into the result set
    pub start: u32,
}

impl FetchParams {
    pub fn from_config(config: &ArxivConfig) -> Self {
        Self {
            categories: config.categories.clone(),
            keywords: config.keywords.clone(),
            max_results: config.max_results.max(1),
            sort_by: config.sort_by,
            sort_order: config.sort_order,
            start: 0,
        }
    }

    /// Build the `search_query` expression.
    ///
    /// Categories become `cat:` terms and keywords `all:` terms. Terms of one
    /// kind are OR-joined (parenthesized when there are several) and the two
    /// groups are AND-joined. No filters at all matches everything.
    pub fn search_query(&self) -> String {
        let groups: Vec<String> = [
            or_group("cat", &self.categories),
            or_group("all", &self.keywords),
        ]
        .into_iter()
        .flatten()
        .collect();

        if groups.is_empty() {
            "all:*".to_string()
        } else {
            groups.join(" AND ")
        }
    }
}

fn or_group(field: &str, values: &[String]) -> Option<String> {
    let terms: Vec<String> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| format!("{}:{}", field, v))
        .collect();

    match terms.len() {
        0 => None,
        1 => terms.into_iter().next(),
        _ => Some(format!("({})", terms.join(" OR "))),
    }
}

/// HTTP client for the arXiv Atom API
#[derive(Clone)]
pub struct ArxivClient {
    http: Client,
    base_url: Url,
    rate_limit_delay: Duration,
}

impl ArxivClient {
    pub fn new(config: &ArxivConfig) -> Result<Self, IngestionError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            IngestionError::Config(format!("Invalid arXiv base URL '{}': {}", config.base_url, e))
        })?;

        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url,
            rate_limit_delay: config.rate_limit_delay(),
        })
    }

    pub fn rate_limit_delay(&self) -> Duration {
        self.rate_limit_delay
    }

    /// Search for papers matching the filters
    #[instrument(skip(self), fields(query = %params.search_query()))]
    pub async fn fetch_new(&self, params: &FetchParams) -> Result<Feed, IngestionError> {
        let mut query = vec![
            ("search_query", params.search_query()),
            ("max_results", params.max_results.max(1).to_string()),
            ("sortBy", params.sort_by.as_str().to_string()),
            ("sortOrder", params.sort_order.as_str().to_string()),
        ];
        if params.start > 0 {
            query.push(("start", params.start.to_string()));
        }

        self.execute("search", &query).await
    }

    /// Fetch specific papers by id. An empty list returns an empty feed
    /// without touching the network.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn fetch_by_ids(&self, ids: &[String]) -> Result<Feed, IngestionError> {
        if ids.is_empty() {
            return Ok(Feed::default());
        }

        let query = vec![
            ("id_list", ids.join(",")),
            ("max_results", ids.len().to_string()),
        ];

        self.execute("id_list", &query).await
    }

    async fn execute(
        &self,
        kind: &'static str,
        query: &[(&str, String)],
    ) -> Result<Feed, IngestionError> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().extend_pairs(query);

        debug!(%url, "Requesting feed");
        let started = Instant::now();

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                record_fetch(started.elapsed().as_secs_f64(), kind, "transport_error");
                return Err(e.into());
            }
        };

        let result = Self::read_feed(response).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        record_fetch(started.elapsed().as_secs_f64(), kind, outcome);

        // A response arrived, so the upstream counted the request
        tokio::time::sleep(self.rate_limit_delay).await;

        result
    }

    async fn read_feed(response: reqwest::Response) -> Result<Feed, IngestionError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Upstream returned an error status");
            return Err(IngestionError::Fetch {
                status: status.as_u16(),
                body: truncate(body, MAX_ERROR_BODY),
            });
        }

        let feed = Feed::parse(&body)?;
        debug!(entries = feed.len(), total = ?feed.total_results(), "Feed decoded");
        Ok(feed)
    }
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut end = max;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}
