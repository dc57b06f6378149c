// Fetch-with-retry over provider queries.
//
// A fetch checks the response cache first, then runs the query up to
// `max_attempts` times with a fixed delay between failures. It never returns
// an error: the outcome says whether data arrived, the provider had nothing,
// or every attempt failed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::provider::cache::{CacheStats, ResponseCache};
use crate::provider::ProviderError;
use crate::table::{ColumnCase, Table};

/// Result of a fetch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The provider returned at least one row.
    Success(Arc<Table>),
    /// The provider answered but had no rows (or reported not-found).
    NotFound,
    /// Every attempt failed.
    Exhausted { attempts: u32, last_error: String },
}

impl FetchOutcome {
    pub fn table(&self) -> Option<&Table> {
        match self {
            FetchOutcome::Success(t) => Some(t.as_ref()),
            _ => None,
        }
    }

    /// The table on success, an empty table otherwise.
    pub fn into_table(self) -> Arc<Table> {
        match self {
            FetchOutcome::Success(t) => t,
            _ => Arc::new(Table::empty()),
        }
    }
}

/// Retry policy plus the session's response cache.
#[derive(Debug)]
pub struct Fetcher {
    max_attempts: u32,
    retry_delay: Duration,
    column_case: ColumnCase,
    cache: ResponseCache,
}

impl Fetcher {
    pub fn new(max_attempts: u32, retry_delay: Duration, column_case: ColumnCase, cache: ResponseCache) -> Self {
        Fetcher {
            max_attempts: max_attempts.max(1),
            retry_delay,
            column_case,
            cache,
        }
    }

    pub fn from_config(config: &ProviderConfig, cache: ResponseCache) -> Self {
        Fetcher::new(
            config.max_attempts,
            Duration::from_millis(config.retry_delay_ms),
            config.column_case,
            cache,
        )
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Run `query` with retries. With a `cache_key`, a stored answer is
    /// returned without calling the provider, and any answer the provider
    /// gives (rows or none) is stored for later calls. Exhausted retries are
    /// never stored.
    pub async fn fetch<F, Fut>(&mut self, cache_key: Option<&str>, mut query: F) -> FetchOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Table, ProviderError>>,
    {
        if let Some(key) = cache_key {
            if let Some(table) = self.cache.get(key) {
                debug!(key, "cache hit");
                // An empty entry records an earlier not-found answer.
                if table.is_empty() {
                    return FetchOutcome::NotFound;
                }
                return FetchOutcome::Success(table);
            }
        }

        let mut last_error = String::new();
        for attempt in 1..=self.max_attempts {
            match query().await {
                Ok(mut table) => {
                    if table.is_empty() {
                        debug!(?cache_key, "provider returned no rows");
                        self.remember_not_found(cache_key);
                        return FetchOutcome::NotFound;
                    }
                    table.normalize_headers(self.column_case);
                    let table = Arc::new(table);
                    if let Some(key) = cache_key {
                        self.cache.put(key, Arc::clone(&table));
                    }
                    return FetchOutcome::Success(table);
                }
                Err(e) if !e.is_transient() => {
                    debug!(?cache_key, "provider reported not found: {e}");
                    self.remember_not_found(cache_key);
                    return FetchOutcome::NotFound;
                }
                Err(e) => {
                    warn!(attempt, max_attempts = self.max_attempts, ?cache_key, "provider query failed: {e}");
                    last_error = e.to_string();
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        FetchOutcome::Exhausted {
            attempts: self.max_attempts,
            last_error,
        }
    }

    fn remember_not_found(&mut self, cache_key: Option<&str>) {
        if let Some(key) = cache_key {
            self.cache.put(key, Arc::new(Table::empty()));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
