//! Per-session search state: package loading and query ranking.
//!
//! One [`SearchSession`] owns the index for its lifetime. Package batches are built
//! on the blocking pool and appended under a single write lock, so readers never
//! observe half a package. Concurrent loads of the same package share one build via
//! a shared future. A new query cancels the previous one's token; a superseded
//! ranking returns `None`.

use crate::config::SearchConfig;
use crate::docs::{RawModuleDocs, index_package, read_docs_file};
use crate::error::Result;
use crate::search::{Metric, PackageId, Query, RankedEntry, SearchIndex, SkippedModule, rank_with};
use anyhow::Context;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared, join_all};
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tokio_util::sync::CancellationToken;

/// Type alias for shared package load futures.
type SharedLoad = Shared<BoxFuture<'static, std::result::Result<LoadSummary, String>>>;

/// Outcome of loading one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub package: PackageId,
    pub modules: usize,
    pub entries: usize,
    pub skipped: Vec<SkippedModule>,
    /// `false` when the package was already in the index.
    pub appended: bool,
}

impl LoadSummary {
    fn already_loaded(package: PackageId) -> Self {
        Self {
            package,
            modules: 0,
            entries: 0,
            skipped: Vec::new(),
            appended: false,
        }
    }
}

/// A ranking computed against one index generation.
struct CachedRanking {
    generation: u64,
    results: Arc<Vec<RankedEntry>>,
}

/// Shared state for one search session.
pub struct SearchSession {
    /// The append-only index
    index: Arc<RwLock<SearchIndex>>,

    /// In-flight package loads (can be awaited by multiple callers)
    in_flight: Mutex<HashMap<PackageId, SharedLoad>>,

    /// LRU cache of ranked queries
    cache: Mutex<LruCache<String, CachedRanking>>,

    /// Token of the most recent query
    latest: Mutex<CancellationToken>,

    metric: Metric,
    limit: usize,
}

impl std::fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("metric", &self.metric)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(&SearchConfig::default())
    }
}

impl SearchSession {
    pub fn new(config: &SearchConfig) -> Self {
        let cache_size = NonZeroUsize::new(config.cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            index: Arc::new(RwLock::new(SearchIndex::new())),
            in_flight: Mutex::new(HashMap::new()),
            cache: Mutex::new(LruCache::new(cache_size)),
            latest: Mutex::new(CancellationToken::new()),
            metric: config.metric,
            limit: config.limit,
        }
    }

    /// Default result limit from configuration.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Read access to the index.
    pub async fn index(&self) -> RwLockReadGuard<'_, SearchIndex> {
        self.index.read().await
    }

    /// Index one package, waiting for an in-flight load of the same package if any.
    pub async fn load_package(
        &self,
        package: PackageId,
        modules: Vec<RawModuleDocs>,
    ) -> std::result::Result<LoadSummary, String> {
        if self.index.read().await.contains_package(&package) {
            tracing::debug!("Package {} already indexed", package);
            return Ok(LoadSummary::already_loaded(package));
        }

        let shared = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(future) = in_flight.get(&package) {
                tracing::debug!("Awaiting in-flight load for {}", package);
                future.clone()
            } else {
                let future = Self::build_and_append(self.index.clone(), package.clone(), modules)
                    .boxed()
                    .shared();
                in_flight.insert(package.clone(), future.clone());
                future
            }
        };

        let result = shared.await;

        self.in_flight.lock().await.remove(&package);
        if matches!(result, Ok(LoadSummary { appended: true, .. })) {
            self.cache.lock().await.clear();
        }

        result
    }

    async fn build_and_append(
        index: Arc<RwLock<SearchIndex>>,
        package: PackageId,
        modules: Vec<RawModuleDocs>,
    ) -> std::result::Result<LoadSummary, String> {
        tracing::info!("Indexing package {}", package);

        let batch = tokio::task::spawn_blocking(move || index_package(package, modules))
            .await
            .map_err(|e| format!("Indexing task failed: {}", e))?;

        let mut summary = LoadSummary {
            package: batch.package.clone(),
            modules: batch.modules.len(),
            entries: batch.entries.len(),
            skipped: batch.skipped.clone(),
            appended: false,
        };
        summary.appended = index.write().await.append(batch);
        Ok(summary)
    }

    /// Read a local docs dump and index it.
    pub async fn load_file(&self, package: PackageId, path: &Path) -> Result<LoadSummary> {
        let modules = read_docs_file(&package, path).await?;
        self.load_package(package.clone(), modules)
            .await
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Failed to load {}", package))
    }

    /// Index several packages concurrently.
    pub async fn load_packages(
        &self,
        packages: Vec<(PackageId, Vec<RawModuleDocs>)>,
    ) -> Vec<std::result::Result<LoadSummary, String>> {
        join_all(
            packages
                .into_iter()
                .map(|(package, modules)| self.load_package(package, modules)),
        )
        .await
    }

    /// Supersede any in-flight query and return the new query's token.
    pub(crate) async fn begin_query(&self) -> CancellationToken {
        let mut latest = self.latest.lock().await;
        latest.cancel();
        *latest = CancellationToken::new();
        latest.clone()
    }

    /// Rank the index against `query`, returning at most `limit` results.
    ///
    /// Returns `Ok(None)` when a newer query superseded this one before it finished.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Option<Vec<RankedEntry>>> {
        let key = query.trim().to_string();
        let token = self.begin_query().await;

        let generation = self.index.read().await.generation();
        if let Some(cached) = self.cache.lock().await.get(&key)
            && cached.generation == generation
        {
            tracing::debug!("Cache hit for query {:?}", key);
            return Ok(Some(cached.results.iter().take(limit).cloned().collect()));
        }

        let Some(parsed) = Query::parse(&key) else {
            return Ok(Some(Vec::new()));
        };

        let start = std::time::Instant::now();
        let index = self.index.clone();
        let metric = self.metric;
        let worker_token = token.clone();
        let ranked = tokio::task::spawn_blocking(move || {
            if worker_token.is_cancelled() {
                return None;
            }
            let index = index.blocking_read();
            let results: Vec<RankedEntry> = rank_with(&parsed, index.entries(), metric)
                .into_iter()
                .map(RankedEntry::from)
                .collect();
            Some((index.generation(), results))
        })
        .await
        .context("Ranking task failed")?;

        let Some((generation, results)) = ranked.filter(|_| !token.is_cancelled()) else {
            tracing::debug!("Query {:?} superseded", key);
            return Ok(None);
        };

        tracing::info!(
            "Ranked {:?}: {} results in {:?}",
            key,
            results.len(),
            start.elapsed()
        );

        let truncated = results.iter().take(limit).cloned().collect();
        self.cache.lock().await.put(
            key,
            CachedRanking {
                generation,
                results: Arc::new(results),
            },
        );
        Ok(Some(truncated))
    }
}
