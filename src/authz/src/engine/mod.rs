//! Role resolution engine
//!
//! Orchestrates ACL discovery, authorization loading, matching and
//! aggregation, with optional caching and metrics.

pub mod cache;
pub mod config;
pub mod metrics;

pub use cache::{CacheStats, RoleCache};
pub use config::{CacheConfig, EngineConfig};
pub use metrics::{EngineMetrics, MetricsCollector};

use crate::acl::{matches, AclLocator, Authorization, AuthorizationLoader, AuthorizationParser};
use crate::error::{Result, WebAcError};
use crate::resource::ResourceNode;
use crate::roles::{aggregate, RoleMap};
use crate::store::{ResourceStore, StoreSession};

use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of one uncached resolution, kept for metrics
struct Resolution {
    roles: RoleMap,
    acl_found: bool,
    evaluated: usize,
    matched: usize,
}

/// Resolves the effective WebAC roles of a resource
///
/// # Pipeline
///
/// ```text
/// resource → AclLocator → AuthorizationLoader → matches() → aggregate() → RoleMap
///                ↓ none                                          ↑
///                └──────────────── empty RoleMap ────────────────┘
/// ```
///
/// The provider holds no per-call state and can be shared across tasks;
/// every call reads through the session it is given.
pub struct WebAcRolesProvider {
    locator: AclLocator,
    loader: AuthorizationLoader,

    /// Optional role cache
    cache: Option<Arc<RoleCache>>,

    /// Optional metrics collector
    metrics: Option<Arc<MetricsCollector>>,

    config: EngineConfig,
}

impl WebAcRolesProvider {
    /// Create a provider parsing authorizations from property triples
    pub fn new(config: EngineConfig) -> Self {
        let loader = AuthorizationLoader::new(config.repository_prefix.clone());
        Self::build(config, loader)
    }

    /// Create a provider with a custom authorization parser
    pub fn with_parser(config: EngineConfig, parser: Arc<dyn AuthorizationParser>) -> Self {
        Self::build(config, AuthorizationLoader::with_parser(parser))
    }

    fn build(config: EngineConfig, loader: AuthorizationLoader) -> Self {
        let cache = config
            .enable_cache
            .then(|| Arc::new(RoleCache::new(config.cache.clone())));
        let metrics = config.enable_metrics.then(|| Arc::new(MetricsCollector::new()));

        info!(
            "WebAcRolesProvider initialized with prefix={}, cache={}, metrics={}",
            config.repository_prefix, config.enable_cache, config.enable_metrics
        );

        Self {
            locator: AclLocator::new(config.repository_prefix.clone()),
            loader,
            cache,
            metrics,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve the role map of `resource`.
    ///
    /// No reachable ACL yields an empty map. Store read failures are
    /// returned as errors rather than collapsing into "no grants".
    ///
    /// With the cache enabled, a session opened before an invalidation may
    /// still have its result cached; prefer [`Self::resolve_roles_at`], which
    /// opens the session itself.
    pub async fn resolve_roles(&self, session: &dyn StoreSession, resource: &ResourceNode) -> Result<RoleMap> {
        let generation = self.cache_generation();
        self.resolve_since(session, resource, generation).await
    }

    /// Open a session on `store` and resolve the resource at `path`
    pub async fn resolve_roles_at(&self, store: &dyn ResourceStore, path: &str) -> Result<RoleMap> {
        // Captured before the snapshot so invalidations after it discard the result
        let generation = self.cache_generation();

        let session = store.session().await?;
        let resource = session
            .find(path)
            .await?
            .ok_or_else(|| WebAcError::ResourceNotFound(path.to_string()))?;

        self.resolve_since(session.as_ref(), &resource, generation).await
    }

    fn cache_generation(&self) -> u64 {
        self.cache.as_ref().map_or(0, |cache| cache.generation())
    }

    async fn resolve_since(
        &self,
        session: &dyn StoreSession,
        resource: &ResourceNode,
        generation: u64,
    ) -> Result<RoleMap> {
        let start = Instant::now();

        if let Some(cache) = &self.cache {
            if let Some(roles) = cache.get(resource) {
                if let Some(metrics) = &self.metrics {
                    metrics.record_cache_hit().await;
                    metrics.record_latency(start.elapsed()).await;
                }

                debug!("Cache hit for {}", resource.path);
                return Ok(roles);
            }

            if let Some(metrics) = &self.metrics {
                metrics.record_cache_miss().await;
            }
        }

        let resolution = match self.resolve_uncached(session, resource).await {
            Ok(resolution) => resolution,
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    if e.is_store_failure() {
                        metrics.record_store_error().await;
                    }
                }
                return Err(e);
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics
                .record_resolution(resolution.acl_found, resolution.evaluated, resolution.matched)
                .await;
            metrics.record_latency(start.elapsed()).await;
        }

        if let Some(cache) = &self.cache {
            if !cache.put(resource, resolution.roles.clone(), generation) {
                debug!("Discarded role map for {}: cache invalidated during resolution", resource.path);
            }
        }

        Ok(resolution.roles)
    }

    /// Resolve several resources against one session.
    ///
    /// Maps come back in input order; the first failure aborts the batch.
    pub async fn resolve_many(&self, session: &dyn StoreSession, resources: &[ResourceNode]) -> Result<Vec<RoleMap>> {
        let pending = resources.iter().map(|resource| self.resolve_roles(session, resource));
        let roles = try_join_all(pending).await?;

        debug!("Resolved {} resources in one session", roles.len());
        Ok(roles)
    }

    async fn resolve_uncached(&self, session: &dyn StoreSession, resource: &ResourceNode) -> Result<Resolution> {
        // Step 1: nearest governing ACL
        let Some(located) = self.locator.locate(session, resource).await? else {
            return Ok(Resolution {
                roles: RoleMap::new(),
                acl_found: false,
                evaluated: 0,
                matched: 0,
            });
        };

        // Step 2: authorizations of that ACL
        let authorizations = self.loader.load(session, &located.acl).await?;

        // Step 3: keep those scoped to the subject path or the resource's own types
        let matching: Vec<&Authorization> = authorizations
            .iter()
            .filter(|auth| matches(auth, &located.subject_path, &resource.types))
            .collect();

        debug!(
            "{} of {} authorizations in {} match {} (subject {})",
            matching.len(),
            authorizations.len(),
            located.acl.path,
            resource.path,
            located.subject_path
        );

        // Step 4: union per principal
        let roles = aggregate(matching.iter().copied());

        Ok(Resolution {
            roles,
            acl_found: true,
            evaluated: authorizations.len(),
            matched: matching.len(),
        })
    }

    /// Drop every cached role map
    pub fn invalidate_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
            info!("Role cache invalidated");
        }
    }

    /// Drop cached role maps for `path` and its descendants
    pub fn invalidate_subtree(&self, path: &str) {
        if let Some(cache) = &self.cache {
            let removed = cache.invalidate_subtree(path);
            debug!("Invalidated {} cached role maps under {}", removed, path);
        }
    }

    pub async fn get_metrics(&self) -> Option<EngineMetrics> {
        match &self.metrics {
            Some(metrics) => Some(metrics.get_metrics().await),
            None => None,
        }
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }
}

impl Default for WebAcRolesProvider {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
