//! Metrics collection for role resolution

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Role resolution metrics
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    /// Total number of completed resolutions
    pub total_resolutions: u64,

    /// Resolutions that found a governing ACL
    pub acl_found: u64,

    /// Resolutions that ended without an ACL
    pub acl_missing: u64,

    /// Authorizations evaluated by the matcher
    pub authorizations_evaluated: u64,

    /// Authorizations that matched
    pub authorizations_matched: u64,

    /// Cache hits
    pub cache_hits: u64,

    /// Cache misses
    pub cache_misses: u64,

    /// Latency percentiles
    pub latency_p50_ms: f64,
    pub latency_p90_ms: f64,
    pub latency_p99_ms: f64,

    /// Average latency
    pub avg_latency_ms: f64,

    /// Store read failures surfaced to callers
    pub store_errors: u64,
}

impl EngineMetrics {
    /// Calculate cache hit rate
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }

    /// Fraction of evaluated authorizations that matched
    pub fn match_rate(&self) -> f64 {
        if self.authorizations_evaluated == 0 {
            0.0
        } else {
            self.authorizations_matched as f64 / self.authorizations_evaluated as f64
        }
    }
}

/// Metrics collector
pub struct MetricsCollector {
    metrics: Arc<RwLock<EngineMetrics>>,

    /// Latency samples for percentile calculation
    latency_samples: Arc<RwLock<Vec<f64>>>,

    max_samples: usize,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(RwLock::new(EngineMetrics::default())),
            latency_samples: Arc::new(RwLock::new(Vec::with_capacity(10_000))),
            max_samples: 10_000,
        }
    }

    pub async fn record_cache_hit(&self) {
        self.metrics.write().await.cache_hits += 1;
    }

    pub async fn record_cache_miss(&self) {
        self.metrics.write().await.cache_misses += 1;
    }

    /// Record a completed resolution
    pub async fn record_resolution(&self, acl_found: bool, evaluated: usize, matched: usize) {
        let mut metrics = self.metrics.write().await;
        metrics.total_resolutions += 1;
        metrics.authorizations_evaluated += evaluated as u64;
        metrics.authorizations_matched += matched as u64;

        if acl_found {
            metrics.acl_found += 1;
        } else {
            metrics.acl_missing += 1;
        }
    }

    pub async fn record_store_error(&self) {
        self.metrics.write().await.store_errors += 1;
    }

    /// Record resolution latency
    pub async fn record_latency(&self, latency: Duration) {
        let latency_ms = latency.as_secs_f64() * 1000.0;

        let mut samples = self.latency_samples.write().await;
        samples.push(latency_ms);

        if samples.len() > self.max_samples {
            samples.drain(0..1_000);
        }

        let mut metrics = self.metrics.write().await;

        let sum: f64 = samples.iter().sum();
        metrics.avg_latency_ms = sum / samples.len() as f64;

        let mut sorted = samples.clone();
        sorted.sort_by(f64::total_cmp);

        metrics.latency_p50_ms = Self::percentile(&sorted, 0.50);
        metrics.latency_p90_ms = Self::percentile(&sorted, 0.90);
        metrics.latency_p99_ms = Self::percentile(&sorted, 0.99);
    }

    /// Current metrics snapshot
    pub async fn get_metrics(&self) -> EngineMetrics {
        self.metrics.read().await.clone()
    }

    pub async fn reset(&self) {
        *self.metrics.write().await = EngineMetrics::default();
        self.latency_samples.write().await.clear();
    }

    /// Export metrics in Prometheus text format
    pub async fn export_prometheus(&self) -> String {
        let metrics = self.metrics.read().await;

        format!(
            r#"# HELP webac_resolutions_total Total number of role resolutions
# TYPE webac_resolutions_total counter
webac_resolutions_total {}

# HELP webac_acl_found_total Resolutions that found a governing ACL
# TYPE webac_acl_found_total counter
webac_acl_found_total {}

# HELP webac_acl_missing_total Resolutions without a governing ACL
# TYPE webac_acl_missing_total counter
webac_acl_missing_total {}

# HELP webac_authorizations_matched_total Authorizations that matched
# TYPE webac_authorizations_matched_total counter
webac_authorizations_matched_total {}

# HELP webac_cache_hits_total Cache hits
# TYPE webac_cache_hits_total counter
webac_cache_hits_total {}

# HELP webac_latency_seconds Resolution latency percentiles
# TYPE webac_latency_seconds summary
webac_latency_seconds{{quantile="0.5"}} {}
webac_latency_seconds{{quantile="0.9"}} {}
webac_latency_seconds{{quantile="0.99"}} {}

# HELP webac_store_errors_total Store read failures
# TYPE webac_store_errors_total counter
webac_store_errors_total {}
"#,
            metrics.total_resolutions,
            metrics.acl_found,
            metrics.acl_missing,
            metrics.authorizations_matched,
            metrics.cache_hits,
            metrics.latency_p50_ms / 1000.0,
            metrics.latency_p90_ms / 1000.0,
            metrics.latency_p99_ms / 1000.0,
            metrics.store_errors,
        )
    }

    fn percentile(sorted: &[f64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }

        let idx = ((sorted.len() as f64) * p) as usize;
        sorted[idx.min(sorted.len() - 1)]
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
