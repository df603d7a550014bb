use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Send metrics
    pub send_requests: IntCounterVec,
    pub send_duration: HistogramVec,

    // Credential metrics
    pub credential_issuances: IntCounter,
    pub credential_cache_hits: IntCounter,
    pub credential_refresh_retries: IntCounter,

    // Store metrics
    pub store_soft_failures: IntCounterVec,

    // Admin metrics
    pub admin_operations: IntCounterVec,

    // Runtime
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("pushrelay".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Send
            send_requests: IntCounterVec::new(Opts::new("send_requests_total", "Send requests by outcome"),&["outcome"],).unwrap(),
            send_duration: HistogramVec::new(HistogramOpts::new("send_duration_seconds", "Send request duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),&["method"],).unwrap(),

            // Credential
            credential_issuances: IntCounter::new("credential_issuances_total", "Upstream credentials issued").unwrap(),
            credential_cache_hits: IntCounter::new("credential_cache_hits_total", "Credential served from cache").unwrap(),
            credential_refresh_retries: IntCounter::new("credential_refresh_retries_total", "Sends retried after an invalid credential").unwrap(),

            // Store
            store_soft_failures: IntCounterVec::new(Opts::new("store_soft_failures_total", "Store failures ignored by the caller"),&["operation"],).unwrap(),

            // Admin
            admin_operations: IntCounterVec::new(Opts::new("admin_operations_total", "Token registry operations"),&["operation", "outcome"],).unwrap(),

            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.send_requests.clone())).unwrap();
        reg.register(Box::new(metrics.send_duration.clone())).unwrap();
        reg.register(Box::new(metrics.credential_issuances.clone())).unwrap();
        reg.register(Box::new(metrics.credential_cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.credential_refresh_retries.clone())).unwrap();
        reg.register(Box::new(metrics.store_soft_failures.clone())).unwrap();
        reg.register(Box::new(metrics.admin_operations.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
