/// Prometheus metrics for the recipe catalog.
///
/// - HTTP request count, latency and in-flight requests (see [`middleware`])
/// - Catalog query counts and list result sizes
/// - Store failures and seeded rows
///
/// Everything registers into [`PROMETHEUS_REGISTRY`]; `/metrics` renders it
/// with [`gather_metrics`].
pub mod middleware;

pub use middleware::track_metrics;

use lazy_static::lazy_static;
use prometheus::{CounterVec, Gauge, Histogram, HistogramOpts, HistogramVec, Opts, Registry};

const NAMESPACE: &str = "recipe_catalog";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    // ============================================================================
    // HTTP Metrics
    // ============================================================================

    /// Total number of HTTP requests received
    ///
    /// Labels: method, path, status_code
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests")
            .namespace(NAMESPACE),
        &["method", "path", "status_code"]
    ).expect("Failed to create HTTP_REQUESTS_TOTAL metric");

    /// HTTP request duration in seconds
    ///
    /// Labels: method, path
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
        &["method", "path"]
    ).expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric");

    /// Number of HTTP requests currently being served
    pub static ref HTTP_REQUESTS_IN_FLIGHT: Gauge = Gauge::with_opts(
        Opts::new("http_requests_in_flight", "Number of HTTP requests being served")
            .namespace(NAMESPACE)
    ).expect("Failed to create HTTP_REQUESTS_IN_FLIGHT metric");

    // ============================================================================
    // Catalog Metrics
    // ============================================================================

    /// Catalog reads by operation
    ///
    /// Labels: operation (list_recipes, recipe_detail, categories, ingredients, stats, featured)
    pub static ref CATALOG_QUERIES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("catalog_queries_total", "Total number of catalog queries")
            .namespace(NAMESPACE),
        &["operation"]
    ).expect("Failed to create CATALOG_QUERIES_TOTAL metric");

    /// Number of recipes returned by filtered listings
    pub static ref RECIPE_LIST_RESULTS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "recipe_list_results",
            "Number of recipes returned per listing"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0])
    ).expect("Failed to create RECIPE_LIST_RESULTS metric");

    // ============================================================================
    // Store Metrics
    // ============================================================================

    /// Failed store operations
    ///
    /// Labels: operation
    pub static ref STORE_ERRORS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("store_errors_total", "Total number of failed store operations")
            .namespace(NAMESPACE),
        &["operation"]
    ).expect("Failed to create STORE_ERRORS_TOTAL metric");

    /// Rows created by seeding
    ///
    /// Labels: entity
    pub static ref SEEDED_ROWS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("seeded_rows_total", "Total number of rows created by seeding")
            .namespace(NAMESPACE),
        &["entity"]
    ).expect("Failed to create SEEDED_ROWS_TOTAL metric");
}

/// Register every metric with [`PROMETHEUS_REGISTRY`].
///
/// Fails with `AlreadyReg` when called twice in one process.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    // HTTP
    PROMETHEUS_REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))?;

    // Catalog
    PROMETHEUS_REGISTRY.register(Box::new(CATALOG_QUERIES_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(RECIPE_LIST_RESULTS.clone()))?;

    // Store
    PROMETHEUS_REGISTRY.register(Box::new(STORE_ERRORS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(SEEDED_ROWS_TOTAL.clone()))?;

    tracing::debug!("Registered Prometheus metrics");
    Ok(())
}

/// Render all registered metrics in the Prometheus text format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_after_init() {
        // The registry is process-global; another test may have registered first
        let _ = init_metrics();
        CATALOG_QUERIES_TOTAL.with_label_values(&["stats"]).inc();

        let metrics = gather_metrics();
        assert!(metrics.contains("recipe_catalog_catalog_queries_total"));
    }

    #[test]
    fn test_second_init_is_rejected() {
        let _ = init_metrics();
        assert!(init_metrics().is_err());
    }

    #[test]
    fn test_http_counter_increments() {
        let counter = HTTP_REQUESTS_TOTAL.with_label_values(&["GET", "/unit", "200"]);
        let before = counter.get();
        counter.inc();
        assert!(counter.get() >= before + 1.0);
    }
}
