//! Axum middleware recording per-request HTTP metrics

use super::{HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};
use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// Paths never recorded, so scrapes and probes do not skew request stats
const EXCLUDED_PATHS: &[&str] = &["/health", "/metrics"];

/// Count the request and observe its latency, labelled by the matched route
/// template so slugs do not explode label cardinality.
///
/// ```no_run
/// use axum::{middleware, Router};
/// use recipe_catalog::metrics::track_metrics;
///
/// let app: Router = Router::new().layer(middleware::from_fn(track_metrics));
/// ```
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    if EXCLUDED_PATHS.contains(&path.as_str()) {
        return next.run(req).await;
    }

    HTTP_REQUESTS_IN_FLIGHT.inc();
    let start = Instant::now();
    let response = next.run(req).await;
    HTTP_REQUESTS_IN_FLIGHT.dec();

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &path])
        .observe(duration);

    response
}
