pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::catalog::CatalogService;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        Self {
            catalog,
            started_at: Instant::now(),
        }
    }
}
