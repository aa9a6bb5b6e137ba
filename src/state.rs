//! Shared application state for all routes. Built once at startup and never mutated.

use crate::config::Catalog;
use crate::source::EntitySource;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn EntitySource>,
    /// Entity allow-list.
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(source: Arc<dyn EntitySource>, catalog: Catalog) -> Self {
        AppState {
            source,
            catalog: Arc::new(catalog),
        }
    }
}
