//! facetdoc-web
//!
//! Two-route web UI over a search index: `GET /` lists every document,
//! `POST /add` stores a new one from a form submission.

pub mod error;
pub mod handlers;
pub mod render;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use facetdoc_core::traits::IndexProvider;

pub use error::ApiError;

/// Shared by every request. Holds no mutable state of its own.
#[derive(Clone)]
pub struct AppState {
    pub indexes: Arc<dyn IndexProvider>,
    /// Index the handlers read from and write to.
    pub index_name: Arc<str>,
}

impl AppState {
    pub fn new(indexes: Arc<dyn IndexProvider>, index_name: impl Into<Arc<str>>) -> Self {
        Self { indexes, index_name: index_name.into() }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_documents))
        .route("/add", post(handlers::add_document))
        .with_state(state)
}
