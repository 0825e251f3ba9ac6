//! BookList: a small JSON API over a catalog of books.
//!
//! Routes:
//!
//! - `GET /` - plaintext welcome
//! - `GET /status` - health check
//! - `GET /api/v1/books?title=&author=&isbn=` - list, filtered
//! - `GET /api/v1/books/:id` - fetch one
//! - `POST /api/v1/books` - create, 201 with `Location`
//! - `PATCH /api/v1/books/:id` - partial update
//! - `DELETE /api/v1/books/:id` - delete, always 204

use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use config::AppConfig;
use models::storage::Backend;
use routes::{books, health::health_check, welcome};

#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(backend: Backend, config: AppConfig) -> Self {
        Self {
            backend,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .patch(books::update_book)
                .delete(books::delete_book),
        );

    Router::new()
        .route("/", get(welcome))
        .route("/status", get(health_check))
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
