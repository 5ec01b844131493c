use crate::server::router::RegistryState;
use axum::{Router, routing::post};

pub mod handlers;

pub fn router() -> Router<RegistryState> {
    Router::new()
        .route("/api/packages/add_star", post(handlers::add_star_handler))
        .route("/api/packages/get", post(handlers::get_package_handler))
}
