use crate::server::router::RegistryState;
use axum::{Router, routing::post};

pub mod extract;
pub mod handlers;

pub fn router() -> Router<RegistryState> {
    Router::new().route(
        "/api/package_releases/update",
        post(handlers::update_release_handler),
    )
}
