use crate::error::RegistryError;
use crate::server::guards::auth::SessionAuth;
use crate::server::router::RegistryState;
use axum::extract::rejection::JsonRejection;
use axum::{Json, extract::State};
use packbay_schema::{GetPackageResponse, OkResponse, PackageSelector, StarPackageRequest};
use tracing::debug;

/// `POST /api/packages/add_star` (auth: session).
///
/// Accepts `{"package_id": ...}` or `{"name": ...}`. The association row and
/// the denormalized `star_count` are updated inside one store message, so
/// callers may treat them as moving atomically.
pub(super) async fn add_star_handler(
    State(state): State<RegistryState>,
    auth: SessionAuth,
    payload: Result<Json<StarPackageRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, RegistryError> {
    let Json(selector) = payload?;
    debug!(account_id = %auth.account_id, selector = ?selector, "Incoming star request");

    state.store.star_package(&auth.account_id, selector).await?;

    Ok(Json(OkResponse::ok()))
}

/// `POST /api/packages/get` (auth: none).
///
/// Lookup by id or name; consumed by the client-side current-package resolver.
pub(super) async fn get_package_handler(
    State(state): State<RegistryState>,
    payload: Result<Json<PackageSelector>, JsonRejection>,
) -> Result<Json<GetPackageResponse>, RegistryError> {
    let Json(selector) = payload?;

    let package = state
        .store
        .get_package(selector)
        .await?
        .ok_or(RegistryError::PackageNotFound)?;

    Ok(Json(GetPackageResponse {
        ok: true,
        package: package.summary(),
    }))
}
