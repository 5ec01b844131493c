use super::extract::UpdateReleasePreprocess;
use crate::error::RegistryError;
use crate::server::router::RegistryState;
use axum::{Json, extract::State};
use packbay_schema::OkResponse;
use tracing::debug;

/// `POST /api/package_releases/update` (auth: none).
///
/// Resolution, the empty-delta check, sibling demotion, and the target merge
/// all run inside one store message; a `{"ok":true}` response means the
/// at-most-one-latest invariant holds for the touched package.
pub(super) async fn update_release_handler(
    State(state): State<RegistryState>,
    UpdateReleasePreprocess(selector, patch): UpdateReleasePreprocess,
) -> Result<Json<OkResponse>, RegistryError> {
    debug!(selector = ?selector, "Incoming release update");

    state.store.update_release(selector, patch).await?;

    Ok(Json(OkResponse::ok()))
}
