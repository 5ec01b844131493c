use crate::error::RegistryError;
use crate::store::{ReleasePatch, ReleaseSelector};
use crate::utils::logging::debug_pretty_json;
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use tracing::debug;

use packbay_schema::UpdatePackageReleaseRequest;

pub(crate) struct UpdateReleasePreprocess(
    pub(crate) ReleaseSelector,
    pub(crate) ReleasePatch,
);

impl<S> FromRequest<S> for UpdateReleasePreprocess
where
    S: Send + Sync,
{
    type Rejection = RegistryError;

    /// Extract and validate a release-update request.
    ///
    /// Responsibilities:
    /// - Deserialize the HTTP JSON body into `UpdatePackageReleaseRequest`.
    /// - Split it into a target selector and a field-level patch.
    ///
    /// Error handling:
    /// - JSON syntax/schema errors from the `axum::Json` extractor become
    ///   `RegistryError::BadRequestBody` via its `From<JsonRejection>` impl.
    /// - A body naming no target at all is `package_release_not_found`: an
    ///   absent selector can never resolve, and resolution is checked before
    ///   the empty-delta validation.
    ///
    /// The empty-delta check itself stays in the store op, behind resolution,
    /// so an unresolvable selector with an empty delta still yields 404.
    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<UpdatePackageReleaseRequest>::from_request(req, &()).await?;

        let Some(selector) = ReleaseSelector::from_request(&body) else {
            return Err(RegistryError::PackageReleaseNotFound);
        };

        debug_pretty_json(&body, |pretty_body| {
            debug!(
                route = "package_releases/update",
                body = %pretty_body,
                "Extracted release-update request"
            );
        });

        Ok(Self(selector, ReleasePatch::from(&body)))
    }
}
