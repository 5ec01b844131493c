//! Partial-update payloads and target selectors for store mutations.

use packbay_schema::UpdatePackageReleaseRequest;
use serde::{Deserialize, Serialize};

/// Stub review text stamped whenever a release requests an AI review. Stands
/// in for the async review pipeline with an immediate synchronous result.
pub const AI_REVIEW_PLACEHOLDER: &str = "Placeholder AI Review Text";

/// Field-level patch for a package release.
///
/// `None` => do not change; `Some(v)` => update. Explicit `false` / empty
/// strings are real values, not "absent".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleasePatch {
    pub is_locked: Option<bool>,
    pub is_latest: Option<bool>,
    pub license: Option<String>,
    pub fs_sha: Option<String>,
    pub ready_to_build: Option<bool>,
    pub ai_review_requested: Option<bool>,
}

impl ReleasePatch {
    pub fn is_empty(&self) -> bool {
        self.is_locked.is_none()
            && self.is_latest.is_none()
            && self.license.is_none()
            && self.fs_sha.is_none()
            && self.ready_to_build.is_none()
            && self.ai_review_requested.is_none()
    }
}

impl From<&UpdatePackageReleaseRequest> for ReleasePatch {
    fn from(req: &UpdatePackageReleaseRequest) -> Self {
        Self {
            is_locked: req.is_locked,
            is_latest: req.is_latest,
            license: req.license.clone(),
            fs_sha: req.fs_sha.clone(),
            ready_to_build: req.ready_to_build,
            ai_review_requested: req.ai_review_requested,
        }
    }
}

/// How an update request names its target release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReleaseSelector {
    ById(String),
    /// `name@version`; resolved through the package-name index.
    ByNameWithVersion(String),
}

impl ReleaseSelector {
    /// Selector precedence: an explicit id beats `name@version`. Returns
    /// `None` when the request names no target at all.
    pub fn from_request(req: &UpdatePackageReleaseRequest) -> Option<Self> {
        if let Some(id) = &req.package_release_id {
            return Some(Self::ById(id.clone()));
        }
        req.package_name_with_version
            .as_ref()
            .map(|nv| Self::ByNameWithVersion(nv.clone()))
    }
}
