//! Package-release API wire schemas.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/package_releases/update`.
///
/// Target resolution uses `package_release_id` when present, otherwise
/// `package_name_with_version` in `name@version` form. Every mutable field is
/// a partial-update slot: missing (or JSON `null`) means "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePackageReleaseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_release_id: Option<String>,

    /// `name@version` selector, consulted only when `package_release_id` is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name_with_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,

    /// Setting `true` demotes every other latest release of the same package.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_latest: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fs_sha: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_to_build: Option<bool>,

    /// Setting `true` also stamps a placeholder `ai_review_text` on the release.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_review_requested: Option<bool>,
}

impl UpdatePackageReleaseRequest {
    /// Whether any mutable field carries an explicit value.
    ///
    /// The selector fields do not count; a body that only names a release is
    /// still an empty delta.
    pub fn has_update_fields(&self) -> bool {
        self.is_locked.is_some()
            || self.is_latest.is_some()
            || self.license.is_some()
            || self.fs_sha.is_some()
            || self.ready_to_build.is_some()
            || self.ai_review_requested.is_some()
    }
}

/// Uniform success body for mutation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
