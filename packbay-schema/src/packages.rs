//! Package API wire schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Either-of-two selector used by `POST /api/packages/add_star` and
/// `POST /api/packages/get`: a body carrying `package_id` or `name`.
///
/// Untagged so the two request shapes deserialize without a discriminator;
/// `package_id` is tried first, matching the lookup precedence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackageSelector {
    ById { package_id: String },
    ByName { name: String },
}

/// Request body for `POST /api/packages/add_star`.
pub type StarPackageRequest = PackageSelector;

/// Public projection of a package record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub package_id: String,
    pub name: String,
    pub star_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response body for `POST /api/packages/get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPackageResponse {
    pub ok: bool,
    pub package: PackageSummary,
}
