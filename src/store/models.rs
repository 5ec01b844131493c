use chrono::{DateTime, Utc};
use packbay_schema::PackageSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Package {
    pub package_id: String,
    pub name: String,
    pub description: Option<String>,
    pub star_count: u64,
    pub created_at: DateTime<Utc>,
}

impl Package {
    /// Public wire projection served by the get-package endpoint.
    pub fn summary(&self) -> PackageSummary {
        PackageSummary {
            package_id: self.package_id.clone(),
            name: self.name.clone(),
            star_count: self.star_count,
            description: self.description.clone(),
            created_at: self.created_at,
        }
    }
}

/// A versioned snapshot of a package. Content (`fs_sha`) is immutable once
/// published; the flags and review fields are the mutable metadata layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageRelease {
    pub package_release_id: String,
    pub package_id: String,
    pub version: String,
    pub is_locked: bool,
    /// At most one release per package may carry this flag.
    pub is_latest: bool,
    pub ready_to_build: bool,
    pub ai_review_requested: bool,
    pub license: Option<String>,
    pub fs_sha: Option<String>,
    pub ai_review_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Many-to-many account/package row with a soft star toggle: unstarring keeps
/// the row with `is_starred = false` rather than deleting it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountPackage {
    pub account_package_id: String,
    pub account_id: String,
    pub package_id: String,
    pub is_starred: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
