//! Keyed registry collections with secondary indices.
//!
//! Primary maps are keyed by entity id; the indices (name, package/version,
//! account/package pair) are maintained on every write so the hot lookup
//! paths stay O(1). Mutation ops leave the store untouched whenever they
//! return an error.

use ahash::HashMap;
use chrono::Utc;
use packbay_schema::PackageSelector;
use tracing::debug;
use uuid::Uuid;

use super::models::{AccountPackage, Package, PackageRelease};
use super::patch::{AI_REVIEW_PLACEHOLDER, ReleasePatch, ReleaseSelector};
use crate::error::RegistryError;

fn fresh_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

#[derive(Debug, Default)]
pub struct Records {
    packages: HashMap<String, Package>,
    releases: HashMap<String, PackageRelease>,
    account_packages: HashMap<String, AccountPackage>,

    package_id_by_name: HashMap<String, String>,
    release_ids_by_package: HashMap<String, Vec<String>>,
    release_id_by_package_version: HashMap<(String, String), String>,
    account_package_id_by_pair: HashMap<(String, String), String>,
}

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a package under a fresh `pkg_` id. Names are unique: if one
    /// is already taken the existing record is returned unchanged.
    pub fn insert_package(&mut self, name: &str, description: Option<String>) -> Package {
        if let Some(id) = self.package_id_by_name.get(name) {
            return self.packages[id].clone();
        }
        let pkg = Package {
            package_id: fresh_id("pkg"),
            name: name.to_string(),
            description,
            star_count: 0,
            created_at: Utc::now(),
        };
        self.package_id_by_name
            .insert(pkg.name.clone(), pkg.package_id.clone());
        self.packages.insert(pkg.package_id.clone(), pkg.clone());
        pkg
    }

    /// Publishes a release row for an existing package. Idempotent on
    /// `(package_id, version)`.
    pub fn insert_release(
        &mut self,
        package_id: &str,
        version: &str,
    ) -> Result<PackageRelease, RegistryError> {
        if !self.packages.contains_key(package_id) {
            return Err(RegistryError::PackageNotFound);
        }
        let key = (package_id.to_string(), version.to_string());
        if let Some(id) = self.release_id_by_package_version.get(&key) {
            return Ok(self.releases[id].clone());
        }
        let release = PackageRelease {
            package_release_id: fresh_id("pr"),
            package_id: package_id.to_string(),
            version: version.to_string(),
            is_locked: false,
            is_latest: false,
            ready_to_build: false,
            ai_review_requested: false,
            license: None,
            fs_sha: None,
            ai_review_text: None,
            created_at: Utc::now(),
        };
        self.release_id_by_package_version
            .insert(key, release.package_release_id.clone());
        self.release_ids_by_package
            .entry(release.package_id.clone())
            .or_default()
            .push(release.package_release_id.clone());
        self.releases
            .insert(release.package_release_id.clone(), release.clone());
        Ok(release)
    }

    pub fn package_by_selector(&self, selector: &PackageSelector) -> Option<Package> {
        let id = match selector {
            PackageSelector::ById { package_id } => package_id.clone(),
            PackageSelector::ByName { name } => self.package_id_by_name.get(name)?.clone(),
        };
        self.packages.get(&id).cloned()
    }

    pub fn release(&self, package_release_id: &str) -> Option<PackageRelease> {
        self.releases.get(package_release_id).cloned()
    }

    pub fn releases_for_package(&self, package_id: &str) -> Vec<PackageRelease> {
        self.release_ids_by_package
            .get(package_id)
            .map(|ids| ids.iter().map(|id| self.releases[id].clone()).collect())
            .unwrap_or_default()
    }

    pub fn account_package(&self, account_id: &str, package_id: &str) -> Option<AccountPackage> {
        let id = self
            .account_package_id_by_pair
            .get(&(account_id.to_string(), package_id.to_string()))?;
        self.account_packages.get(id).cloned()
    }

    fn resolve_release_id(&self, selector: &ReleaseSelector) -> Option<String> {
        match selector {
            ReleaseSelector::ById(id) => self.releases.contains_key(id).then(|| id.clone()),
            ReleaseSelector::ByNameWithVersion(nv) => {
                // Only the first two `@`-separated segments are meaningful.
                let mut segments = nv.split('@');
                let name = segments.next()?;
                let version = segments.next()?;
                let package_id = self.package_id_by_name.get(name)?;
                self.release_id_by_package_version
                    .get(&(package_id.clone(), version.to_string()))
                    .cloned()
            }
        }
    }

    /// Applies a field-level patch to the resolved release.
    ///
    /// Promoting a release to latest first demotes every other latest release
    /// of the same package, so the at-most-one-latest invariant holds when
    /// this returns. Demoting (`is_latest = false`) fans out to nothing.
    pub fn update_release(
        &mut self,
        selector: &ReleaseSelector,
        patch: &ReleasePatch,
    ) -> Result<(), RegistryError> {
        let release_id = self
            .resolve_release_id(selector)
            .ok_or(RegistryError::PackageReleaseNotFound)?;
        if patch.is_empty() {
            return Err(RegistryError::NoFieldsProvided);
        }

        if patch.is_latest == Some(true) {
            let package_id = self.releases[&release_id].package_id.clone();
            let sibling_ids: Vec<String> = self
                .release_ids_by_package
                .get(&package_id)
                .into_iter()
                .flatten()
                .filter(|id| **id != release_id)
                .cloned()
                .collect();
            let mut demoted = 0usize;
            for id in sibling_ids {
                if let Some(sibling) = self.releases.get_mut(&id) {
                    if sibling.is_latest {
                        sibling.is_latest = false;
                        demoted += 1;
                    }
                }
            }
            if demoted > 0 {
                debug!(package_id = %package_id, demoted, "demoted previously-latest releases");
            }
        }

        let release = self
            .releases
            .get_mut(&release_id)
            .ok_or(RegistryError::PackageReleaseNotFound)?;
        if let Some(v) = patch.is_locked {
            release.is_locked = v;
        }
        if let Some(v) = patch.is_latest {
            release.is_latest = v;
        }
        if let Some(v) = &patch.license {
            release.license = Some(v.clone());
        }
        if let Some(v) = &patch.fs_sha {
            release.fs_sha = Some(v.clone());
        }
        if let Some(v) = patch.ready_to_build {
            release.ready_to_build = v;
        }
        if let Some(v) = patch.ai_review_requested {
            release.ai_review_requested = v;
            // Stub result of the requested review, overwriting any prior text.
            if v {
                release.ai_review_text = Some(AI_REVIEW_PLACEHOLDER.to_string());
            }
        }
        Ok(())
    }

    /// Stars a package for an account: creates or flips the association row
    /// and bumps the denormalized counter in the same call.
    pub fn star_package(
        &mut self,
        account_id: &str,
        selector: &PackageSelector,
    ) -> Result<(), RegistryError> {
        let package_id = match selector {
            PackageSelector::ById { package_id } => self
                .packages
                .contains_key(package_id)
                .then(|| package_id.clone()),
            PackageSelector::ByName { name } => self.package_id_by_name.get(name).cloned(),
        }
        .ok_or(RegistryError::PackageNotFound)?;

        let pair = (account_id.to_string(), package_id.clone());
        let now = Utc::now();
        if let Some(ap_id) = self.account_package_id_by_pair.get(&pair) {
            let row = self.account_packages.get_mut(ap_id).ok_or_else(|| {
                RegistryError::StoreUnavailable("account-package index out of sync".to_string())
            })?;
            if row.is_starred {
                return Err(RegistryError::AlreadyStarred);
            }
            row.is_starred = true;
            row.updated_at = now;
        } else {
            let row = AccountPackage {
                account_package_id: fresh_id("ap"),
                account_id: account_id.to_string(),
                package_id: package_id.clone(),
                is_starred: true,
                created_at: now,
                updated_at: now,
            };
            self.account_package_id_by_pair
                .insert(pair, row.account_package_id.clone());
            self.account_packages
                .insert(row.account_package_id.clone(), row);
        }

        if let Some(pkg) = self.packages.get_mut(&package_id) {
            pkg.star_count += 1;
        }
        Ok(())
    }

    /// Flips an association to unstarred and decrements the counter. The row
    /// is kept (soft toggle); a later re-star flips it back.
    pub fn unstar_package(
        &mut self,
        account_id: &str,
        selector: &PackageSelector,
    ) -> Result<(), RegistryError> {
        let package_id = self
            .package_by_selector(selector)
            .map(|p| p.package_id)
            .ok_or(RegistryError::PackageNotFound)?;

        let pair = (account_id.to_string(), package_id.clone());
        let row = self
            .account_package_id_by_pair
            .get(&pair)
            .and_then(|id| self.account_packages.get_mut(id));
        match row {
            Some(row) if row.is_starred => {
                row.is_starred = false;
                row.updated_at = Utc::now();
            }
            _ => return Err(RegistryError::NotStarred),
        }

        if let Some(pkg) = self.packages.get_mut(&package_id) {
            pkg.star_count = pkg.star_count.saturating_sub(1);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (Records, Package, PackageRelease, PackageRelease) {
        let mut records = Records::new();
        let pkg = records.insert_package("foo", None);
        let r1 = records.insert_release(&pkg.package_id, "1.0.0").expect("release");
        let r2 = records.insert_release(&pkg.package_id, "2.0.0").expect("release");
        (records, pkg, r1, r2)
    }

    #[test]
    fn promoting_a_release_demotes_latest_siblings() {
        let (mut records, _pkg, r1, r2) = seeded();

        records
            .update_release(
                &ReleaseSelector::ById(r1.package_release_id.clone()),
                &ReleasePatch {
                    is_latest: Some(true),
                    ..Default::default()
                },
            )
            .expect("promote r1");
        records
            .update_release(
                &ReleaseSelector::ById(r2.package_release_id.clone()),
                &ReleasePatch {
                    is_latest: Some(true),
                    ..Default::default()
                },
            )
            .expect("promote r2");

        assert!(!records.release(&r1.package_release_id).unwrap().is_latest);
        assert!(records.release(&r2.package_release_id).unwrap().is_latest);
    }

    #[test]
    fn demoting_touches_no_sibling() {
        let (mut records, _pkg, r1, r2) = seeded();
        records
            .update_release(
                &ReleaseSelector::ById(r1.package_release_id.clone()),
                &ReleasePatch {
                    is_latest: Some(true),
                    ..Default::default()
                },
            )
            .expect("promote r1");

        records
            .update_release(
                &ReleaseSelector::ById(r2.package_release_id.clone()),
                &ReleasePatch {
                    is_latest: Some(false),
                    ..Default::default()
                },
            )
            .expect("demote r2");

        // r1 keeps its flag: only promotion fans out.
        assert!(records.release(&r1.package_release_id).unwrap().is_latest);
        assert!(!records.release(&r2.package_release_id).unwrap().is_latest);
    }

    #[test]
    fn patch_without_is_latest_leaves_flags_alone() {
        let (mut records, _pkg, r1, r2) = seeded();
        records
            .update_release(
                &ReleaseSelector::ById(r1.package_release_id.clone()),
                &ReleasePatch {
                    is_latest: Some(true),
                    ..Default::default()
                },
            )
            .expect("promote r1");

        records
            .update_release(
                &ReleaseSelector::ById(r2.package_release_id.clone()),
                &ReleasePatch {
                    license: Some("MIT".to_string()),
                    ..Default::default()
                },
            )
            .expect("patch r2");

        assert!(records.release(&r1.package_release_id).unwrap().is_latest);
        let r2_now = records.release(&r2.package_release_id).unwrap();
        assert!(!r2_now.is_latest);
        assert_eq!(r2_now.license.as_deref(), Some("MIT"));
    }

    #[test]
    fn empty_patch_is_rejected_after_resolution() {
        let (mut records, _pkg, r1, _r2) = seeded();
        let err = records
            .update_release(
                &ReleaseSelector::ById(r1.package_release_id.clone()),
                &ReleasePatch::default(),
            )
            .expect_err("empty patch");
        assert!(matches!(err, RegistryError::NoFieldsProvided));

        // Unresolvable target loses to the 404 first.
        let err = records
            .update_release(
                &ReleaseSelector::ByNameWithVersion("missing@9.9.9".to_string()),
                &ReleasePatch::default(),
            )
            .expect_err("unknown release");
        assert!(matches!(err, RegistryError::PackageReleaseNotFound));
    }

    #[test]
    fn name_with_version_resolves_same_release_as_id() {
        let (mut records, _pkg, r1, _r2) = seeded();
        records
            .update_release(
                &ReleaseSelector::ByNameWithVersion("foo@1.0.0".to_string()),
                &ReleasePatch {
                    fs_sha: Some("abc123".to_string()),
                    ..Default::default()
                },
            )
            .expect("update by name@version");
        assert_eq!(
            records.release(&r1.package_release_id).unwrap().fs_sha.as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn version_lookup_ignores_trailing_at_segments() {
        let (mut records, _pkg, r1, _r2) = seeded();
        records
            .update_release(
                &ReleaseSelector::ByNameWithVersion("foo@1.0.0@extra".to_string()),
                &ReleasePatch {
                    is_locked: Some(true),
                    ..Default::default()
                },
            )
            .expect("update");
        assert!(records.release(&r1.package_release_id).unwrap().is_locked);
    }

    #[test]
    fn ai_review_request_stamps_placeholder_text() {
        let (mut records, _pkg, r1, _r2) = seeded();
        let selector = ReleaseSelector::ById(r1.package_release_id.clone());

        records
            .update_release(
                &selector,
                &ReleasePatch {
                    ai_review_requested: Some(true),
                    ..Default::default()
                },
            )
            .expect("request review");
        assert_eq!(
            records.release(&r1.package_release_id).unwrap().ai_review_text.as_deref(),
            Some(AI_REVIEW_PLACEHOLDER)
        );

        // Clearing the request flag keeps the stored text.
        records
            .update_release(
                &selector,
                &ReleasePatch {
                    ai_review_requested: Some(false),
                    ..Default::default()
                },
            )
            .expect("clear request");
        let release = records.release(&r1.package_release_id).unwrap();
        assert!(!release.ai_review_requested);
        assert_eq!(release.ai_review_text.as_deref(), Some(AI_REVIEW_PLACEHOLDER));
    }

    #[test]
    fn star_creates_row_and_bumps_counter_once() {
        let (mut records, pkg, _r1, _r2) = seeded();
        let selector = PackageSelector::ByName {
            name: "foo".to_string(),
        };

        records.star_package("acct_1", &selector).expect("first star");
        let pkg_now = records
            .package_by_selector(&PackageSelector::ById {
                package_id: pkg.package_id.clone(),
            })
            .unwrap();
        assert_eq!(pkg_now.star_count, 1);
        let row = records.account_package("acct_1", &pkg.package_id).unwrap();
        assert!(row.is_starred);

        let err = records
            .star_package("acct_1", &selector)
            .expect_err("second star");
        assert!(matches!(err, RegistryError::AlreadyStarred));
        assert_eq!(
            records
                .package_by_selector(&PackageSelector::ById {
                    package_id: pkg.package_id.clone(),
                })
                .unwrap()
                .star_count,
            1
        );
    }

    #[test]
    fn restar_flips_existing_row_and_keeps_created_at() {
        let (mut records, pkg, _r1, _r2) = seeded();
        let selector = PackageSelector::ById {
            package_id: pkg.package_id.clone(),
        };

        records.star_package("acct_1", &selector).expect("star");
        let first = records.account_package("acct_1", &pkg.package_id).unwrap();
        records.unstar_package("acct_1", &selector).expect("unstar");
        records.star_package("acct_1", &selector).expect("restar");

        let second = records.account_package("acct_1", &pkg.package_id).unwrap();
        assert_eq!(second.account_package_id, first.account_package_id);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.is_starred);
        assert_eq!(
            records.package_by_selector(&selector).unwrap().star_count,
            1
        );
    }

    #[test]
    fn star_unknown_package_is_not_found() {
        let mut records = Records::new();
        let err = records
            .star_package(
                "acct_1",
                &PackageSelector::ByName {
                    name: "missing".to_string(),
                },
            )
            .expect_err("unknown package");
        assert!(matches!(err, RegistryError::PackageNotFound));
    }
}
