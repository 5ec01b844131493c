//! Record store: in-memory registry state behind a single-writer actor.
//!
//! Layout:
//! - `models.rs`: entity structs (packages, releases, account-package rows)
//! - `records.rs`: keyed collections with secondary indices and the mutation ops
//! - `patch.rs`: partial-update payloads and target selectors
//! - `actor.rs`: ractor actor owning the records, plus the RPC handle
//!
//! Every handler operation is one actor message, so multi-record mutations
//! (sibling demotion plus target update, association plus counter) commit as a
//! single critical section.

pub mod actor;
pub mod models;
pub mod patch;
pub mod records;

pub use models::{AccountPackage, Package, PackageRelease};
pub use patch::{AI_REVIEW_PLACEHOLDER, ReleasePatch, ReleaseSelector};
pub use records::Records;

pub use actor::{StoreHandle, spawn};
