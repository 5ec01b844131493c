pub mod packages;
pub mod releases;

pub use packages::{GetPackageResponse, PackageSelector, PackageSummary, StarPackageRequest};
pub use releases::{OkResponse, UpdatePackageReleaseRequest};
