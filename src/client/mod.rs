pub mod package_resolver;

pub use package_resolver::{CurrentPackageResolver, ResolveError, RouteParams, UrlParams};
