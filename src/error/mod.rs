mod registry;

pub use registry::{ErrorBody, RegistryError};
