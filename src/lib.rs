pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod utils;

pub use error::RegistryError;
pub use store::{StoreHandle, spawn};
