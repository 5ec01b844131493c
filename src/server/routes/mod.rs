pub mod packages;
pub mod releases;
