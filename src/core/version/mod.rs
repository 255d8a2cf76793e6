pub mod catalog;

pub use catalog::{VersionCatalog, VersionEntry};
