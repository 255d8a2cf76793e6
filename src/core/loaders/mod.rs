pub mod artifact;
pub mod fabric;
pub mod fetcher;
pub mod forge;
pub mod installer;
pub mod vanilla;

pub use artifact::{ArtifactSpec, LegacyInstall};
pub use fetcher::{FetchedArtifact, ServerFetcher};
pub use installer::{InstallerRunner, JavaInstallerRunner};
