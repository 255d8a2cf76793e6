pub mod client;

pub use client::{ArtifactTransport, Downloader};
