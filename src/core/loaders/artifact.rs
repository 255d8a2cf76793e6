use crate::core::instance::DistributionKind;

use super::{fabric, forge, vanilla};

/// Extra step needed by the legacy Forge installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyInstall {
    /// Jar produced by `--installServer`; its presence means the install ran.
    pub marker: String,
}

/// Where a server jar comes from and what it is called on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub file_name: String,
    pub url: String,
    pub legacy_install: Option<LegacyInstall>,
}

impl ArtifactSpec {
    /// Resolve the artifact for a (kind, version, build) triple.
    pub fn resolve(kind: DistributionKind, mc_version: &str, sub_version: &str) -> Self {
        match kind {
            DistributionKind::Forge => forge::artifact(mc_version, sub_version),
            DistributionKind::Fabric => fabric::artifact(mc_version, sub_version),
            DistributionKind::Vanilla => vanilla::artifact(mc_version),
        }
    }

    /// Jar handed to `java -jar` once the artifact is in place.
    pub fn launch_jar(&self) -> &str {
        match &self.legacy_install {
            Some(install) => &install.marker,
            None => &self.file_name,
        }
    }
}
