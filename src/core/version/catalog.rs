// ─── Version Catalog ───
// Server builds the launcher can install, compiled into the binary.

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::instance::DistributionKind;

/// One installable (kind, Minecraft version) pair and its build identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionEntry {
    pub kind: DistributionKind,
    pub mc_version: &'static str,
    pub sub_version: &'static str,
}

const fn entry(
    kind: DistributionKind,
    mc_version: &'static str,
    sub_version: &'static str,
) -> VersionEntry {
    VersionEntry {
        kind,
        mc_version,
        sub_version,
    }
}

/// Order matters: the menu lists versions by position.
static CATALOG: [VersionEntry; 7] = [
    entry(DistributionKind::Forge, "1.12.2", "14.23.5.2860"),
    entry(DistributionKind::Forge, "1.16.5", "36.2.39"),
    entry(DistributionKind::Forge, "1.18.2", "40.2.17"),
    entry(DistributionKind::Forge, "1.20.1", "47.2.0"),
    entry(DistributionKind::Fabric, "1.18.2", "0.14.21"),
    entry(DistributionKind::Fabric, "1.20.1", "0.15.7"),
    entry(DistributionKind::Vanilla, "1.20.1", "vanilla"),
];

pub struct VersionCatalog;

impl VersionCatalog {
    pub fn entries() -> &'static [VersionEntry] {
        &CATALOG
    }

    /// Kinds in menu order.
    pub fn kinds() -> Vec<DistributionKind> {
        let mut kinds = Vec::new();
        for e in CATALOG.iter() {
            if !kinds.contains(&e.kind) {
                kinds.push(e.kind);
            }
        }
        kinds
    }

    /// Versions offered for `kind`, in menu order.
    pub fn versions(kind: DistributionKind) -> Vec<&'static VersionEntry> {
        CATALOG.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn find(kind: DistributionKind, mc_version: &str) -> Option<&'static VersionEntry> {
        CATALOG
            .iter()
            .find(|e| e.kind == kind && e.mc_version == mc_version)
    }

    pub fn require(kind: DistributionKind, mc_version: &str) -> LauncherResult<&'static VersionEntry> {
        Self::find(kind, mc_version).ok_or_else(|| LauncherError::UnknownVersion {
            kind: kind.to_string(),
            mc_version: mc_version.to_string(),
        })
    }
}
