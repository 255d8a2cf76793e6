use super::artifact::ArtifactSpec;

const FABRIC_META_BASE: &str = "https://meta.fabricmc.net/v2";

/// Saved under one fixed name whatever the versions are; a later fetch for
/// another version reuses the file already on disk.
pub const FABRIC_SERVER_JAR: &str = "fabric-server-launch.jar";

/// Fabric Meta serves a ready-to-run server launcher per (game, loader) pair.
pub fn artifact(minecraft_version: &str, loader_version: &str) -> ArtifactSpec {
    ArtifactSpec {
        file_name: FABRIC_SERVER_JAR.to_string(),
        url: format!(
            "{}/versions/loader/{}/{}/server/jar",
            FABRIC_META_BASE, minecraft_version, loader_version
        ),
        legacy_install: None,
    }
}
