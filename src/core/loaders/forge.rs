use super::artifact::{ArtifactSpec, LegacyInstall};

const FORGE_MAVEN: &str = "https://maven.minecraftforge.net";

/// The only Forge line that ships an installer instead of a runnable jar.
pub const LEGACY_FORGE_VERSION: &str = "1.12.2";

pub fn is_legacy(mc_version: &str) -> bool {
    mc_version == LEGACY_FORGE_VERSION
}

/// Forge artifacts live under `<maven>/net/minecraftforge/forge/<mc>-<build>/`.
///
/// 1.12.2 publishes `-installer.jar`, which must be run with
/// `--installServer` to produce `forge-<mc>-<build>.jar` and its libraries.
/// Newer lines are fetched as `-universal.jar` and run directly.
pub fn artifact(mc_version: &str, forge_version: &str) -> ArtifactSpec {
    let forge_id = format!("{}-{}", mc_version, forge_version);

    if is_legacy(mc_version) {
        let file_name = format!("forge-{}-installer.jar", forge_id);
        ArtifactSpec {
            url: maven_url(&forge_id, &file_name),
            file_name,
            legacy_install: Some(LegacyInstall {
                marker: format!("forge-{}.jar", forge_id),
            }),
        }
    } else {
        let file_name = format!("forge-{}-universal.jar", forge_id);
        ArtifactSpec {
            url: maven_url(&forge_id, &file_name),
            file_name,
            legacy_install: None,
        }
    }
}

fn maven_url(forge_id: &str, file_name: &str) -> String {
    format!(
        "{}/net/minecraftforge/forge/{}/{}",
        FORGE_MAVEN, forge_id, file_name
    )
}
