use super::artifact::ArtifactSpec;

/// Mojang's server jar object. Only one vanilla build is offered, so the
/// URL does not depend on the requested version.
const VANILLA_SERVER_URL: &str =
    "https://launcher.mojang.com/v1/objects/1b557e7b033b583cd9f66736f4f1c8d26d7f9f84/server.jar";

pub fn artifact(minecraft_version: &str) -> ArtifactSpec {
    ArtifactSpec {
        file_name: format!("minecraft_server.{}.jar", minecraft_version),
        url: VANILLA_SERVER_URL.to_string(),
        legacy_install: None,
    }
}
