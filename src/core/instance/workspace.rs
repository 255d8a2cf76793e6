use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};

const EULA_FILE: &str = "eula.txt";
const EULA_CONTENTS: &str = "eula=true\n";

/// Directory tree the server runs in.
///
/// Layout:
/// - `mods/`    — mod JARs
/// - `config/`  — mod configuration files
/// - `world/`   — world save
/// - `eula.txt` — agreement marker required by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerWorkspace {
    root: PathBuf,
}

impl ServerWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mods_dir(&self) -> PathBuf {
        self.root.join("mods")
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    pub fn world_dir(&self) -> PathBuf {
        self.root.join("world")
    }

    pub fn eula_path(&self) -> PathBuf {
        self.root.join(EULA_FILE)
    }

    /// Path of a file placed directly in the workspace root.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Creates the directory structure and (re)writes the EULA marker.
    /// Safe to call before every launch.
    pub async fn ensure(&self) -> LauncherResult<()> {
        let mods_dir = self.mods_dir();
        let config_dir = self.config_dir();
        let world_dir = self.world_dir();

        tokio::try_join!(
            create_dir_safe(&mods_dir),
            create_dir_safe(&config_dir),
            create_dir_safe(&world_dir),
        )?;

        let eula = self.eula_path();
        tokio::fs::write(&eula, EULA_CONTENTS)
            .await
            .map_err(|e| LauncherError::io(&eula, e))?;

        debug!("Workspace ready at {:?}", self.root);
        Ok(())
    }

    /// Recursively deletes the workspace. Missing directory is not an error.
    pub async fn remove(&self) -> LauncherResult<bool> {
        if !self.root.exists() {
            return Ok(false);
        }

        tokio::fs::remove_dir_all(&self.root)
            .await
            .map_err(|e| LauncherError::io(&self.root, e))?;

        info!("Deleted workspace {:?}", self.root);
        Ok(true)
    }
}

async fn create_dir_safe(path: &Path) -> LauncherResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| LauncherError::io(path, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::scratch_dir;

    #[tokio::test]
    async fn ensure_creates_layout_and_eula() {
        let workspace = ServerWorkspace::new(scratch_dir("ws-ensure"));
        workspace.ensure().await.unwrap();

        assert!(workspace.mods_dir().is_dir());
        assert!(workspace.config_dir().is_dir());
        assert!(workspace.world_dir().is_dir());
        let eula = std::fs::read_to_string(workspace.eula_path()).unwrap();
        assert_eq!(eula, "eula=true\n");

        // Second call keeps existing content in place.
        std::fs::write(workspace.mods_dir().join("a.jar"), b"jar").unwrap();
        workspace.ensure().await.unwrap();
        assert!(workspace.mods_dir().join("a.jar").is_file());

        workspace.remove().await.unwrap();
    }

    #[tokio::test]
    async fn remove_deletes_whole_tree() {
        let workspace = ServerWorkspace::new(scratch_dir("ws-remove"));
        workspace.ensure().await.unwrap();

        assert!(workspace.remove().await.unwrap());
        assert!(!workspace.root().exists());
        assert!(!workspace.remove().await.unwrap());
    }
}
