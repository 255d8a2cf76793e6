use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::model::SavedConfiguration;
use crate::core::error::{LauncherError, LauncherResult};

/// Reads and writes the saved configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save(&self, config: &SavedConfiguration) -> LauncherResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }

        tokio::fs::write(&self.path, config.to_file_contents())
            .await
            .map_err(|e| LauncherError::io(&self.path, e))?;

        info!(
            "Saved configuration {} {} ({} GB)",
            config.kind, config.mc_version, config.ram_gb
        );
        Ok(())
    }

    /// Loads the saved configuration.
    ///
    /// Missing file → `ConfigNotFound`, incomplete or malformed file → `Config`.
    pub async fn load(&self) -> LauncherResult<SavedConfiguration> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LauncherError::ConfigNotFound(self.path.clone()));
            }
            Err(e) => return Err(LauncherError::io(&self.path, e)),
        };

        let config = SavedConfiguration::parse(&raw)?;
        Ok(config)
    }

    /// Like `load`, but any failure is logged and mapped to `None`.
    pub async fn try_load(&self) -> Option<SavedConfiguration> {
        match self.load().await {
            Ok(config) => Some(config),
            Err(LauncherError::ConfigNotFound(_)) => None,
            Err(e) => {
                warn!("Ignoring saved configuration at {:?}: {}", self.path, e);
                None
            }
        }
    }

    /// Deletes the file. Returns whether something was removed.
    pub async fn delete(&self) -> LauncherResult<bool> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("Deleted configuration {:?}", self.path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(LauncherError::io(&self.path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ConfigParseError;
    use crate::core::instance::DistributionKind;
    use crate::core::test_support::scratch_dir;

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = scratch_dir("store-roundtrip");
        let store = ConfigStore::new(dir.join("ultima_configuracion.txt"));
        let config = SavedConfiguration::new(DistributionKind::Forge, "1.12.2", "14.23.5.2860", 3);

        store.save(&config).await.unwrap();
        assert_eq!(store.load().await.unwrap(), config);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn load_without_file_is_not_found() {
        let store = ConfigStore::new(scratch_dir("store-missing").join("cfg.txt"));
        assert!(matches!(
            store.load().await,
            Err(LauncherError::ConfigNotFound(_))
        ));
        assert!(store.try_load().await.is_none());
    }

    #[tokio::test]
    async fn incomplete_file_is_a_parse_error() {
        let dir = scratch_dir("store-incomplete");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cfg.txt");
        std::fs::write(&path, "tipo=Fabric\nram=2\n").unwrap();

        let store = ConfigStore::new(&path);
        assert!(matches!(
            store.load().await,
            Err(LauncherError::Config(ConfigParseError::MissingField("mc_version")))
        ));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn delete_reports_whether_file_existed() {
        let dir = scratch_dir("store-delete");
        let store = ConfigStore::new(dir.join("cfg.txt"));
        store
            .save(&SavedConfiguration::new(DistributionKind::Vanilla, "1.20.1", "vanilla", 2))
            .await
            .unwrap();

        assert!(store.delete().await.unwrap());
        assert!(!store.delete().await.unwrap());
        assert!(!store.path().exists());

        std::fs::remove_dir_all(dir).unwrap();
    }
}
