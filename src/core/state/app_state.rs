use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::downloader::{ArtifactTransport, Downloader};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::instance::{ConfigStore, ServerWorkspace};
use crate::core::java::JavaRuntime;
use crate::core::loaders::{InstallerRunner, JavaInstallerRunner, ServerFetcher};

pub const DEFAULT_WORKSPACE_DIR: &str = "ServidorMinecraft";
pub const DEFAULT_CONFIG_FILE: &str = "ultima_configuracion.txt";
pub const DEFAULT_JAVA_BIN: &str = "java";

/// User-tunable knobs, resolved from the command line / environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherSettings {
    pub workspace_dir: PathBuf,
    pub config_file: PathBuf,
    pub java_bin: PathBuf,
    pub tunnel_enabled: bool,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            workspace_dir: PathBuf::from(DEFAULT_WORKSPACE_DIR),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            java_bin: PathBuf::from(DEFAULT_JAVA_BIN),
            tunnel_enabled: true,
        }
    }
}

/// Everything a session needs, passed explicitly instead of relying on the
/// process working directory.
pub struct AppState {
    pub settings: LauncherSettings,
    pub workspace: ServerWorkspace,
    pub config_store: ConfigStore,
    pub java: JavaRuntime,
    pub transport: Arc<dyn ArtifactTransport>,
    pub installer: Arc<dyn InstallerRunner>,
}

impl AppState {
    pub fn new(settings: LauncherSettings) -> LauncherResult<Self> {
        let transport: Arc<dyn ArtifactTransport> = Arc::new(Downloader::new()?);
        let installer: Arc<dyn InstallerRunner> =
            Arc::new(JavaInstallerRunner::new(settings.java_bin.clone()));
        Self::with_services(settings, transport, installer)
    }

    /// Same as `new` with caller-provided download and installer backends.
    pub fn with_services(
        settings: LauncherSettings,
        transport: Arc<dyn ArtifactTransport>,
        installer: Arc<dyn InstallerRunner>,
    ) -> LauncherResult<Self> {
        let workspace = ServerWorkspace::new(absolute(&settings.workspace_dir)?);
        let config_store = ConfigStore::new(absolute(&settings.config_file)?);
        let java = JavaRuntime::new(settings.java_bin.clone());

        Ok(Self {
            settings,
            workspace,
            config_store,
            java,
            transport,
            installer,
        })
    }

    pub fn fetcher(&self) -> ServerFetcher<'_> {
        ServerFetcher::new(&self.workspace, self.transport.as_ref(), self.installer.as_ref())
    }
}

fn absolute(path: &Path) -> LauncherResult<PathBuf> {
    std::path::absolute(path).map_err(|source| LauncherError::io(path, source))
}
