use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};

/// Runs a downloaded installer jar inside the workspace.
#[async_trait]
pub trait InstallerRunner: Send + Sync {
    /// Blocks until the installer exits. `Ok(true)` means exit status zero.
    async fn run_installer(&self, workspace: &Path, installer_jar: &str) -> LauncherResult<bool>;
}

/// Executes `java -jar <installer> --installServer` with the workspace as
/// working directory, letting the installer print straight to the console.
pub struct JavaInstallerRunner {
    java_bin: PathBuf,
}

impl JavaInstallerRunner {
    pub fn new(java_bin: impl Into<PathBuf>) -> Self {
        Self {
            java_bin: java_bin.into(),
        }
    }
}

#[async_trait]
impl InstallerRunner for JavaInstallerRunner {
    async fn run_installer(&self, workspace: &Path, installer_jar: &str) -> LauncherResult<bool> {
        info!("Running installer {} in {:?}", installer_jar, workspace);

        let mut cmd = tokio::process::Command::new(&self.java_bin);
        cmd.arg("-jar")
            .arg(installer_jar)
            .arg("--installServer")
            .current_dir(workspace)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        debug!("Installer command: {:?}", cmd);

        let status = cmd.status().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LauncherError::JavaNotFound(self.java_bin.display().to_string())
            } else {
                LauncherError::Installer(format!("failed to start {installer_jar}: {e}"))
            }
        })?;

        Ok(status.success())
    }
}
