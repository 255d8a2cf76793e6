// ─── Artifact Fetcher ───
// Puts the server jar for a catalog entry into the workspace.

use tracing::{info, warn};

use super::artifact::ArtifactSpec;
use super::installer::InstallerRunner;
use crate::core::downloader::ArtifactTransport;
use crate::core::error::LauncherResult;
use crate::core::instance::{DistributionKind, ServerWorkspace};

/// Result of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtifact {
    /// File that was downloaded (or found) in the workspace.
    pub file_name: String,
    /// Jar to start the server with.
    pub launch_jar: String,
    pub downloaded: bool,
    pub installer_ran: bool,
}

pub struct ServerFetcher<'a> {
    workspace: &'a ServerWorkspace,
    transport: &'a dyn ArtifactTransport,
    installer: &'a dyn InstallerRunner,
}

impl<'a> ServerFetcher<'a> {
    pub fn new(
        workspace: &'a ServerWorkspace,
        transport: &'a dyn ArtifactTransport,
        installer: &'a dyn InstallerRunner,
    ) -> Self {
        Self {
            workspace,
            transport,
            installer,
        }
    }

    /// Ensure the artifact is on disk.
    ///
    /// An existing file short-circuits the download. A failed GET is final
    /// for this call: no retry, and whatever a failed transport left at the
    /// target is removed so the next fetch downloads again.
    pub async fn fetch(
        &self,
        kind: DistributionKind,
        mc_version: &str,
        sub_version: &str,
    ) -> LauncherResult<FetchedArtifact> {
        let spec = ArtifactSpec::resolve(kind, mc_version, sub_version);
        let target = self.workspace.file(&spec.file_name);

        let downloaded = if target.is_file() {
            info!("{} already present, skipping download", spec.file_name);
            false
        } else {
            if let Err(e) = self.transport.download(&spec.url, &target).await {
                if tokio::fs::remove_file(&target).await.is_ok() {
                    warn!("Removed incomplete {}", spec.file_name);
                }
                return Err(e);
            }
            info!("Downloaded {}", spec.file_name);
            true
        };

        let installer_ran = self.install_if_needed(&spec).await?;

        Ok(FetchedArtifact {
            launch_jar: spec.launch_jar().to_string(),
            file_name: spec.file_name,
            downloaded,
            installer_ran,
        })
    }

    /// Runs the legacy installer when its marker jar is missing.
    async fn install_if_needed(&self, spec: &ArtifactSpec) -> LauncherResult<bool> {
        let Some(install) = &spec.legacy_install else {
            return Ok(false);
        };
        if self.workspace.file(&install.marker).is_file() {
            return Ok(false);
        }

        let success = self
            .installer
            .run_installer(self.workspace.root(), &spec.file_name)
            .await?;
        if !success {
            warn!(
                "Installer {} exited with an error; {} may be missing",
                spec.file_name, install.marker
            );
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::core::error::LauncherError;
    use crate::core::test_support::scratch_dir;

    #[derive(Default)]
    struct CountingTransport {
        calls: AtomicUsize,
        fail_with: Option<u16>,
        truncate_first: bool,
    }

    #[async_trait]
    impl ArtifactTransport for CountingTransport {
        async fn download(&self, url: &str, dest: &Path) -> LauncherResult<u64> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.truncate_first && call == 0 {
                std::fs::write(dest, b"ja").unwrap();
                return Err(LauncherError::io(
                    dest,
                    std::io::Error::other("disk full"),
                ));
            }
            if let Some(status) = self.fail_with {
                return Err(LauncherError::DownloadFailed {
                    url: url.to_string(),
                    status,
                });
            }
            std::fs::write(dest, b"jar").unwrap();
            Ok(3)
        }
    }

    #[derive(Default)]
    struct CountingInstaller {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl InstallerRunner for CountingInstaller {
        async fn run_installer(&self, _workspace: &Path, _jar: &str) -> LauncherResult<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    async fn workspace(label: &str) -> ServerWorkspace {
        let ws = ServerWorkspace::new(scratch_dir(label));
        ws.ensure().await.unwrap();
        ws
    }

    #[tokio::test]
    async fn second_fetch_does_not_touch_the_network() {
        let ws = workspace("fetch-idem").await;
        let transport = CountingTransport::default();
        let installer = CountingInstaller::default();
        let fetcher = ServerFetcher::new(&ws, &transport, &installer);

        let first = fetcher
            .fetch(DistributionKind::Fabric, "1.20.1", "0.15.7")
            .await
            .unwrap();
        let second = fetcher
            .fetch(DistributionKind::Fabric, "1.20.1", "0.15.7")
            .await
            .unwrap();

        assert!(first.downloaded);
        assert!(!second.downloaded);
        assert_eq!(second.file_name, "fabric-server-launch.jar");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert_eq!(installer.calls.load(Ordering::SeqCst), 0);
        ws.remove().await.unwrap();
    }

    #[tokio::test]
    async fn legacy_forge_runs_installer_only_while_marker_is_missing() {
        let ws = workspace("fetch-legacy").await;
        let transport = CountingTransport::default();
        let installer = CountingInstaller::default();
        let fetcher = ServerFetcher::new(&ws, &transport, &installer);

        let fetched = fetcher
            .fetch(DistributionKind::Forge, "1.12.2", "14.23.5.2860")
            .await
            .unwrap();
        assert!(fetched.installer_ran);
        assert_eq!(fetched.launch_jar, "forge-1.12.2-14.23.5.2860.jar");
        assert_eq!(installer.calls.load(Ordering::SeqCst), 1);

        // Installer jar present, marker still absent: install again, no download.
        let again = fetcher
            .fetch(DistributionKind::Forge, "1.12.2", "14.23.5.2860")
            .await
            .unwrap();
        assert!(again.installer_ran);
        assert!(!again.downloaded);
        assert_eq!(installer.calls.load(Ordering::SeqCst), 2);

        // Marker present: nothing to do.
        std::fs::write(ws.file("forge-1.12.2-14.23.5.2860.jar"), b"jar").unwrap();
        let done = fetcher
            .fetch(DistributionKind::Forge, "1.12.2", "14.23.5.2860")
            .await
            .unwrap();
        assert!(!done.installer_ran);
        assert_eq!(installer.calls.load(Ordering::SeqCst), 2);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        ws.remove().await.unwrap();
    }

    #[tokio::test]
    async fn installer_never_runs_for_other_entries() {
        let ws = workspace("fetch-nolegacy").await;
        let transport = CountingTransport::default();
        let installer = CountingInstaller::default();
        let fetcher = ServerFetcher::new(&ws, &transport, &installer);

        for (kind, mc, sub) in [
            (DistributionKind::Forge, "1.16.5", "36.2.39"),
            (DistributionKind::Forge, "1.20.1", "47.2.0"),
            (DistributionKind::Fabric, "1.18.2", "0.14.21"),
            (DistributionKind::Vanilla, "1.20.1", "vanilla"),
        ] {
            let fetched = fetcher.fetch(kind, mc, sub).await.unwrap();
            assert!(!fetched.installer_ran);
            assert_eq!(fetched.launch_jar, fetched.file_name);
        }
        assert_eq!(installer.calls.load(Ordering::SeqCst), 0);
        ws.remove().await.unwrap();
    }

    #[tokio::test]
    async fn failed_download_is_final_and_skips_installer() {
        let ws = workspace("fetch-fail").await;
        let transport = CountingTransport {
            fail_with: Some(404),
            ..Default::default()
        };
        let installer = CountingInstaller::default();
        let fetcher = ServerFetcher::new(&ws, &transport, &installer);

        let err = fetcher
            .fetch(DistributionKind::Forge, "1.12.2", "14.23.5.2860")
            .await
            .unwrap_err();

        assert!(matches!(err, LauncherError::DownloadFailed { status: 404, .. }));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert_eq!(installer.calls.load(Ordering::SeqCst), 0);
        assert!(!ws.file("forge-1.12.2-14.23.5.2860-installer.jar").exists());
        ws.remove().await.unwrap();
    }

    #[tokio::test]
    async fn truncated_download_is_removed_and_retried_next_time() {
        let ws = workspace("fetch-truncated").await;
        let transport = CountingTransport {
            truncate_first: true,
            ..Default::default()
        };
        let installer = CountingInstaller::default();
        let fetcher = ServerFetcher::new(&ws, &transport, &installer);

        let err = fetcher
            .fetch(DistributionKind::Vanilla, "1.20.1", "vanilla")
            .await
            .unwrap_err();
        assert!(matches!(err, LauncherError::Io { .. }));
        assert!(!ws.file("minecraft_server.1.20.1.jar").exists());

        let fetched = fetcher
            .fetch(DistributionKind::Vanilla, "1.20.1", "vanilla")
            .await
            .unwrap();
        assert!(fetched.downloaded);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            std::fs::read(ws.file("minecraft_server.1.20.1.jar")).unwrap(),
            b"jar"
        );
        ws.remove().await.unwrap();
    }
}
