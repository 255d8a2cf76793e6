// ─── Menu Actions ───
// Select, resume, edit and reset, plus the launch pipeline they share.

use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{info, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::instance::{parse_ram_gb, DistributionKind, SavedConfiguration, DEFAULT_RAM_GB};
use crate::core::java::required_java_for_minecraft_version;
use crate::core::launch::{
    supervise, tunnel, ServerLaunch, SupervisorExit, SystemClipboard, TunnelHandle, TunnelStart,
};
use crate::core::loaders::FetchedArtifact;
use crate::core::version::VersionCatalog;
use crate::menu::{Flow, Session};

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Option 1: pick kind, version and RAM from the catalog, save, launch.
    pub async fn select_server(&mut self) -> LauncherResult<Flow> {
        let kinds = VersionCatalog::kinds();
        self.console.say("\nTipos de servidor disponibles:").await?;
        for (i, kind) in kinds.iter().enumerate() {
            self.console.say(&format!("{}. {}", i + 1, kind)).await?;
        }
        let Some(kind_index) = self.choose_index("Elige el tipo (número): ", kinds.len()).await?
        else {
            return Ok(Flow::Continue);
        };
        let kind = kinds[kind_index];

        let versions = VersionCatalog::versions(kind);
        self.console
            .say(&format!("\nVersiones disponibles de {kind}:"))
            .await?;
        for (i, entry) in versions.iter().enumerate() {
            self.console
                .say(&format!("{}. {} ({})", i + 1, entry.mc_version, entry.sub_version))
                .await?;
        }
        let Some(version_index) = self
            .choose_index("Elige la versión (número): ", versions.len())
            .await?
        else {
            return Ok(Flow::Continue);
        };
        let entry = versions[version_index];

        let Some(ram_gb) = self.choose_ram().await? else {
            return Ok(Flow::Continue);
        };

        let config = SavedConfiguration::new(kind, entry.mc_version, entry.sub_version, ram_gb);
        self.state.config_store.save(&config).await?;
        info!("Saved selection {} {}", config.kind, config.mc_version);

        self.launch(&config).await?;
        Ok(Flow::Continue)
    }

    /// Option 2: launch whatever was saved last.
    pub async fn resume_server(&mut self) -> LauncherResult<Flow> {
        let config = match self.state.config_store.load().await {
            Ok(config) => config,
            Err(LauncherError::ConfigNotFound(_)) | Err(LauncherError::Config(_)) => {
                self.console
                    .say("[ERROR] Configuración incompleta. Usa la opción 1 primero.")
                    .await?;
                return Ok(Flow::Continue);
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = VersionCatalog::require(config.kind, &config.mc_version) {
            self.console.say(&format!("[ERROR] {e}")).await?;
            return Ok(Flow::Continue);
        }

        self.launch(&config).await?;
        Ok(Flow::Continue)
    }

    /// Option 3: rewrite the saved selection without launching.
    pub async fn edit_configuration(&mut self) -> LauncherResult<Flow> {
        let Some(raw_kind) = self.ask("Tipo (Forge/Fabric/Vanilla): ").await? else {
            return Ok(Flow::Continue);
        };
        let Ok(kind) = raw_kind.parse::<DistributionKind>() else {
            self.console
                .say("[ERROR] Tipo no válido. Usa Forge, Fabric o Vanilla.")
                .await?;
            return Ok(Flow::Continue);
        };

        let Some(mc_version) = self.ask("Versión de Minecraft: ").await? else {
            return Ok(Flow::Continue);
        };
        let Some(entry) = VersionCatalog::find(kind, &mc_version) else {
            self.console
                .say(&format!("[ERROR] Versión no disponible para {kind}: {mc_version}"))
                .await?;
            return Ok(Flow::Continue);
        };

        let Some(raw_ram) = self.ask("RAM en GB: ").await? else {
            return Ok(Flow::Continue);
        };
        let Some(ram_gb) = parse_ram_gb(&raw_ram) else {
            self.console
                .say("[ERROR] La RAM debe ser un número entero positivo.")
                .await?;
            return Ok(Flow::Continue);
        };

        let config = SavedConfiguration::new(kind, entry.mc_version, entry.sub_version, ram_gb);
        self.state.config_store.save(&config).await?;
        self.console.say("Configuración actualizada.").await?;
        Ok(Flow::Continue)
    }

    /// Option 4: forget the selection and wipe the workspace.
    pub async fn reset_all(&mut self) -> LauncherResult<Flow> {
        let had_config = self.state.config_store.delete().await?;
        let had_workspace = self.state.workspace.remove().await?;
        info!(
            "Reset: config removed = {}, workspace removed = {}",
            had_config, had_workspace
        );
        self.console
            .say("[LIMPIEZA] Configuración y servidor eliminados. Saliendo...")
            .await?;
        Ok(Flow::Quit)
    }

    /// Ensure workspace, fetch, check Java, start the tunnel, supervise.
    ///
    /// Failures along the way are reported and end the launch; only
    /// console and filesystem errors bubble up. An interrupt before the
    /// server starts abandons the preparation and returns to the menu.
    pub async fn launch(&mut self, config: &SavedConfiguration) -> LauncherResult<()> {
        self.state.workspace.ensure().await?;

        let interrupt = self.interrupt.clone();
        let prepared = tokio::select! {
            prepared = self.prepare(config) => Some(prepared),
            _ = interrupt.wait() => None,
        };
        let fetched = match prepared {
            Some(Ok(Some(fetched))) => fetched,
            Some(Ok(None)) => return Ok(()),
            Some(Err(e)) => return Err(e),
            None => {
                warn!("Interrupted while preparing {}", config.mc_version);
                self.console
                    .say("[SERVIDOR] Preparación interrumpida. Volviendo al menú.")
                    .await?;
                return Ok(());
            }
        };

        let tunnel = self.start_tunnel().await?;

        self.console
            .say(&format!(
                "[SERVIDOR] Iniciando {} con {} GB de RAM. Escribe /stop para detenerlo.",
                fetched.launch_jar, config.ram_gb
            ))
            .await?;
        let launch = ServerLaunch {
            java_bin: self.state.java.binary(),
            workspace: &self.state.workspace,
            jar: &fetched.launch_jar,
            ram_gb: config.ram_gb,
        };
        let child = match launch.spawn() {
            Ok(child) => child,
            Err(e) => {
                if let Some(handle) = tunnel {
                    handle.shutdown().await;
                }
                self.console
                    .say(&format!("[ERROR] No se pudo iniciar el servidor: {e}"))
                    .await?;
                return Ok(());
            }
        };

        let exit = supervise(child, &mut self.console, self.interrupt.wait()).await;
        if let Some(handle) = tunnel {
            handle.shutdown().await;
        }

        match exit {
            Ok(SupervisorExit::Exited(code)) => {
                let code = code.map_or_else(|| "desconocido".to_string(), |c| c.to_string());
                self.console
                    .say(&format!("[SERVIDOR] El servidor se detuvo (código {code})."))
                    .await?;
            }
            Ok(SupervisorExit::Interrupted) => {
                self.console
                    .say("[SERVIDOR] Servidor detenido manualmente.")
                    .await?;
            }
            Err(e) => {
                self.console
                    .say(&format!("[ERROR] Error supervisando el servidor: {e}"))
                    .await?;
            }
        }
        Ok(())
    }

    /// Fetch, install and Java check. `None` means a problem was reported
    /// and the launch should not go on.
    async fn prepare(
        &mut self,
        config: &SavedConfiguration,
    ) -> LauncherResult<Option<FetchedArtifact>> {
        self.console
            .say(&format!(
                "[DESCARGA] Preparando {} {} ({})...",
                config.kind, config.mc_version, config.sub_version
            ))
            .await?;
        let fetched = match self
            .state
            .fetcher()
            .fetch(config.kind, &config.mc_version, &config.sub_version)
            .await
        {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!("Fetch failed: {}", e);
                self.console
                    .say(&format!("[ERROR] No se pudo preparar el servidor: {e}"))
                    .await?;
                return Ok(None);
            }
        };
        if fetched.downloaded {
            self.console
                .say(&format!("[DESCARGA] Descargado {}", fetched.file_name))
                .await?;
        } else {
            self.console
                .say(&format!("[DESCARGA] {} ya existe.", fetched.file_name))
                .await?;
        }
        if fetched.installer_ran {
            self.console
                .say("[INSTALADOR] Instalación de Forge completada.")
                .await?;
        }

        let java = match self.state.java.check().await {
            Ok(java) => java,
            Err(e) => {
                warn!("Java check failed: {}", e);
                self.console
                    .say("[ERROR] Java no está instalado o no se encuentra en el PATH.")
                    .await?;
                return Ok(None);
            }
        };
        let required = required_java_for_minecraft_version(&config.mc_version);
        match java.major {
            Some(major) if major < required => {
                self.console
                    .say(&format!(
                        "[JAVA] Aviso: Java {major} detectado, Minecraft {} necesita Java {required} o superior.",
                        config.mc_version
                    ))
                    .await?;
            }
            _ => {
                self.console
                    .say(&format!(
                        "[JAVA] Java detectado: {}",
                        java.version.as_deref().unwrap_or("versión desconocida")
                    ))
                    .await?;
            }
        }

        if let Some(total) = total_memory_gb() {
            if u64::from(config.ram_gb) > total {
                self.console
                    .say(&format!(
                        "[RAM] Aviso: se piden {} GB pero el equipo tiene {total} GB.",
                        config.ram_gb
                    ))
                    .await?;
            }
        }

        Ok(Some(fetched))
    }

    async fn start_tunnel(&mut self) -> LauncherResult<Option<TunnelHandle>> {
        if !self.state.settings.tunnel_enabled {
            return Ok(None);
        }
        match tunnel::spawn(&self.state.workspace, Box::new(SystemClipboard)) {
            Ok(TunnelStart::Started(handle)) => {
                self.console
                    .say("[TUNEL] Agente de playit.gg iniciado.")
                    .await?;
                Ok(Some(handle))
            }
            Ok(TunnelStart::Missing(path)) => {
                self.console
                    .say(&format!(
                        "[TUNEL] No se encontró {}. El servidor solo será accesible en la red local.",
                        path.display()
                    ))
                    .await?;
                Ok(None)
            }
            Err(e) => {
                warn!("Tunnel agent failed to start: {}", e);
                self.console
                    .say(&format!("[TUNEL] No se pudo iniciar el agente: {e}"))
                    .await?;
                Ok(None)
            }
        }
    }

    /// 1-based pick from a list of `len`; `None` when input ends.
    async fn choose_index(&mut self, label: &str, len: usize) -> LauncherResult<Option<usize>> {
        loop {
            let Some(raw) = self.ask(label).await? else {
                return Ok(None);
            };
            match raw.parse::<usize>() {
                Ok(n) if (1..=len).contains(&n) => return Ok(Some(n - 1)),
                _ => {
                    self.console
                        .say(&format!("[ERROR] Elige un número entre 1 y {len}."))
                        .await?
                }
            }
        }
    }

    async fn choose_ram(&mut self) -> LauncherResult<Option<u32>> {
        let label = format!("RAM en GB [{DEFAULT_RAM_GB}]: ");
        loop {
            let Some(raw) = self.ask(&label).await? else {
                return Ok(None);
            };
            if raw.is_empty() {
                return Ok(Some(DEFAULT_RAM_GB));
            }
            match parse_ram_gb(&raw) {
                Some(ram) => return Ok(Some(ram)),
                None => {
                    self.console
                        .say("[ERROR] La RAM debe ser un número entero positivo.")
                        .await?
                }
            }
        }
    }
}

fn total_memory_gb() -> Option<u64> {
    let mut system = sysinfo::System::new();
    system.refresh_memory();
    let bytes = system.total_memory();
    (bytes > 0).then(|| bytes / (1024 * 1024 * 1024))
}
