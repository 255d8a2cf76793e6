// ─── Session Menu ───
// Text menu driving install, launch and configuration edits.

use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{error, info};

use crate::core::console::Console;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::instance::SavedConfiguration;
use crate::core::launch::Interrupt;
use crate::core::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Select,
    Resume,
    Edit,
    Reset,
    Exit,
}

impl MenuChoice {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(MenuChoice::Select),
            "2" => Some(MenuChoice::Resume),
            "3" => Some(MenuChoice::Edit),
            "4" => Some(MenuChoice::Reset),
            "5" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// What the menu does after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<R, W> {
    pub(crate) state: AppState,
    pub(crate) console: Console<R, W>,
    pub(crate) interrupt: Interrupt,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Session interrupted by Ctrl-C.
    pub fn new(state: AppState, console: Console<R, W>) -> Self {
        Self::with_interrupt(state, console, Interrupt::CtrlC)
    }

    pub fn with_interrupt(state: AppState, console: Console<R, W>, interrupt: Interrupt) -> Self {
        Self {
            state,
            console,
            interrupt,
        }
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Menu loop. Returns on exit, reset, end of input or Ctrl-C at a prompt.
    pub async fn run(&mut self) -> LauncherResult<()> {
        loop {
            let saved = self.state.config_store.try_load().await;
            self.print_menu(saved.as_ref()).await?;

            let choice = match self.ask("Selecciona una opción (1-5): ").await {
                Ok(Some(raw)) => raw,
                Ok(None) | Err(LauncherError::Interrupted) => break,
                Err(e) => return Err(e),
            };
            let Some(choice) = MenuChoice::parse(&choice) else {
                self.console.say("[ERROR] Opción inválida.").await?;
                continue;
            };
            info!("Menu choice: {:?}", choice);

            let outcome = match choice {
                MenuChoice::Select => self.select_server().await,
                MenuChoice::Resume => self.resume_server().await,
                MenuChoice::Edit => self.edit_configuration().await,
                MenuChoice::Reset => self.reset_all().await,
                MenuChoice::Exit => {
                    self.console.say("¡Hasta luego!").await?;
                    Ok(Flow::Quit)
                }
            };

            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) | Err(LauncherError::Interrupted) => break,
                Err(e) => {
                    error!("{:?} failed: {}", choice, e);
                    self.console.say(&format!("[ERROR] {e}")).await?;
                }
            }
        }
        Ok(())
    }

    async fn print_menu(&mut self, saved: Option<&SavedConfiguration>) -> LauncherResult<()> {
        self.console
            .say("\n=== Instalador de Servidor Minecraft ===")
            .await?;
        if let Some(config) = saved {
            self.console
                .say(&format!(
                    "Última configuración: {} {} ({}), {} GB",
                    config.kind, config.mc_version, config.sub_version, config.ram_gb
                ))
                .await?;
        }
        for line in [
            "1. Seleccionar tipo y versión de servidor",
            "2. Iniciar servidor con configuración guardada",
            "3. Editar configuración sin iniciar",
            "4. Borrar configuración y salir",
            "5. Salir",
        ] {
            self.console.say(line).await?;
        }
        Ok(())
    }

    /// Prompt that gives up on end of input (`None`) or Ctrl-C (`Interrupted`).
    pub(crate) async fn ask(&mut self, label: &str) -> LauncherResult<Option<String>> {
        tokio::select! {
            answer = self.console.prompt(label) => answer,
            _ = self.interrupt.wait() => Err(LauncherError::Interrupted),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use tokio::sync::Notify;

    use crate::core::console::tests::{output_of, raw_memory_console, MemoryConsole};
    use crate::core::downloader::ArtifactTransport;
    use crate::core::instance::DistributionKind;
    use crate::core::loaders::InstallerRunner;
    use crate::core::state::LauncherSettings;
    use crate::core::test_support::scratch_dir;

    /// Counts downloads and always answers 503, or never answers at all
    /// when `stalled`.
    #[derive(Default)]
    pub(crate) struct OfflineTransport {
        pub(crate) calls: AtomicUsize,
        stalled: bool,
    }

    #[async_trait]
    impl ArtifactTransport for OfflineTransport {
        async fn download(&self, url: &str, _dest: &Path) -> LauncherResult<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.stalled {
                std::future::pending::<()>().await;
            }
            Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: 503,
            })
        }
    }

    struct NoInstaller;

    #[async_trait]
    impl InstallerRunner for NoInstaller {
        async fn run_installer(&self, _workspace: &Path, _jar: &str) -> LauncherResult<bool> {
            panic!("installer must not run in menu tests");
        }
    }

    pub(crate) struct Fixture {
        pub(crate) dir: PathBuf,
        pub(crate) transport: Arc<OfflineTransport>,
        interrupt: Interrupt,
        /// Fires the session's interrupt, standing in for Ctrl-C.
        pub(crate) ctrl_c: Arc<Notify>,
    }

    impl Fixture {
        pub(crate) fn new(label: &str) -> Self {
            Self::with_transport(label, OfflineTransport::default())
        }

        /// Downloads hang until the session is interrupted.
        pub(crate) fn stalled(label: &str) -> Self {
            Self::with_transport(
                label,
                OfflineTransport {
                    stalled: true,
                    ..Default::default()
                },
            )
        }

        fn with_transport(label: &str, transport: OfflineTransport) -> Self {
            let (interrupt, ctrl_c) = Interrupt::manual();
            Self {
                dir: scratch_dir(label),
                transport: Arc::new(transport),
                interrupt,
                ctrl_c,
            }
        }

        pub(crate) fn session(&self, input: &'static str) -> Session<&'static [u8], Vec<u8>> {
            self.raw_session(input.as_bytes())
        }

        pub(crate) fn raw_session(&self, input: &'static [u8]) -> Session<&'static [u8], Vec<u8>> {
            let settings = LauncherSettings {
                workspace_dir: self.dir.join("ServidorMinecraft"),
                config_file: self.dir.join("ultima_configuracion.txt"),
                java_bin: self.dir.join("java"),
                tunnel_enabled: false,
            };
            let state =
                AppState::with_services(settings, self.transport.clone(), Arc::new(NoInstaller))
                    .unwrap();
            Session::with_interrupt(state, raw_memory_console(input), self.interrupt.clone())
        }

        pub(crate) fn config_path(&self) -> PathBuf {
            self.dir.join("ultima_configuracion.txt")
        }

        pub(crate) fn workspace_path(&self) -> PathBuf {
            self.dir.join("ServidorMinecraft")
        }

        pub(crate) fn downloads(&self) -> usize {
            self.transport.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn write_config(&self, raw: &str) {
            std::fs::create_dir_all(&self.dir).unwrap();
            std::fs::write(self.config_path(), raw).unwrap();
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    pub(crate) async fn run_to_end(session: Session<&'static [u8], Vec<u8>>) -> String {
        let mut session = session;
        session.run().await.unwrap();
        let console: MemoryConsole = session.into_console();
        output_of(console)
    }

    #[test]
    fn menu_choices_parse_from_digits() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Select));
        assert_eq!(MenuChoice::parse(" 4 "), Some(MenuChoice::Reset));
        assert_eq!(MenuChoice::parse("5"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("6"), None);
        assert_eq!(MenuChoice::parse("salir"), None);
    }

    #[tokio::test]
    async fn end_of_input_leaves_the_menu() {
        let fixture = Fixture::new("menu-eof");
        let out = run_to_end(fixture.session("")).await;
        assert!(out.contains("=== Instalador de Servidor Minecraft ==="));
    }

    #[tokio::test]
    async fn invalid_option_redisplays_menu() {
        let fixture = Fixture::new("menu-invalid");
        let out = run_to_end(fixture.session("9\n5\n")).await;
        assert!(out.contains("[ERROR] Opción inválida."));
        assert_eq!(out.matches("=== Instalador").count(), 2);
        assert!(out.contains("¡Hasta luego!"));
    }

    #[tokio::test]
    async fn undecodable_menu_input_reprompts() {
        let fixture = Fixture::new("menu-latin1");
        let out = run_to_end(fixture.raw_session(b"\xff\n5\n")).await;

        assert!(out.contains("[ERROR] Opción inválida."));
        assert!(out.contains("¡Hasta luego!"));
    }

    #[tokio::test]
    async fn saved_configuration_is_shown_in_header() {
        let fixture = Fixture::new("menu-header");
        fixture.write_config("tipo=Fabric\nmc_version=1.20.1\nsub_version=0.15.7\nram=3\n");

        let out = run_to_end(fixture.session("5\n")).await;
        assert!(out.contains("Última configuración: Fabric 1.20.1 (0.15.7), 3 GB"));
        assert!(fixture.config_path().is_file());
    }

    #[tokio::test]
    async fn exit_keeps_everything_on_disk() {
        let fixture = Fixture::new("menu-exit");
        let config = SavedConfiguration::new(DistributionKind::Vanilla, "1.20.1", "vanilla", 2);
        fixture.write_config(&config.to_file_contents());

        run_to_end(fixture.session("5\n")).await;
        assert!(fixture.config_path().is_file());
        assert_eq!(fixture.downloads(), 0);
    }
}
