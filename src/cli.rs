use std::path::PathBuf;

use clap::Parser;

use crate::core::state::app_state::{
    LauncherSettings, DEFAULT_CONFIG_FILE, DEFAULT_JAVA_BIN, DEFAULT_WORKSPACE_DIR,
};

/// Interactive installer and supervisor for a local Minecraft server.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Server workspace directory
    #[arg(long, env = "SERVER_LAUNCHER_WORKSPACE", default_value = DEFAULT_WORKSPACE_DIR)]
    pub workspace: PathBuf,

    /// File holding the last used selection
    #[arg(long, env = "SERVER_LAUNCHER_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Java executable used for installers and the server
    #[arg(long, env = "SERVER_LAUNCHER_JAVA", default_value = DEFAULT_JAVA_BIN)]
    pub java: PathBuf,

    /// Do not start the playit.gg tunnel agent
    #[arg(long)]
    pub no_tunnel: bool,

    /// Verbose diagnostics on stderr (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn settings(&self) -> LauncherSettings {
        LauncherSettings {
            workspace_dir: self.workspace.clone(),
            config_file: self.config_file.clone(),
            java_bin: self.java.clone(),
            tunnel_enabled: !self.no_tunnel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_settings() {
        let args = Args::parse_from([
            "server-launcher",
            "--workspace",
            "/srv/mc",
            "--java",
            "/opt/jdk17/bin/java",
            "--no-tunnel",
        ]);
        let settings = args.settings();

        assert_eq!(settings.workspace_dir, PathBuf::from("/srv/mc"));
        assert_eq!(settings.java_bin, PathBuf::from("/opt/jdk17/bin/java"));
        assert!(!settings.tunnel_enabled);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
