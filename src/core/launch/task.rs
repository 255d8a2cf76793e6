// ─── Server Supervisor ───
// Spawns the server process and relays its console until it exits.

use std::future::Future;
use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use super::output::merge_streams;
use crate::core::console::{write_line, Console};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::instance::ServerWorkspace;

/// Operator token that asks the server to stop.
pub const STOP_TOKEN: &str = "/stop";
/// What the server console expects for a graceful stop.
const SERVER_STOP_COMMAND: &str = "stop";

/// Everything needed to start the server jar.
pub struct ServerLaunch<'a> {
    pub java_bin: &'a Path,
    pub workspace: &'a ServerWorkspace,
    pub jar: &'a str,
    pub ram_gb: u32,
}

impl ServerLaunch<'_> {
    /// `-Xmx<N>G -Xms<N>G -jar <jar> nogui`: fixed heap, no GUI window.
    pub fn args(&self) -> Vec<String> {
        vec![
            format!("-Xmx{}G", self.ram_gb),
            format!("-Xms{}G", self.ram_gb),
            "-jar".to_string(),
            self.jar.to_string(),
            "nogui".to_string(),
        ]
    }

    /// The working directory is set on the child only.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(self.java_bin);
        cmd.args(self.args())
            .current_dir(self.workspace.root())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    pub fn spawn(&self) -> LauncherResult<Child> {
        let mut cmd = self.command();
        info!(
            "Launching {} with {} GB in {:?}",
            self.jar,
            self.ram_gb,
            self.workspace.root()
        );
        debug!("Command: {}", command_line(&cmd));

        cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LauncherError::JavaNotFound(self.java_bin.display().to_string())
            } else {
                LauncherError::JavaExecution(e.to_string())
            }
        })
    }
}

/// Maps operator input to a server console command. Only the exact
/// (trimmed) `/stop` is forwarded.
pub fn operator_command(input: &str) -> Option<&'static str> {
    (input.trim() == STOP_TOKEN).then_some(SERVER_STOP_COMMAND)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorExit {
    /// The server ended on its own (or after `/stop`) with this exit code.
    Exited(Option<i32>),
    /// The operator interrupted and the server was killed.
    Interrupted,
}

/// Relays server output to the console and operator commands to the server
/// until the server closes its output or `interrupt` resolves.
///
/// There is no timeout after `/stop`: the loop keeps relaying until the
/// server actually exits.
pub async fn supervise<R, W, F>(
    mut child: Child,
    console: &mut Console<R, W>,
    interrupt: F,
) -> LauncherResult<SupervisorExit>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
        (Some(stdout), Some(stderr)) => (stdout, stderr),
        _ => return Err(LauncherError::Process("server output was not captured".into())),
    };
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| LauncherError::Process("server stdin was not captured".into()))?;

    let mut output = merge_streams(stdout, stderr);
    let (operator, out) = console.split();
    let mut operator_open = true;
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            line = output.recv() => match line {
                Some(line) => write_line(out, line.trim_end()).await?,
                None => break,
            },
            input = operator.next_line(), if operator_open => match input {
                Ok(Some(text)) => {
                    let Some(command) = operator_command(&text) else {
                        debug!("ignoring operator input {:?}", text);
                        continue;
                    };
                    info!("Sending `{}` to the server", command);
                    let sent = async {
                        stdin.write_all(command.as_bytes()).await?;
                        stdin.write_all(b"\n").await?;
                        stdin.flush().await
                    }
                    .await;
                    if let Err(e) = sent {
                        warn!("Could not write to server stdin: {}", e);
                    }
                }
                Ok(None) => {
                    debug!("operator input closed");
                    operator_open = false;
                }
                Err(e) => {
                    warn!("Operator input unreadable, no longer forwarding: {}", e);
                    operator_open = false;
                }
            },
            _ = &mut interrupt => {
                warn!("Interrupt received, killing server");
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill server: {}", e);
                }
                return Ok(SupervisorExit::Interrupted);
            }
        }
    }

    let status = child
        .wait()
        .await
        .map_err(|e| LauncherError::Process(format!("failed to wait for server: {e}")))?;
    info!("Server exited with {:?}", status.code());
    Ok(SupervisorExit::Exited(status.code()))
}

/// Shell-pasteable rendering of `cmd` for the debug log.
fn command_line(cmd: &Command) -> String {
    let cmd = cmd.as_std();
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| quote_arg(&part.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_arg(raw: &str) -> String {
    let plain = !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=".contains(c));
    if plain {
        raw.to_string()
    } else {
        format!("'{}'", raw.replace('\'', r"'\''"))
    }
}
