// ─── Tunnel Agent Bridge ───
// Runs the playit.gg agent next to the server and surfaces its public link.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::AsyncWrite;
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::clipboard::ClipboardSink;
use super::output::merge_streams;
use crate::core::console::write_line;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::instance::ServerWorkspace;

pub const AGENT_NAME: &str = "playit-agent";

/// `<workspace>/playit-agent`, with `.exe` on Windows.
pub fn agent_path(workspace: &ServerWorkspace) -> PathBuf {
    workspace.file(&format!("{}{}", AGENT_NAME, std::env::consts::EXE_SUFFIX))
}

/// The `https://…` link inside an agent output line, if any.
pub fn find_public_url(line: &str) -> Option<&str> {
    let start = line.find("https://")?;
    let rest = &line[start..];
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    Some(&rest[..end])
}

pub enum TunnelStart {
    Started(TunnelHandle),
    /// No agent binary at this path; the server runs without a tunnel.
    Missing(PathBuf),
}

/// Running agent plus the task relaying its output.
///
/// Dropping the handle kills the agent; `shutdown` also waits for the
/// relay task to finish.
pub struct TunnelHandle {
    child: Child,
    stop: Option<oneshot::Sender<()>>,
    reader: JoinHandle<()>,
}

impl TunnelHandle {
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(e) = self.child.kill().await {
            debug!("tunnel agent already gone: {}", e);
        }
        let _ = (&mut self.reader).await;
        info!("Tunnel agent stopped");
    }
}

/// Starts the agent from the workspace if it is there.
pub fn spawn(
    workspace: &ServerWorkspace,
    clipboard: Box<dyn ClipboardSink>,
) -> LauncherResult<TunnelStart> {
    let path = agent_path(workspace);
    if !path.is_file() {
        return Ok(TunnelStart::Missing(path));
    }

    let mut child = Command::new(&path)
        .current_dir(workspace.root())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| LauncherError::Process(format!("failed to start {}: {e}", path.display())))?;

    let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
        (Some(stdout), Some(stderr)) => (stdout, stderr),
        _ => {
            return Err(LauncherError::Process(
                "tunnel agent output was not captured".into(),
            ))
        }
    };
    info!("Tunnel agent started (pid {:?})", child.id());

    let lines = merge_streams(stdout, stderr);
    let (stop_tx, stop_rx) = oneshot::channel();
    let reader = tokio::spawn(async move {
        let mut clipboard = clipboard;
        let mut out = tokio::io::stdout();
        if let Err(e) = relay_agent_output(lines, &mut out, clipboard.as_mut(), stop_rx).await {
            warn!("Tunnel output relay stopped: {}", e);
        }
    });

    Ok(TunnelStart::Started(TunnelHandle {
        child,
        stop: Some(stop_tx),
        reader,
    }))
}

/// Echoes agent lines and copies every line carrying a link.
///
/// Ends when the agent closes its output or `stop` fires (or its sender is
/// dropped). Returns how many links were seen.
pub async fn relay_agent_output<W>(
    mut lines: mpsc::Receiver<String>,
    out: &mut W,
    clipboard: &mut dyn ClipboardSink,
    mut stop: oneshot::Receiver<()>,
) -> LauncherResult<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut links = 0;
    loop {
        tokio::select! {
            _ = &mut stop => break,
            line = lines.recv() => {
                let Some(line) = line else { break };
                let line = line.trim();
                write_line(out, line).await?;

                let Some(url) = find_public_url(line) else { continue };
                links += 1;
                match clipboard.copy_text(line) {
                    Ok(()) => write_line(out, "[TUNEL] Enlace copiado al portapapeles.").await?,
                    Err(e) => debug!("clipboard copy skipped: {}", e),
                }
                write_line(out, &format!("[TUNEL] Enlace público detectado: {url}")).await?;
            }
        }
    }
    Ok(links)
}
