use std::path::{Path, PathBuf};
use std::process::Stdio;

use tracing::{debug, info, instrument};

use crate::core::error::{LauncherError, LauncherResult};

/// What `java -version` told us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaInstallation {
    pub path: PathBuf,
    /// Quoted version token, e.g. `17.0.8` or `1.8.0_392`, when printed.
    pub version: Option<String>,
    pub major: Option<u32>,
}

/// The external runtime used for installers and the server itself.
#[derive(Debug, Clone)]
pub struct JavaRuntime {
    java_bin: PathBuf,
}

impl JavaRuntime {
    pub fn new(java_bin: impl Into<PathBuf>) -> Self {
        Self {
            java_bin: java_bin.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.java_bin
    }

    /// Runs `<java> -version`. Success is exit status zero; the version is
    /// parsed for display only and never enforced.
    #[instrument(skip(self), fields(java = %self.java_bin.display()))]
    pub async fn check(&self) -> LauncherResult<JavaInstallation> {
        let output = tokio::process::Command::new(&self.java_bin)
            .arg("-version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                debug!("java -version could not start: {}", e);
                LauncherError::JavaNotFound(self.java_bin.display().to_string())
            })?;

        if !output.status.success() {
            return Err(LauncherError::JavaExecution(format!(
                "{} -version exited with {:?}",
                self.java_bin.display(),
                output.status.code()
            )));
        }

        // Java prints its banner on stderr.
        let banner = format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );
        let version = parse_version_string(&banner);
        let major = version.as_deref().map(parse_major_version);

        info!("Java runtime ok: {:?}", version);
        Ok(JavaInstallation {
            path: self.java_bin.clone(),
            version,
            major,
        })
    }
}

/// First double-quoted token of the banner (`openjdk version "21.0.2" ...`).
pub fn parse_version_string(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let start = line.find('"')?;
        let end = line[start + 1..].find('"')?;
        Some(line[start + 1..start + 1 + end].to_string())
    })
}

pub fn parse_major_version(version: &str) -> u32 {
    let first_part = version.split('.').next().unwrap_or("0");
    let major: u32 = first_part.parse().unwrap_or(0);

    if major == 1 {
        version
            .split('.')
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or(major)
    } else {
        major
    }
}

/// Minimum Java major a vanilla server of that version starts on.
pub fn required_java_for_minecraft_version(minecraft_version: &str) -> u32 {
    let mut parts = minecraft_version.split('.');
    let major = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(1);
    let minor = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(20);
    let patch = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(0);

    if major > 1 || minor >= 21 || (minor == 20 && patch >= 5) {
        21
    } else if minor >= 17 {
        17
    } else {
        8
    }
}
