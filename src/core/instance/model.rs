use std::fmt;
use std::str::FromStr;

use crate::core::error::ConfigParseError;

/// Server distributions the launcher knows how to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionKind {
    Forge,
    Fabric,
    Vanilla,
}

impl DistributionKind {
    pub const ALL: [DistributionKind; 3] = [
        DistributionKind::Forge,
        DistributionKind::Fabric,
        DistributionKind::Vanilla,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionKind::Forge => "Forge",
            DistributionKind::Fabric => "Fabric",
            DistributionKind::Vanilla => "Vanilla",
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionKind {
    type Err = ConfigParseError;

    /// Case-insensitive: `forge`, `FORGE` and `Forge` are the same kind.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        DistributionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ConfigParseError::InvalidValue {
                field: KEY_KIND,
                value: trimmed.to_string(),
            })
    }
}

const KEY_KIND: &str = "tipo";
const KEY_MC_VERSION: &str = "mc_version";
const KEY_SUB_VERSION: &str = "sub_version";
const KEY_RAM: &str = "ram";

/// RAM assumed when an older file has no `ram` line.
pub const DEFAULT_RAM_GB: u32 = 2;

/// Last selection made in the menu, persisted between sessions.
///
/// On disk this is a flat UTF-8 file with one `key=value` pair per line,
/// always written in the order `tipo`, `mc_version`, `sub_version`, `ram`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedConfiguration {
    pub kind: DistributionKind,
    pub mc_version: String,
    pub sub_version: String,
    pub ram_gb: u32,
}

impl SavedConfiguration {
    pub fn new(
        kind: DistributionKind,
        mc_version: impl Into<String>,
        sub_version: impl Into<String>,
        ram_gb: u32,
    ) -> Self {
        Self {
            kind,
            mc_version: mc_version.into(),
            sub_version: sub_version.into(),
            ram_gb,
        }
    }

    pub fn to_file_contents(&self) -> String {
        format!(
            "{KEY_KIND}={}\n{KEY_MC_VERSION}={}\n{KEY_SUB_VERSION}={}\n{KEY_RAM}={}\n",
            self.kind, self.mc_version, self.sub_version, self.ram_gb
        )
    }

    /// Parses the file contents. Lines without `=` and unknown keys are
    /// ignored, the last occurrence of a key wins.
    pub fn parse(contents: &str) -> Result<Self, ConfigParseError> {
        let mut kind = None;
        let mut mc_version = None;
        let mut sub_version = None;
        let mut ram = None;

        for line in contents.lines() {
            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                KEY_KIND => kind = Some(value),
                KEY_MC_VERSION => mc_version = Some(value),
                KEY_SUB_VERSION => sub_version = Some(value),
                KEY_RAM => ram = Some(value),
                _ => {}
            }
        }

        let kind = required(kind, KEY_KIND)?.parse::<DistributionKind>()?;
        let mc_version = required(mc_version, KEY_MC_VERSION)?;
        let sub_version = required(sub_version, KEY_SUB_VERSION)?;
        let ram_gb = match ram {
            None => DEFAULT_RAM_GB,
            Some(raw) => parse_ram_gb(raw).ok_or_else(|| ConfigParseError::InvalidValue {
                field: KEY_RAM,
                value: raw.to_string(),
            })?,
        };

        Ok(Self::new(kind, mc_version, sub_version, ram_gb))
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ConfigParseError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigParseError::MissingField(field)),
    }
}

/// Accepts only plain positive integers (`"4"`, not `"+4"`, `"0"` or `"4.5"`).
pub fn parse_ram_gb(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u32>().ok().filter(|gb| *gb > 0)
}
