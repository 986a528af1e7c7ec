use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_DOWNLOADS_DIR: &str = "SCHOOLD_DOWNLOADS_DIR";
pub const ENV_SEED: &str = "SCHOOLD_SEED";
pub const ENV_ROSTER_SCOPE: &str = "SCHOOLD_ROSTER_SCOPE";
pub const ENV_ATTENDANCE_SOURCE: &str = "SCHOOLD_ATTENDANCE_SOURCE";
pub const ENV_LOG: &str = "SCHOOLD_LOG";

/// Which students the student/attendance screens and exports list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RosterScope {
    /// Every known student, whatever class is selected.
    #[default]
    Global,
    /// Only the selected class's roster.
    Class,
}

impl RosterScope {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Some(Self::Global),
            "class" => Some(Self::Class),
            _ => None,
        }
    }
}

/// What an attendance export prints next to each name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttendanceSource {
    /// A fresh random number in [50, 100] per export, unrelated to stored data.
    #[default]
    Fabricated,
    /// The stored Present/Absent flag.
    Recorded,
}

impl AttendanceSource {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fabricated" => Some(Self::Fabricated),
            "recorded" => Some(Self::Recorded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub downloads_dir: PathBuf,
    pub seed: Option<u64>,
    pub roster_scope: RosterScope,
    pub attendance_source: AttendanceSource,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            downloads_dir: PathBuf::from("downloads"),
            seed: None,
            roster_scope: RosterScope::default(),
            attendance_source: AttendanceSource::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Bad values fall back to the default with a warning; startup never fails
    /// on configuration.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Config::default();

        if let Some(dir) = lookup(ENV_DOWNLOADS_DIR).filter(|v| !v.trim().is_empty()) {
            cfg.downloads_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(ENV_SEED) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => cfg.seed = Some(seed),
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid {}", ENV_SEED),
            }
        }
        if let Some(raw) = lookup(ENV_ROSTER_SCOPE) {
            match RosterScope::parse(&raw) {
                Some(v) => cfg.roster_scope = v,
                None => tracing::warn!(value = %raw, "ignoring invalid {}", ENV_ROSTER_SCOPE),
            }
        }
        if let Some(raw) = lookup(ENV_ATTENDANCE_SOURCE) {
            match AttendanceSource::parse(&raw) {
                Some(v) => cfg.attendance_source = v,
                None => {
                    tracing::warn!(value = %raw, "ignoring invalid {}", ENV_ATTENDANCE_SOURCE)
                }
            }
        }
        cfg
    }
}
