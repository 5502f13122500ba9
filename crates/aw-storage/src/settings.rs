//! Wrapper settings
//!
//! A small TOML file telling the wrapper which tool to hand off to, how often
//! to reconcile config documents, and where the documents live. The wrapper
//! must never get in the way of the tool it fronts, so loading is permissive:
//! a missing or malformed settings file falls back to defaults with a warning
//! instead of an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the settings file location
pub const ENV_SETTINGS: &str = "ARC_WRAP_SETTINGS";
/// Environment variable overriding the wrapped tool
pub const ENV_TOOL: &str = "ARC_WRAP_TOOL";
/// Environment variable that disables the periodic sync when set
pub const ENV_NO_SYNC: &str = "ARC_WRAP_NO_SYNC";

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Wrapped tool settings
    pub tool: ToolConfig,
    /// Periodic sync settings
    pub sync: SyncConfig,
    /// File location overrides
    pub paths: PathsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tool: ToolConfig::default(),
            sync: SyncConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

/// Which tool the wrapper fronts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Program name or path to hand off to
    pub program: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: "arc".to_string(),
        }
    }
}

/// Periodic sync settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Whether the periodic sync runs at all
    pub enabled: bool,
    /// Minimum hours between reconciliation passes
    pub interval_hours: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_hours: 24,
        }
    }
}

/// File location overrides; unset fields use the conventional locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Team-wide default document (normally next to the executable)
    pub default_doc: Option<PathBuf>,
    /// User document (normally ~/.arcrc)
    pub user_doc: Option<PathBuf>,
    /// Last-sync stamp file (normally in the data directory)
    pub stamp: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the conventional location, honoring `ARC_WRAP_SETTINGS`
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    /// Load settings from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(settings) => {
                    debug!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Ignoring malformed settings file {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => {
                warn!("Failed to read settings file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// The tool to hand off to, with the `ARC_WRAP_TOOL` override applied
    pub fn tool_program(&self) -> String {
        std::env::var(ENV_TOOL)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.tool.program.clone())
    }

    /// Whether the periodic sync should run, honoring `ARC_WRAP_NO_SYNC`
    pub fn sync_enabled(&self) -> bool {
        self.sync.enabled && std::env::var_os(ENV_NO_SYNC).is_none()
    }

    /// Where the team-wide default document lives
    pub fn default_doc_path(&self) -> PathBuf {
        if let Some(path) = &self.paths.default_doc {
            return path.clone();
        }
        executable_dir().join("arcrc.default")
    }

    /// Where the user document lives
    pub fn user_doc_path(&self) -> PathBuf {
        if let Some(path) = &self.paths.user_doc {
            return path.clone();
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".arcrc")
    }

    /// Where the last-sync stamp lives
    pub fn stamp_path(&self) -> PathBuf {
        if let Some(path) = &self.paths.stamp {
            return path.clone();
        }
        directories::ProjectDirs::from("com", "arc-wrap", "arc-wrap")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".arc-wrap")
            })
            .join("last-sync")
    }
}

/// Default settings file location (~/.config/arc-wrap/config.toml or similar)
pub fn settings_path() -> PathBuf {
    if let Some(path) = std::env::var_os(ENV_SETTINGS) {
        return PathBuf::from(path);
    }
    directories::ProjectDirs::from("com", "arc-wrap", "arc-wrap")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".arc-wrap")
        })
        .join("config.toml")
}

fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
