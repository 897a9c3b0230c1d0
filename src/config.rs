use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::advisory::render::DEFAULT_WIDTH;
use crate::advisory::repository::{DEFAULT_GLSA_DIR, DEFAULT_PREFIX, DEFAULT_SUFFIX};
use crate::applied::DEFAULT_CHECKFILE;
use crate::version::catalogs::{DEFAULT_REPO_DIR, DEFAULT_VDB_DIR};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// glsa-check configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GlsaConfig {
    /// Directory holding the advisory documents
    pub glsa_dir: PathBuf,
    pub glsa_prefix: String,
    pub glsa_suffix: String,
    /// File listing advisories already applied
    pub checkfile: PathBuf,
    /// Installed package database
    pub vdb_dir: PathBuf,
    /// Package repository whose metadata cache lists available versions
    pub repo_dir: PathBuf,
    /// Host architecture keyword; detected when unset
    pub arch: Option<String>,
    pub print_width: usize,
    /// JSON record list used instead of `vdbDir`
    pub installed_catalog: Option<PathBuf>,
    /// JSON record list used instead of `repoDir`
    pub available_catalog: Option<PathBuf>,
    pub log: LogConfig,
}

impl Default for GlsaConfig {
    fn default() -> Self {
        Self {
            glsa_dir: PathBuf::from(DEFAULT_GLSA_DIR),
            glsa_prefix: DEFAULT_PREFIX.to_string(),
            glsa_suffix: DEFAULT_SUFFIX.to_string(),
            checkfile: PathBuf::from(DEFAULT_CHECKFILE),
            vdb_dir: PathBuf::from(DEFAULT_VDB_DIR),
            repo_dir: PathBuf::from(DEFAULT_REPO_DIR),
            arch: None,
            print_width: DEFAULT_WIDTH,
            installed_catalog: None,
            available_catalog: None,
            log: LogConfig::default(),
        }
    }
}

/// Logging-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    /// Level used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
    /// Write logs here instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Values given on the command line, which win over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub glsa_dir: Option<PathBuf>,
    pub arch: Option<String>,
    pub checkfile: Option<PathBuf>,
    pub vdb_dir: Option<PathBuf>,
    pub repo_dir: Option<PathBuf>,
    pub installed_catalog: Option<PathBuf>,
    pub available_catalog: Option<PathBuf>,
}

impl GlsaConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit`, or the default config file when it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = config_path();
                if path.is_file() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(dir) = overrides.glsa_dir {
            self.glsa_dir = dir;
        }
        if let Some(arch) = overrides.arch {
            self.arch = Some(arch);
        }
        if let Some(checkfile) = overrides.checkfile {
            self.checkfile = checkfile;
        }
        if let Some(dir) = overrides.vdb_dir {
            self.vdb_dir = dir;
        }
        if let Some(dir) = overrides.repo_dir {
            self.repo_dir = dir;
        }
        if overrides.installed_catalog.is_some() {
            self.installed_catalog = overrides.installed_catalog;
        }
        if overrides.available_catalog.is_some() {
            self.available_catalog = overrides.available_catalog;
        }
        self
    }

    /// The configured architecture, or the host's
    pub fn arch(&self) -> String {
        self.arch
            .clone()
            .unwrap_or_else(|| host_arch(std::env::consts::ARCH))
    }
}

/// Map a Rust target architecture to its Gentoo keyword
pub fn host_arch(target_arch: &str) -> String {
    match target_arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "x86",
        "powerpc64" => "ppc64",
        "powerpc" => "ppc",
        "riscv64" => "riscv",
        "loongarch64" => "loong",
        other => other,
    }
    .to_string()
}

/// Returns the path to the config file.
/// Uses $XDG_CONFIG_HOME/glsa-check/config.json if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/glsa-check/config.json,
/// or ./glsa-check/config.json if neither is available.
pub fn config_path() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir()).join("config.json")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("glsa-check")
}
