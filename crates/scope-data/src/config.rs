use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use scope_search::SearchConfig;

/// Configuration for scope.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (SCOPE_* prefix)
/// 3. Config file (~/.config/scope/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `<src>_to_<tgt>.tsv` and `<species>_synonyms.tsv`.
    ///
    /// Can be set via:
    /// - CLI: --orthology-dir /path
    /// - ENV: SCOPE_ORTHOLOGY_DIR
    /// - Config: orthology_dir = "/path"
    /// - Default: ~/.local/share/scope/orthology
    #[serde(default = "default_orthology_dir")]
    pub orthology_dir: PathBuf,

    /// Directory relative dataset names are looked up in.
    ///
    /// Can be set via:
    /// - ENV: SCOPE_DATA_DIR
    /// - Config: data_dir = "/path"
    /// - Default: ~/.local/share/scope/datasets
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Cache sizes, from the `[search]` table.
    #[serde(default)]
    pub search: SearchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            orthology_dir: default_orthology_dir(),
            data_dir: default_data_dir(),
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration using `config_path` in place of the default file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("scope");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Load configuration, then apply the --orthology-dir flag if given.
    pub fn load_with_orthology_dir(orthology_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::load()?;
        if let Some(dir) = orthology_dir {
            config.orthology_dir = dir;
        }
        Ok(config)
    }

    /// Where a dataset named on the command line lives: the path itself if
    /// it exists, otherwise the same name under `data_dir`.
    pub fn dataset_path(&self, name: &Path) -> PathBuf {
        if name.exists() || name.is_absolute() {
            name.to_path_buf()
        } else {
            self.data_dir.join(name)
        }
    }
}

fn scope_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scope")
}

fn default_orthology_dir() -> PathBuf {
    scope_data_dir().join("orthology")
}

fn default_data_dir() -> PathBuf {
    scope_data_dir().join("datasets")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/scope/config.toml
/// - macOS: ~/Library/Application Support/scope/config.toml
/// - Windows: %APPDATA%\scope\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scope")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Scope Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (SCOPE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Directory with ortholog and synonym tables
#
#   <source>_to_<target>.tsv   source_gene, target_gene, percent identity
#   <species>_synonyms.tsv     literal gene name, canonical gene name
#
# Can also be set via:
# - CLI: scope --orthology-dir /path lookup ...
# - Environment: SCOPE_ORTHOLOGY_DIR=/path
#
# Default: Platform-specific data directory
#orthology_dir = "/path/to/orthology"

# Directory searched for datasets given by relative name
#
# Can also be set via:
# - Environment: SCOPE_DATA_DIR=/path
#data_dir = "/path/to/datasets"

[search]
# Built search indices kept in memory (one per dataset and species prefix)
index_cache_capacity = 16

# Resolved queries kept in memory
query_cache_capacity = 256
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    write_config_file(&config_file_path())
}

fn write_config_file(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
