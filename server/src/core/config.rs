use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, DEFAULT_PORT,
    MAX_PAGE_SIZE,
};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Pagination configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PaginationFileConfig {
    pub default_size: Option<u32>,
    pub max_size: Option<u32>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub pagination: Option<PaginationFileConfig>,
    pub data_dir: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(pagination) = other.pagination {
            let current = self
                .pagination
                .get_or_insert_with(PaginationFileConfig::default);
            if pagination.default_size.is_some() {
                tracing::trace!(default_size = ?pagination.default_size, "Merging pagination.default_size");
                current.default_size = pagination.default_size;
            }
            if pagination.max_size.is_some() {
                tracing::trace!(max_size = ?pagination.max_size, "Merging pagination.max_size");
                current.max_size = pagination.max_size;
            }
        }

        if other.data_dir.is_some() {
            tracing::trace!(data_dir = ?other.data_dir, "Merging data_dir");
            self.data_dir = other.data_dir;
        }
    }
}

// =============================================================================
// Resolved Config Structs
// =============================================================================

/// Server configuration (resolved)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Pagination configuration (resolved)
///
/// Flows into the query parameter parser so defaults and limits stay
/// deployment-configurable rather than baked into the parsing code.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    pub default_page: u32,
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: DEFAULT_PAGE,
            default_size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
        }
    }
}

/// Application configuration (resolved from all sources)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub pagination: PaginationConfig,
    /// Data directory override from config file or CLI
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.stockroom/stockroom.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let file_server = file_config.server.unwrap_or_default();
        let file_pagination = file_config.pagination.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let pagination = PaginationConfig {
            default_page: DEFAULT_PAGE,
            default_size: file_pagination.default_size.unwrap_or(DEFAULT_PAGE_SIZE),
            max_size: file_pagination.max_size.unwrap_or(MAX_PAGE_SIZE),
        };

        if pagination.default_size == 0 || pagination.default_size > pagination.max_size {
            anyhow::bail!(
                "Invalid pagination config: default_size {} must be between 1 and max_size {}",
                pagination.default_size,
                pagination.max_size
            );
        }

        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| file_config.data_dir.as_deref().map(expand_path));

        let config = Self {
            server: ServerConfig { host, port },
            pagination,
            data_dir,
        };

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            "Configuration loaded"
        );

        Ok(config)
    }
}

fn get_profile_config_path() -> Option<PathBuf> {
    directories::UserDirs::new().map(|u| u.home_dir().join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
