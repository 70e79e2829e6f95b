//! Configuration file support
//!
//! Loads server configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{ExtractorConfig, FormatsMode, LogFormat, ServerConfig, DEFAULT_COOKIES_ENV};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Extractor settings
    pub extractor: Option<ExtractorSettings>,
    /// Response settings
    pub output: Option<OutputSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: Option<bool>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_enabled: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorSettings {
    /// Path to the yt-dlp binary
    pub ytdlp_path: Option<String>,
    /// Extraction timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Socket timeout in seconds
    pub socket_timeout_secs: Option<u64>,
    /// Skip TLS certificate validation
    pub no_check_certificate: Option<bool>,
    /// Proxy URL
    pub proxy: Option<String>,
    /// User-Agent override
    pub user_agent: Option<String>,
    /// Environment variable holding the cookies blob
    pub cookies_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Default formats mode (merged, raw)
    pub formats: Option<FormatsMode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,
    /// Output format (json, pretty)
    pub format: Option<LogFormat>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let extractor = ExtractorConfig::default();
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_enabled: Some(true),
            },
            extractor: Some(ExtractorSettings {
                ytdlp_path: None,
                timeout_secs: Some(extractor.timeout_secs),
                socket_timeout_secs: Some(extractor.socket_timeout_secs),
                no_check_certificate: Some(extractor.no_check_certificate),
                proxy: None,
                user_agent: None,
                cookies_env: Some(DEFAULT_COOKIES_ENV.to_string()),
            }),
            output: Some(OutputSettings {
                formats: Some(FormatsMode::Merged),
            }),
            logging: Some(LoggingSettings {
                level: Some("info".to_string()),
                format: Some(LogFormat::Pretty),
            }),
        }
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        let defaults = ExtractorConfig::default();
        let extractor = match self.extractor {
            Some(e) => ExtractorConfig {
                ytdlp_path: e.ytdlp_path,
                timeout_secs: e.timeout_secs.unwrap_or(defaults.timeout_secs),
                socket_timeout_secs: e
                    .socket_timeout_secs
                    .unwrap_or(defaults.socket_timeout_secs),
                no_check_certificate: e
                    .no_check_certificate
                    .unwrap_or(defaults.no_check_certificate),
                proxy: e.proxy.filter(|p| !p.is_empty()),
                user_agent: e.user_agent.filter(|u| !u.is_empty()),
                cookies_env: e.cookies_env.unwrap_or(defaults.cookies_env),
            },
            None => defaults,
        };

        ServerConfig {
            host: self.server.host,
            port: self.server.port,
            cors_enabled: self.server.cors_enabled.unwrap_or(true),
            log_level: self
                .logging
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or_else(|| "info".to_string()),
            log_format: self
                .logging
                .as_ref()
                .and_then(|l| l.format)
                .unwrap_or_default(),
            formats: self.output.and_then(|o| o.formats).unwrap_or_default(),
            extractor,
        }
    }
}

/// Load the server configuration from `path`, falling back to defaults
/// when the file does not exist.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    if !path.as_ref().exists() {
        return Ok(ConfigFile::default_config().into_server_config());
    }
    Ok(ConfigFile::from_file(path)?.into_server_config())
}
