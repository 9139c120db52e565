use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const SETTINGS_FILE: &str = "payables_uploader.json";
pub const PORT_FILE: &str = "logs/server_port.txt";
pub const URL_ENV_VAR: &str = "PAYABLES_UPLOADER_URL";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Optional overrides read from the settings file.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub server_url: Option<String>,
    pub reset_delay_ms: Option<u64>,
    pub download_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderConfig {
    pub server_url: String,
    pub reset_delay: Duration,
    pub download_dir: PathBuf,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            reset_delay: crate::upload::DEFAULT_RESET_DELAY,
            download_dir: PathBuf::from("."),
        }
    }
}

impl UploaderConfig {
    /// Resolves the configuration relative to `base_dir`.
    ///
    /// The server URL comes from the environment override, then the settings
    /// file, then the port the local server advertised, then the default.
    pub fn load(base_dir: &Path) -> Self {
        let env_url = std::env::var(URL_ENV_VAR).ok();
        Self::load_with_override(base_dir, env_url)
    }

    /// Same as [`UploaderConfig::load`] with the environment override passed in.
    ///
    /// An unreadable settings file is logged and skipped; the override and
    /// the port file still apply.
    pub fn load_with_override(base_dir: &Path, env_url: Option<String>) -> Self {
        let settings = match Settings::from_file(&base_dir.join(SETTINGS_FILE)) {
            Ok(settings) => settings.unwrap_or_default(),
            Err(e) => {
                warn!("{}; ignoring settings file", e);
                Settings::default()
            }
        };
        let env_url = env_url.filter(|url| !url.trim().is_empty());
        Self::resolve(base_dir, settings, env_url)
    }

    fn resolve(base_dir: &Path, settings: Settings, env_url: Option<String>) -> Self {
        let defaults = Self::default();

        let server_url = env_url
            .or(settings.server_url)
            .or_else(|| read_server_port(&base_dir.join(PORT_FILE)).map(local_url))
            .unwrap_or(defaults.server_url);

        let config = Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            reset_delay: settings
                .reset_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.reset_delay),
            download_dir: settings
                .download_dir
                .unwrap_or_else(|| base_dir.to_path_buf()),
        };
        info!("Using server at {}", config.server_url);
        config
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            debug!("No settings file at {}", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(settings))
    }
}

/// Reads the port the server wrote on startup. Missing or garbled files yield `None`.
pub fn read_server_port(path: &Path) -> Option<u16> {
    let content = fs::read_to_string(path).ok()?;
    match content.trim().parse::<u16>() {
        Ok(port) if port != 0 => Some(port),
        _ => {
            warn!("Ignoring unreadable port file {}", path.display());
            None
        }
    }
}

fn local_url(port: u16) -> String {
    format!("http://127.0.0.1:{}", port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_without_any_files() {
        let dir = tempdir().unwrap();
        let config = UploaderConfig::resolve(dir.path(), Settings::default(), None);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.reset_delay, Duration::from_secs(2));
        assert_eq!(config.download_dir, dir.path());
    }

    #[test]
    fn port_file_points_at_local_server() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("logs")).unwrap();
        fs::write(dir.path().join(PORT_FILE), "5003\n").unwrap();

        let config = UploaderConfig::resolve(dir.path(), Settings::default(), None);
        assert_eq!(config.server_url, "http://127.0.0.1:5003");
    }

    #[test]
    fn garbled_port_file_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("port.txt");
        fs::write(&path, "not a port").unwrap();
        assert_eq!(read_server_port(&path), None);
        assert_eq!(read_server_port(&dir.path().join("missing.txt")), None);
    }

    #[test]
    fn settings_file_overrides_port_file_and_env_overrides_both() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("logs")).unwrap();
        fs::write(dir.path().join(PORT_FILE), "5003").unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "server_url": "http://reports.local:8080/", "reset_delay_ms": 500 }"#,
        )
        .unwrap();

        let settings = Settings::from_file(&dir.path().join(SETTINGS_FILE))
            .unwrap()
            .unwrap();
        let config = UploaderConfig::resolve(dir.path(), settings.clone(), None);
        assert_eq!(config.server_url, "http://reports.local:8080");
        assert_eq!(config.reset_delay, Duration::from_millis(500));

        let config = UploaderConfig::resolve(
            dir.path(),
            settings,
            Some("http://override:9000".to_string()),
        );
        assert_eq!(config.server_url, "http://override:9000");
    }

    #[test]
    fn broken_settings_file_keeps_port_file_and_override() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("logs")).unwrap();
        fs::write(dir.path().join(PORT_FILE), "5007").unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), r#"{"server_ur":"x"}"#).unwrap();

        let config = UploaderConfig::load_with_override(dir.path(), None);
        assert_eq!(config.server_url, "http://127.0.0.1:5007");
        assert_eq!(config.reset_delay, Duration::from_secs(2));

        let config = UploaderConfig::load_with_override(
            dir.path(),
            Some("http://override:9000".to_string()),
        );
        assert_eq!(config.server_url, "http://override:9000");
    }

    #[test]
    fn blank_override_is_ignored() {
        let dir = tempdir().unwrap();
        let config = UploaderConfig::load_with_override(dir.path(), Some("  ".to_string()));
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn unknown_settings_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{ "server": "x" }"#).unwrap();
        assert!(matches!(
            Settings::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
