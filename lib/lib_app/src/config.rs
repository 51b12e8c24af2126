use std::{
    fs, io,
    path::{Path, PathBuf},
};

use lib_renderer::RendererConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub renderer: RendererConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Application".to_owned(),
            width: 800,
            height: 600,
            resizable: false,
            vsync: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`load`](Self::load), but a missing file silently yields the defaults and any
    /// other failure is logged before falling back to them.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => {
                log::warn!("{}, using defaults", crate::error_report(&err));
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use lib_renderer::FlushPolicy;

    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.window.title, "Application");
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert!(config.window.vsync && !config.window.resizable);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [window]
            title = "Demo"
            width = 1280

            [renderer]
            flush_policy = "always"
            "#,
        )
        .unwrap();

        assert_eq!(config.window.title, "Demo");
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.renderer.flush_policy, FlushPolicy::Always);
        assert_eq!(config.renderer.batch_capacity, 1024);
    }

    #[test]
    fn missing_file_falls_back_silently() {
        let path = std::env::temp_dir().join("lib_app_config_that_does_not_exist.toml");

        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Io { .. })));
        assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("lib_app_invalid_{}.toml", std::process::id()));
        fs::write(&path, "window = 3").unwrap();

        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());

        fs::remove_file(&path).unwrap();
    }
}
