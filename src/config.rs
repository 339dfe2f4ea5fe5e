use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};

/// Name of the single external setting: the fallback URL of the CSV.
pub const DATA_URL_SETTING: &str = "DATA_URL";

const APP_DIR: &str = "inwork-poverty";
const CONFIG_FILE: &str = "config.toml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Fallback location of the CSV, used only when no local file is found.
    pub data_url: Option<String>,
}

impl Config {
    /// Default location of the config file.
    ///
    /// Linux: `~/.config/inwork-poverty/config.toml`
    /// macOS: `~/Library/Application Support/inwork-poverty/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn from_toml_str(contents: &str, path: &Path) -> DataResult<Self> {
        toml::from_str(contents).map_err(|e| DataError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read the config file at `path`, or at [`Config::default_path`] when
    /// `None`. A missing file yields the defaults.
    pub fn read(path: Option<&Path>) -> DataResult<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            log::warn!("No config directory on this platform, using defaults");
            return Ok(Config::default());
        };
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::from_toml_str(&contents, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config file at {}, using defaults", path.display());
                Ok(Config::default())
            }
            Err(source) => Err(DataError::Io { path, source }),
        }
    }

    /// Let a non-empty `DATA_URL` value take precedence over the file.
    pub fn with_env_override(mut self, env_value: Option<String>) -> Self {
        if let Some(url) = env_value.filter(|u| !u.trim().is_empty()) {
            self.data_url = Some(url.trim().to_string());
        }
        self
    }

    /// [`Config::read`] followed by the `DATA_URL` environment override.
    pub fn load(path: Option<&Path>) -> DataResult<Self> {
        let config = Self::read(path)?;
        Ok(config.with_env_override(std::env::var(DATA_URL_SETTING).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_data_url() {
        let config =
            Config::from_toml_str(r#"data_url = "https://example.org/iw.csv""#, Path::new("c.toml"))
                .unwrap();
        assert_eq!(config.data_url.as_deref(), Some("https://example.org/iw.csv"));
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("", Path::new("c.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = Config::from_toml_str("data_url = ", Path::new("c.toml")).unwrap_err();
        assert!(matches!(err, DataError::Config { .. }));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::read(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.data_url, None);
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_url = \"https://example.org/a.csv\"\n").unwrap();
        let config = Config::read(Some(&path)).unwrap();
        assert_eq!(config.data_url.as_deref(), Some("https://example.org/a.csv"));
    }

    #[test]
    fn env_override_wins_unless_blank() {
        let base = Config {
            data_url: Some("https://file.example/a.csv".into()),
        };
        let overridden = base
            .clone()
            .with_env_override(Some(" https://env.example/b.csv ".into()));
        assert_eq!(overridden.data_url.as_deref(), Some("https://env.example/b.csv"));

        let kept = base.clone().with_env_override(Some("   ".into()));
        assert_eq!(kept, base);
        assert_eq!(base.clone().with_env_override(None), base);
    }
}
