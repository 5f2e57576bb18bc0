//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the project, event and log stores.
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs_data_path().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // TIM_DATA_DIR etc.
        figment = figment.merge(Env::prefixed("TIM_"));

        figment.extract()
    }

    /// The project store file.
    pub fn project_table_path(&self) -> PathBuf {
        self.data_dir.join("project_definitions.json")
    }

    /// The event store file.
    pub fn event_table_path(&self) -> PathBuf {
        self.data_dir.join("event_definitions.json")
    }

    /// The directory holding one log file per day.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// Returns the platform-specific config directory for tim.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tim"))
}

/// Returns the platform-specific data directory for tim.
///
/// On Linux: `~/.local/share/tim`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("tim"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use figment::Jail;

    #[test]
    fn test_dirs_data_path_ends_with_tim() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "tim");
    }

    #[test]
    fn test_store_paths_live_under_data_dir() {
        let config = Config {
            data_dir: PathBuf::from("/data/tim"),
        };
        assert_eq!(
            config.project_table_path(),
            Path::new("/data/tim/project_definitions.json")
        );
        assert_eq!(
            config.event_table_path(),
            Path::new("/data/tim/event_definitions.json")
        );
        assert_eq!(config.log_dir(), Path::new("/data/tim/logs"));
    }

    #[test]
    fn test_config_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file("tim.toml", r#"data_dir = "/from/file""#)?;
            let config = Config::load_from(Some(Path::new("tim.toml")))?;
            assert_eq!(config.data_dir, Path::new("/from/file"));

            jail.set_env("TIM_DATA_DIR", "/from/env");
            let config = Config::load_from(Some(Path::new("tim.toml")))?;
            assert_eq!(config.data_dir, Path::new("/from/env"));
            Ok(())
        });
    }
}
