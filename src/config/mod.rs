use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default = "default_true")]
    pub location_enabled: bool,
    #[serde(default = "default_location_timeout_secs")]
    pub location_timeout_secs: u64,
    #[serde(default = "default_min_task_duration")]
    pub min_task_duration: u32,
    #[serde(default = "default_max_task_duration")]
    pub max_task_duration: u32,
    #[serde(default = "default_grid_minutes")]
    pub grid_minutes: u32,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    "http://localhost:5001/api".to_string()
}

fn default_true() -> bool {
    true
}

fn default_location_timeout_secs() -> u64 {
    10
}

fn default_min_task_duration() -> u32 {
    10
}

fn default_max_task_duration() -> u32 {
    24 * 60
}

fn default_grid_minutes() -> u32 {
    5
}

fn default_font_scale() -> f32 {
    1.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            latitude: None,
            longitude: None,
            location_enabled: true,
            location_timeout_secs: default_location_timeout_secs(),
            min_task_duration: default_min_task_duration(),
            max_task_duration: default_max_task_duration(),
            grid_minutes: default_grid_minutes(),
            font_scale: 1.0,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .context("Failed to read config file")?;
            serde_json::from_str(&contents)
                .context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(config_path, contents)?;

        Ok(())
    }

    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("org", "duskboard", "duskboard")
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = Self::project_dirs()
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Directory for rolling log files. Falls back to the temp dir when the
    /// platform has no home directory.
    pub fn log_dir() -> PathBuf {
        match Self::project_dirs() {
            Some(dirs) => dirs
                .state_dir()
                .unwrap_or_else(|| dirs.data_local_dir())
                .join("logs"),
            None => std::env::temp_dir().join("duskboard-logs"),
        }
    }

    /// Location of the per-day sunset cache record
    pub fn sunset_cache_path() -> PathBuf {
        match Self::project_dirs() {
            Some(dirs) => dirs.cache_dir().join("sunset.json"),
            None => std::env::temp_dir().join("duskboard-sunset.json"),
        }
    }

    pub fn base_url(&self) -> String {
        self.api_base_url.trim().trim_end_matches('/').to_string()
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"latitude": 21.4}"#).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5001/api");
        assert_eq!(config.min_task_duration, 10);
        assert_eq!(config.max_task_duration, 1440);
        assert_eq!(config.grid_minutes, 5);
        assert!(config.location_enabled);
        assert_eq!(config.coordinates(), None);
    }

    #[test]
    fn base_url_drops_trailing_slashes() {
        let config = Config {
            api_base_url: " https://board.example.org/api// ".to_string(),
            ..Config::default()
        };
        assert_eq!(config.base_url(), "https://board.example.org/api");
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            latitude: Some(21.42),
            longitude: Some(39.83),
            min_task_duration: 15,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.coordinates(), Some((21.42, 39.83)));
        assert_eq!(loaded.min_task_duration, 15);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded.log_level, "info");
    }
}
