use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::{info, LevelFilter};
use serde::{Deserialize, Serialize};
use std::{
    io,
    path::{Path, PathBuf},
};

use super::{rendering::RenderConfig, window::WindowConfig};

const CONFIG_FILE: &str = "roguelike_gl.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub window: WindowConfig,
    pub rendering: RenderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            rendering: RenderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parsed `log_level`, or `None` when the string is not a level name.
    pub fn level_filter(&self) -> Option<LevelFilter> {
        self.log_level.parse().ok()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Reads `path`, writing the defaults there first if it does not exist yet.
    pub fn load_or_create_at(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::write_defaults(path),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read config file {}", path.display())),
        }
    }

    fn write_defaults(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
        }

        let config = Self::default();
        std::fs::write(path, toml::to_string_pretty(&config)?)
            .with_context(|| format!("Failed to write default config {}", path.display()))?;
        info!("Wrote default config to {}", path.display());
        Ok(config)
    }
}

pub fn load_or_create_config() -> Result<AppConfig> {
    let config_path = get_config_path()?;
    AppConfig::load_or_create_at(&config_path)
}

fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "MetroManDevTeam", "roguelike_gl")
        .context("Couldn't determine project directory")?;
    Ok(proj_dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_demo_constants() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!((config.window.gl_major, config.window.gl_minor), (3, 3));
        assert_eq!(config.rendering.clear_color, [0.2, 0.3, 0.3, 1.0]);
        assert!(config.rendering.shader_paths().is_none());
        assert_eq!(config.level_filter(), Some(LevelFilter::Info));
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let config = AppConfig::load_or_create_at(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());

        // Second load reads back what was written
        let reloaded = AppConfig::load_or_create_at(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_created_file_is_sectioned_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        AppConfig::load_or_create_at(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[window]"));
        assert!(written.contains("[rendering]"));
        assert!(written.contains("title = \"LearnOpenGL\""));
        // Unset shader paths are left out rather than written empty
        assert!(!written.contains("vertex_shader"));
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "log_level = \"warn\"\n").unwrap();

        let config = AppConfig::load_or_create_at(&path).unwrap();
        assert_eq!(config.level_filter(), Some(LevelFilter::Warn));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "log_level = \"warn\"\n"
        );
    }

    #[test]
    fn test_unreadable_path_is_an_error_not_a_rewrite() {
        let dir = tempdir().unwrap();
        // A directory exists at the path, so reading fails with something other than NotFound
        assert!(AppConfig::load_or_create_at(dir.path()).is_err());
        assert!(dir.path().is_dir());
    }

    #[test]
    fn test_partial_file_keeps_remaining_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"
            log_level = "debug"

            [window]
            width = 1024

            [rendering]
            vertex_shader = "shaders/triangle.vert"
            "#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.level_filter(), Some(LevelFilter::Debug));
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.window.title, "LearnOpenGL");
        // Only one of the pair is set, so the built-in sources stay in use
        assert!(config.rendering.shader_paths().is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "window = 12").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_unknown_log_level() {
        let config = AppConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert_eq!(config.level_filter(), None);
    }
}
