mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

const APP_DIR: &str = "memory-lens";
const CONFIG_FILE: &str = "config.toml";

/// Per-user settings directory for the gallery, created on first use.
pub fn config_dir() -> Result<PathBuf> {
    let Some(base) = dirs::config_dir() else {
        anyhow::bail!("no per-user config directory on this platform");
    };
    let dir = base.join(APP_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Where `load_config`/`save_config` read and write.
pub fn config_path() -> Result<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Settings from the per-user file; defaults when it has never been saved.
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path()?)
}

/// Persist settings to the per-user file.
pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(&config_path()?, config)
}

/// Read settings from `path`. Sections or keys the file leaves out keep
/// their defaults, and a missing file is all defaults.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        info!(?path, "No config file yet, using defaults");
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = toml::from_str(&contents)
        .with_context(|| format!("parsing {}", path.display()))?;
    info!(?path, "Loaded config");
    Ok(config)
}

/// Write settings to `path` as pretty TOML.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    info!(?path, "Saved config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.playback.target_fps, 30.0);
        assert!(config.gestures.pinch_enabled);
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.story.source = Some("stories/summer.json".into());
        config.playback.loop_panels = false;
        config.gestures.cooldown_secs = 0.75;
        config.material.pan_offset = [0.1, -0.2];
        save_config_to(&path, &config).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.story.source.as_deref(), Some("stories/summer.json"));
        assert!(!loaded.playback.loop_panels);
        assert_eq!(loaded.gestures.cooldown_secs, 0.75);
        assert_eq!(loaded.material.pan_offset, [0.1, -0.2]);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[playback]\nauto_advance_delay_secs = 3.5\n").unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.playback.auto_advance_delay_secs, 3.5);
        assert!(loaded.playback.auto_advance);
        assert_eq!(loaded.gestures.dwell_secs, 2.0);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[playback\n").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
