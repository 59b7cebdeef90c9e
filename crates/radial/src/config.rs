use crate::effects::PanelName;
use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use dwell::arbiter::{EngineSettings, InteractionEngine};
use dwell::geom::Projection;
use dwell::hand::Hand;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::path::{Path, PathBuf};
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightStyle {
    #[strum(serialize = "tint", serialize = "color")]
    Tint,
    #[strum(serialize = "scale")]
    Scale,
    #[default]
    #[strum(serialize = "tint-and-scale", serialize = "both")]
    TintAndScale,
}

impl HighlightStyle {
    pub fn tints(&self) -> bool {
        matches!(self, Self::Tint | Self::TintAndScale)
    }

    pub fn scales(&self) -> bool {
        matches!(self, Self::Scale | Self::TintAndScale)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    #[default]
    #[strum(serialize = "light")]
    Light,
    #[strum(serialize = "panels", serialize = "canvas")]
    Panels,
    #[strum(serialize = "none", serialize = "off")]
    None,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub sector_count: usize,
    pub angle_gap_degrees: f64,
    pub deadzone_radius: f64,
    pub dwell_selection_time: f64,
    pub menu_display_distance: f64,
    pub progress_display_distance: f64,
    pub projection: Projection,
    pub primary_hand: Hand,
    pub highlight_style: HighlightStyle,
    pub effect: EffectKind,
    pub panels: Vec<PanelName>,
    pub socket_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let engine = EngineSettings::default();
        Self {
            sector_count: engine.sector_count,
            angle_gap_degrees: engine.angle_gap_degrees,
            deadzone_radius: engine.deadzone_radius,
            dwell_selection_time: engine.dwell_selection_time,
            menu_display_distance: engine.menu_display_distance,
            progress_display_distance: 0.7,
            projection: engine.projection,
            primary_hand: engine.primary_hand,
            highlight_style: HighlightStyle::default(),
            effect: EffectKind::default(),
            panels: Vec::new(),
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
        }
    }
}

impl Config {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            sector_count: self.sector_count,
            angle_gap_degrees: self.angle_gap_degrees,
            deadzone_radius: self.deadzone_radius,
            dwell_selection_time: self.dwell_selection_time,
            menu_display_distance: self.menu_display_distance,
            projection: self.projection,
            primary_hand: self.primary_hand,
        }
    }
}

pub const DEFAULT_SOCKET_PATH: &str = "/tmp/radial.sock";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid menu settings: {0}")]
    Invalid(#[from] dwell::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "radial", "radial").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&get_config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("RADIAL"))
        .build()?;

    let config: Config = s.try_deserialize()?;
    // same checks as Driver::new
    InteractionEngine::new(&config.engine_settings())?;
    Ok(config)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default configuration: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_style_deserialization() {
        let cases = vec![
            ("\"tint\"", HighlightStyle::Tint),
            ("\"COLOR\"", HighlightStyle::Tint),
            ("\"scale\"", HighlightStyle::Scale),
            ("\"tint-and-scale\"", HighlightStyle::TintAndScale),
            ("\"Both\"", HighlightStyle::TintAndScale),
        ];

        for (json, expected) in cases {
            let deserialized: HighlightStyle = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_effect_kind_deserialization() {
        let cases = vec![
            ("\"light\"", EffectKind::Light),
            ("\"Canvas\"", EffectKind::Panels),
            ("\"off\"", EffectKind::None),
        ];

        for (json, expected) in cases {
            let deserialized: EffectKind = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{"sector_count": 6, "primary_hand": "right", "panels": ["lights", "music"]}"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.sector_count, 6);
        assert_eq!(config.primary_hand, Hand::Right);
        assert_eq!(config.panels.len(), 2);
        assert_eq!(config.deadzone_radius, 0.02);
        assert_eq!(config.socket_path, PathBuf::from(DEFAULT_SOCKET_PATH));
    }

    #[test]
    fn test_default_config_file_matches_defaults() {
        let parsed = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize::<Config>()
            .unwrap();

        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_engine_settings_carry_over() {
        let config = Config {
            sector_count: 8,
            deadzone_radius: 0.05,
            ..Config::default()
        };
        let settings = config.engine_settings();
        assert_eq!(settings.sector_count, 8);
        assert_eq!(settings.deadzone_radius, 0.05);
        assert!(settings.picker().is_ok());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("radial-missing-config-for-test.toml");
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.sector_count, Config::default().sector_count);
    }

    #[test]
    fn test_non_positive_dwell_time_is_rejected() {
        for (name, value) in [("zero", "0.0"), ("negative", "-1.5")] {
            let path = std::env::temp_dir().join(format!(
                "radial-dwell-{}-{}.toml",
                name,
                std::process::id()
            ));
            fs_err::write(&path, format!("dwell_selection_time = {}\n", value)).unwrap();

            let result = load_config_from(&path);
            let _ = fs_err::remove_file(&path);
            assert!(
                matches!(result, Err(ConfigError::Invalid(_))),
                "{} dwell time loaded: {:?}",
                name,
                result
            );
        }
    }
}
