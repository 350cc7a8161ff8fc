use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::interaction::InteractionConfig;
use crate::model::TimingConfig;

/// Playback defaults the host persists between sessions. The engine never
/// decides where this lives; the host hands in a path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Wrap past the ends of the visible sequence instead of saturating.
    #[serde(default = "default_true", rename = "loop")]
    pub loop_slides: bool,

    /// Begin autoplay as soon as the host calls `play`.
    #[serde(default)]
    pub auto_play: bool,

    /// Applied when a slide carries no timing of its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_timing: Option<TimingConfig>,

    #[serde(default)]
    pub interaction: InteractionConfig,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            loop_slides: true,
            auto_play: false,
            global_timing: None,
            interaction: InteractionConfig::default(),
        }
    }
}

impl Settings {
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No settings found at {}", path.display())
            } else {
                anyhow::anyhow!("Failed to read settings: {e}")
            }
        })?;
        let settings: Settings = serde_yaml::from_str(&contents)?;
        Ok(settings)
    }

    pub fn load_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# slidekit playback settings\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(path.to_path_buf())
    }

    /// String-keyed setter for host settings UIs. Unknown keys and invalid
    /// values are reported, not applied.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "loop" => {
                self.loop_slides = parse_bool(key, value)?;
            }
            "auto_play" => {
                self.auto_play = parse_bool(key, value)?;
            }
            "interaction.wheel_threshold" => {
                let parsed: f64 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid number for {key}: {value}"))?;
                if parsed <= 0.0 {
                    anyhow::bail!("{key} must be positive, got {value}");
                }
                self.interaction.wheel_threshold = parsed;
            }
            "interaction.wheel_debounce_ms" => {
                self.interaction.wheel_debounce_ms = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid milliseconds for {key}: {value}"))?;
            }
            "interaction.swipe_threshold_px" => {
                let parsed: f64 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid number for {key}: {value}"))?;
                if parsed <= 0.0 {
                    anyhow::bail!("{key} must be positive, got {value}");
                }
                self.interaction.swipe_threshold_px = parsed;
            }
            _ => anyhow::bail!(
                "Unknown settings key: {key}. Valid keys: loop, auto_play, \
                 interaction.wheel_threshold, interaction.wheel_debounce_ms, \
                 interaction.swipe_threshold_px"
            ),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("Invalid boolean for {key}: {value}"),
    }
}
