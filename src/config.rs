use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use table_capture::CaptureInsets;

/// Runtime configuration, loaded from a JSON file next to the binary.
/// Every field has a default matching the stock client calibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Case-insensitive substring of the table window title.
    pub window_title: String,
    /// Client-area size the calibrated regions were measured against.
    pub table_width: u32,
    pub table_height: u32,
    pub tick_interval_ms: u64,
    /// How long a region must hold still before it counts as settled.
    pub settle_duration_ms: u64,
    /// Directory holding `cards/{code}.png` and `hand_ranks.json`.
    pub data_dir: PathBuf,
    pub capture_insets: CaptureInsets,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            window_title: "Ignition Casino".to_string(),
            table_width: 800,
            table_height: 600,
            tick_interval_ms: 100,
            settle_duration_ms: 1000,
            data_dir: PathBuf::from("data"),
            capture_insets: CaptureInsets::default(),
        }
    }
}

impl TrackerConfig {
    /// Load from a JSON file. A missing file is not an error; the
    /// defaults are used with a warning.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("no config file at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn cards_dir(&self) -> PathBuf {
        self.data_dir.join("cards")
    }

    pub fn strength_table_path(&self) -> PathBuf {
        self.data_dir.join("hand_ranks.json")
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_duration_ms)
    }
}
