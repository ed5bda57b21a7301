//! Thresholds, rounding precision and message settings.
//!
//! The dashboards this tool replaces disagreed on the at-risk cutoffs and on
//! how many decimals to show, so all of it lives here instead of in the
//! engine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "mentor.toml";
pub const MIN_ATTENDANCE_ENV: &str = "MENTOR_MIN_ATTENDANCE";
/// Upper bound for `score_decimals` and `attendance_decimals`.
pub const MAX_DECIMALS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Attendance strictly below this percentage raises `LowAttendance`.
    #[serde(default = "default_min_attendance")]
    pub min_attendance_percent: f64,
    /// Average score strictly below this raises `LowAverageScore`. `None` disables the alert.
    #[serde(default = "default_min_average_score")]
    pub min_average_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Precision {
    #[serde(default = "default_decimals")]
    pub score_decimals: u32,
    #[serde(default = "default_decimals")]
    pub attendance_decimals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSettings {
    #[serde(default = "default_signature")]
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MentorConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub precision: Precision,
    #[serde(default)]
    pub messages: MessageSettings,
}

fn default_min_attendance() -> f64 {
    75.0
}
fn default_min_average_score() -> Option<f64> {
    Some(6.0)
}
fn default_decimals() -> u32 {
    2
}
fn default_signature() -> String {
    "AI Mentor".to_string()
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_attendance_percent: default_min_attendance(),
            min_average_score: default_min_average_score(),
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            score_decimals: default_decimals(),
            attendance_decimals: default_decimals(),
        }
    }
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            signature: default_signature(),
        }
    }
}

impl MentorConfig {
    /// Rejects thresholds and precision the engine cannot turn into finite numbers.
    pub fn validate(&self) -> Result<()> {
        let attendance = self.thresholds.min_attendance_percent;
        if !attendance.is_finite() {
            anyhow::bail!("min_attendance_percent must be a finite number, got {attendance}");
        }
        if let Some(score) = self.thresholds.min_average_score {
            if !score.is_finite() {
                anyhow::bail!("min_average_score must be a finite number, got {score}");
            }
        }
        for (field, value) in [
            ("score_decimals", self.precision.score_decimals),
            ("attendance_decimals", self.precision.attendance_decimals),
        ] {
            if value > MAX_DECIMALS {
                anyhow::bail!("{field} must be at most {MAX_DECIMALS}, got {value}");
            }
        }
        Ok(())
    }
}

/// Load config from an explicit path, or fall back to `mentor.toml` in the
/// current directory, or the built-in defaults.
pub fn load_config_from(path: Option<&Path>) -> Result<MentorConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            local.exists().then_some(local)
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let parsed = toml::from_str::<MentorConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            parsed
        }
        None => MentorConfig::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

fn apply_env_overrides(
    mut config: MentorConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<MentorConfig> {
    if let Some(raw) = lookup(MIN_ATTENDANCE_ENV) {
        let value: f64 = raw
            .trim()
            .parse()
            .with_context(|| format!("{MIN_ATTENDANCE_ENV} must be a number, got {raw:?}"))?;
        if !value.is_finite() {
            anyhow::bail!("{MIN_ATTENDANCE_ENV} must be a finite number, got {raw:?}");
        }
        tracing::info!(value, "attendance threshold overridden from environment");
        config.thresholds.min_attendance_percent = value;
    }
    Ok(config)
}
