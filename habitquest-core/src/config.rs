use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing;

#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub progression: ProgressionConfig,
    #[serde(default)]
    pub logbook: LogbookConfig,
    #[serde(default)]
    pub services: ServicesConfig,
}

impl CoreConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("config.toml");
        let mut cfg = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str::<CoreConfig>(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        } else {
            tracing::info!(
                "No config file found at {}. Using CoreConfig::default().",
                path.display()
            );
            CoreConfig::default()
        };
        cfg.resolve_paths(root);
        Ok(cfg)
    }

    fn resolve_paths(&mut self, root: &Path) {
        self.storage.state_path = absolutize(root, &self.storage.state_path);
        self.logbook.path = absolutize(root, &self.logbook.path);
        self.logbook.aggregate = absolutize(root, &self.logbook.aggregate);
        self.logbook.actions = absolutize(root, &self.logbook.actions);
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            system: SystemConfig::default(),
            storage: StorageConfig::default(),
            progression: ProgressionConfig::default(),
            logbook: LogbookConfig::default(),
            services: ServicesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "SystemConfig::default_name")]
    pub name: String,
    #[serde(default = "SystemConfig::default_version")]
    pub version: String,
}

impl SystemConfig {
    fn default_name() -> String {
        "habitquest".to_string()
    }

    fn default_version() -> String {
        "0.1.0".to_string()
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            version: Self::default_version(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_state_path")]
    pub state_path: PathBuf,
}

impl StorageConfig {
    fn default_state_path() -> PathBuf {
        PathBuf::from("cache/state.db")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_path: Self::default_state_path(),
        }
    }
}

/// Tuning for the progression engine. The defaults are the canonical rules;
/// they are configurable so demos and tests can shrink the windows.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressionConfig {
    /// Flat XP for any accepted check-in.
    #[serde(default = "ProgressionConfig::default_xp_per_checkin")]
    pub xp_per_checkin: u64,
    /// XP needed to advance one user level.
    #[serde(default = "ProgressionConfig::default_xp_per_level")]
    pub xp_per_level: u64,
    /// Streak bonus is floor(new_streak * multiplier); must stay > 1.
    #[serde(default = "ProgressionConfig::default_streak_bonus_multiplier")]
    pub streak_bonus_multiplier: f64,
    /// XP per combo step on top of the flat award.
    #[serde(default = "ProgressionConfig::default_combo_unit_bonus")]
    pub combo_unit_bonus: u64,
    /// Two accepted check-ins closer than this chain a combo.
    #[serde(default = "ProgressionConfig::default_combo_window_ms")]
    pub combo_window_ms: i64,
    /// How long the last check-in stays reversible.
    #[serde(default = "ProgressionConfig::default_undo_window_ms")]
    pub undo_window_ms: i64,
}

impl ProgressionConfig {
    fn default_xp_per_checkin() -> u64 {
        100
    }

    fn default_xp_per_level() -> u64 {
        1000
    }

    fn default_streak_bonus_multiplier() -> f64 {
        1.1
    }

    fn default_combo_unit_bonus() -> u64 {
        25
    }

    fn default_combo_window_ms() -> i64 {
        60_000
    }

    fn default_undo_window_ms() -> i64 {
        10_000
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_checkin: Self::default_xp_per_checkin(),
            xp_per_level: Self::default_xp_per_level(),
            streak_bonus_multiplier: Self::default_streak_bonus_multiplier(),
            combo_unit_bonus: Self::default_combo_unit_bonus(),
            combo_window_ms: Self::default_combo_window_ms(),
            undo_window_ms: Self::default_undo_window_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogbookConfig {
    #[serde(default = "LogbookConfig::default_path")]
    pub path: PathBuf,
    #[serde(default = "LogbookConfig::default_aggregate")]
    pub aggregate: PathBuf,
    #[serde(default = "LogbookConfig::default_actions")]
    pub actions: PathBuf,
}

impl LogbookConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("logbook")
    }

    fn default_aggregate() -> PathBuf {
        PathBuf::from("logbook.jsonl")
    }

    fn default_actions() -> PathBuf {
        PathBuf::from("logbook/actions.jsonl")
    }
}

impl Default for LogbookConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            aggregate: Self::default_aggregate(),
            actions: Self::default_actions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    #[serde(default = "ServicesConfig::default_true")]
    pub audit_enabled: bool,
    #[serde(default = "ServicesConfig::default_true")]
    pub tips_enabled: bool,
}

impl ServicesConfig {
    fn default_true() -> bool {
        true
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            audit_enabled: true,
            tips_enabled: true,
        }
    }
}

fn absolutize(root: &Path, value: &Path) -> PathBuf {
    if value.is_absolute() {
        value.to_path_buf()
    } else {
        root.join(value)
    }
}
