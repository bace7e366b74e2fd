//! Game configuration loaded from RON, with defaults for every field.
//! Load failures and suspicious values are reported as warnings, never fatal.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::game::SpawnRng;

pub const CONFIG_PATH: &str = "assets/config/game.ron";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Automatically close the app after this many seconds. 0.0 (or omitted) = run indefinitely.
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Star Catcher".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in px/s^2.
    pub gravity: f32,
    /// Draw body outlines.
    pub debug: bool,
    #[serde(rename = "maxStep")]
    pub max_step: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 300.0,
            debug: false,
            max_step: 0.05,
        }
    }
}

#[derive(Resource, Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    /// Fixed seed for star bounce and bomb spawns; random when absent.
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Load from a single RON file (errors contain human-readable context).
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    /// Load file; on failure returns default config plus error string.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Non-fatal problems with the loaded values.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        if self.physics.gravity <= 0.0 {
            w.push(format!(
                "physics.gravity is {}; stars and the player will not fall",
                self.physics.gravity
            ));
        }
        if self.physics.max_step <= 0.0 {
            w.push(format!(
                "physics.maxStep {} must be > 0; clamped to 0.001",
                self.physics.max_step
            ));
        } else if self.physics.max_step > 0.1 {
            w.push(format!(
                "physics.maxStep {} is large; fast bodies may tunnel through ledges",
                self.physics.max_step
            ));
        }
        w
    }
}

/// Load outcome kept until the log plugin is up.
#[derive(Resource, Debug, Default)]
pub struct ConfigReport {
    pub error: Option<String>,
}

/// Countdown armed by a positive `window.autoClose`.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct AutoClose(Timer);

impl AutoClose {
    /// `None` when the configured timeout leaves the app running indefinitely.
    pub fn from_config(window: &WindowConfig) -> Option<Self> {
        (window.auto_close > 0.0)
            .then(|| AutoClose(Timer::from_seconds(window.auto_close, TimerMode::Once)))
    }
}

/// Inserts the config, reports its load outcome at startup, and arms the
/// auto-close countdown.
pub struct ConfigPlugin {
    pub config: GameConfig,
    pub error: Option<String>,
}

impl ConfigPlugin {
    pub fn load(path: impl AsRef<Path>) -> Self {
        let (config, error) = GameConfig::load_or_default(path);
        ConfigPlugin { config, error }
    }
}

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        let rng = self.config.seed.map(SpawnRng::seeded).unwrap_or_default();
        app.insert_resource(self.config.clone())
            .insert_resource(rng)
            .insert_resource(ConfigReport {
                error: self.error.clone(),
            })
            .add_systems(PreStartup, report_config)
            .add_systems(Last, close_when_elapsed.run_if(resource_exists::<AutoClose>));
        if let Some(auto_close) = AutoClose::from_config(&self.config.window) {
            app.insert_resource(auto_close);
        }
    }
}

fn report_config(
    config: Res<GameConfig>,
    report: Res<ConfigReport>,
    auto_close: Option<Res<AutoClose>>,
) {
    match &report.error {
        Some(err) => warn!("config: {err}; using defaults"),
        None => info!("config loaded from {CONFIG_PATH}"),
    }
    for warning in config.validate() {
        warn!("config: {warning}");
    }
    if let Some(auto_close) = auto_close {
        info!(
            seconds = auto_close.duration().as_secs_f32(),
            "window closes automatically"
        );
    }
}

fn close_when_elapsed(
    time: Res<Time>,
    mut auto_close: ResMut<AutoClose>,
    mut exit: MessageWriter<AppExit>,
) {
    if auto_close.tick(time.delta()).just_finished() {
        info!("auto-close timeout reached, exiting");
        exit.write(AppExit::Success);
    }
}
