//! Конфиг симуляции (TOML)
//!
//! Все секции опциональны — отсутствующие поля берут дефолты.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::AgentConfig;
use crate::navigation::{StraightLineNavigator, DEFAULT_TURN_SPEED};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Навигатор по прямой для headless прогонов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub speed: f32,
    pub stopping_distance: f32,
    pub path_latency_ticks: u32,
    /// Доворот по ходу движения (доля slerp в секунду)
    pub turn_speed: f32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            speed: 3.5,
            stopping_distance: 2.0,
            path_latency_ticks: 1,
            turn_speed: DEFAULT_TURN_SPEED,
        }
    }
}

impl NavigatorConfig {
    pub fn build(&self) -> StraightLineNavigator {
        StraightLineNavigator::new(self.speed, self.stopping_distance)
            .with_path_latency(self.path_latency_ticks)
            .with_turn_speed(self.turn_speed)
    }
}

/// Headless сценарий (binary)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub seed: u64,
    pub agent_count: u32,
    pub ticks: u32,
    /// Тиков в секунду (delta = 1 / tick_rate)
    pub tick_rate: f32,
    /// Радиус разброса спавна агентов вокруг центра (метры)
    pub spawn_radius: f32,
    pub log_level: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            agent_count: 12,
            ticks: 1200,
            tick_rate: 60.0,
            spawn_radius: 30.0,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub agent: AgentConfig,
    pub navigator: NavigatorConfig,
    pub scenario: ScenarioConfig,
}

impl SimulationConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let agent = &self.agent;

        positive("agent.view_radius", agent.view_radius)?;
        positive("agent.chase_range", agent.chase_range)?;
        positive("agent.max_hit_points", agent.max_hit_points)?;
        non_negative("agent.sound_reaction_range", agent.sound_reaction_range)?;
        non_negative("agent.investigation_time", agent.investigation_time)?;
        non_negative("agent.despawn_delay", agent.despawn_delay)?;
        non_negative("agent.turn_speed", agent.turn_speed)?;
        non_negative("agent.attack_cooldown", agent.attack_cooldown)?;
        non_negative("agent.stopping_distance", agent.stopping_distance)?;

        if !(agent.view_angle > 0.0 && agent.view_angle <= 360.0) {
            return Err(ConfigError::Invalid {
                field: "agent.view_angle",
                reason: format!("must be in (0, 360], got {}", agent.view_angle),
            });
        }

        positive("navigator.speed", self.navigator.speed)?;
        non_negative("navigator.stopping_distance", self.navigator.stopping_distance)?;
        non_negative("navigator.turn_speed", self.navigator.turn_speed)?;
        positive("scenario.tick_rate", self.scenario.tick_rate)?;
        non_negative("scenario.spawn_radius", self.scenario.spawn_radius)?;

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive, got {}", value),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be non-negative, got {}", value),
        })
    }
}
