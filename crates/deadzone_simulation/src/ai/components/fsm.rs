//! FSM AI components (state machine, tuning).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// AI FSM состояния агента
///
/// Dead терминален: ни тик, ни alert, ни урон из него не выводят.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum AgentState {
    /// Idle — начальное состояние после спавна, ждём стимул
    Idle,

    /// Investigating — идём к точке шума и задерживаемся там
    Investigating {
        /// Точка интереса (место выстрела/попадания)
        point: Vec3,
        /// Сколько секунд уже стоим на точке (растёт только после прибытия)
        timer: f32,
    },

    /// Chasing — преследуем цель
    Chasing,

    /// Attacking — цель в stopping distance, держим позицию и атакуем
    Attacking,

    /// Dead — hit points <= 0, навигация и perception отключены навсегда
    Dead,
}

impl Default for AgentState {
    fn default() -> Self {
        Self::Idle
    }
}

impl AgentState {
    pub fn investigating(point: Vec3) -> Self {
        Self::Investigating { point, timer: 0.0 }
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, AgentState::Dead)
    }

    /// Chasing/Attacking — агент "спровоцирован", звуки его не отвлекают
    pub fn is_engaged(&self) -> bool {
        matches!(self, AgentState::Chasing | AgentState::Attacking)
    }

    pub fn investigation_point(&self) -> Option<Vec3> {
        match self {
            AgentState::Investigating { point, .. } => Some(*point),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AgentState::Idle => "Idle",
            AgentState::Investigating { .. } => "Investigating",
            AgentState::Chasing => "Chasing",
            AgentState::Attacking => "Attacking",
            AgentState::Dead => "Dead",
        }
    }
}

/// Политика потери цели во время Chasing
///
/// Ревизии поведения расходились: часть проверяла только дистанцию,
/// часть — ещё и прямую видимость. Оставляем тюнингом.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChaseLossPolicy {
    /// Бросаем погоню только когда distance > chase_range
    #[default]
    RangeOnly,
    /// Дополнительно бросаем погоню когда цель не детектится
    RequireSight,
}

/// Параметры агента (тюнинг)
///
/// Дефолты совпадают с тюнингом зомби из прототипа.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AgentConfig {
    /// Радиус зрения (метры), граница включительно
    pub view_radius: f32,
    /// Полный угол конуса зрения (градусы)
    pub view_angle: f32,
    /// Дальше этой дистанции погоня бросается (метры)
    pub chase_range: f32,
    /// Радиус DirectDamage alert'а когда агента ранили (метры)
    pub sound_reaction_range: f32,
    /// Скорость slerp разворота к цели (1/сек)
    pub turn_speed: f32,
    /// Сколько секунд стоим на точке расследования
    pub investigation_time: f32,
    pub max_hit_points: f32,
    /// Задержка деспавна трупа (секунды, под death animation)
    pub despawn_delay: f32,
    /// Высота "глаз" над pivot для occlusion ray (метры)
    pub eye_height: f32,
    /// Stopping distance когда навигации нет (perception-only агент)
    pub stopping_distance: f32,
    /// Интервал между AgentAttacked событиями (секунды)
    pub attack_cooldown: f32,
    /// Слышать движущуюся цель вне конуса (внутри view_radius)
    pub peripheral_motion_detection: bool,
    pub chase_loss: ChaseLossPolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            view_radius: 21.0,
            view_angle: 90.0,
            chase_range: 20.0,
            sound_reaction_range: 10.0,
            turn_speed: 5.0,
            investigation_time: 5.0,
            max_hit_points: 100.0,
            despawn_delay: 5.0,
            eye_height: 0.8,
            stopping_distance: 2.0,
            attack_cooldown: 1.0,
            peripheral_motion_detection: false,
            chase_loss: ChaseLossPolicy::RangeOnly,
        }
    }
}
