//! Базовые компоненты агента: Agent, HitPoints

use bevy::prelude::*;

use crate::ai::{AgentConfig, AgentState};
use crate::combat::Attacker;
use crate::components::AnimationIntent;

/// Агент (враг) — маркер для всех систем perception/FSM
///
/// Автоматически добавляет state machine, hit points и intent флаги через Required Components.
/// Цель (игрок) никогда не несёт этот маркер — на этом держатся disjoint queries по Transform.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform, AgentState, AgentConfig, HitPoints, AnimationIntent, Attacker)]
pub struct Agent;

/// Здоровье агента
///
/// Инвариант: current ≤ max. current может уйти ниже нуля (overkill не клампится),
/// смерть = current <= 0.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HitPoints {
    pub current: f32,
    pub max: f32,
}

impl Default for HitPoints {
    fn default() -> Self {
        Self::new(100.0) // Default 100 HP
    }
}

impl HitPoints {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Отрицательный урон не лечит — клампим к нулю
    pub fn take_damage(&mut self, amount: f32) {
        self.current -= amount.max(0.0);
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }
}
