//! Intent флаги для анимационного слоя
//!
//! Симуляция не играет анимации — только выставляет флаги, хост читает их
//! после тика (isMoving bool + Attack trigger).

use bevy::prelude::*;

/// Animation intent агента на ТЕКУЩИЙ тик
///
/// Пересчитывается каждый тик из нового AgentState (не из предыдущего).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AnimationIntent {
    /// Агент идёт/бежит (locomotion blend)
    pub is_moving: bool,
    /// Агент в Attacking state (держит позицию и бьёт)
    pub attacking: bool,
}

impl AnimationIntent {
    pub const IDLE: Self = Self {
        is_moving: false,
        attacking: false,
    };
}
