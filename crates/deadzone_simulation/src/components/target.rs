//! Цель преследования (игрок)

use bevy::prelude::*;

/// Resource: ссылка на единственную цель агентов
///
/// Инжектится один раз при setup (вместо поиска по сцене каждый кадр).
/// Агент цель не владеет — если entity цели исчезла, все lookup'ы молча дают None.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub entity: Entity,
}

/// Поза цели — пишется контроллером игрока
///
/// Используется peripheral-motion правилом perception:
/// движущуюся и не пригнувшуюся цель слышно вне конуса зрения.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TargetPosture {
    pub is_moving: bool,
    pub is_crouching: bool,
}

impl TargetPosture {
    pub fn is_noisy(&self) -> bool {
        self.is_moving && !self.is_crouching
    }
}
