//! Weapon → симуляция: выстрелы игрока
//!
//! Оружие живёт в хосте (raycast, отдача, патроны). В симуляцию приходит
//! только факт выстрела: точка попадания шумит ВСЕГДА, даже если пуля ушла в стену.

use bevy::prelude::*;

use crate::ai::AlertEvent;
use crate::combat::DamageRequest;

/// Event: выстрел/попадание (хост → ECS)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ShotFired {
    /// Куда попала пуля (стена, пол, агент)
    pub impact_point: Vec3,

    /// Радиус слышимости попадания (для AI reaction)
    pub hearing_range: f32,

    /// Агент, в которого попали, и урон
    pub hit: Option<(Entity, f32)>,
}

impl ShotFired {
    pub fn miss(impact_point: Vec3, hearing_range: f32) -> Self {
        Self {
            impact_point,
            hearing_range,
            hit: None,
        }
    }

    pub fn hit(impact_point: Vec3, hearing_range: f32, agent: Entity, damage: f32) -> Self {
        Self {
            impact_point,
            hearing_range,
            hit: Some((agent, damage)),
        }
    }
}

/// Система: ShotFired → Sound alert в точке попадания + DamageRequest
pub fn process_shots(
    mut shots: EventReader<ShotFired>,
    mut alerts: EventWriter<AlertEvent>,
    mut damage_requests: EventWriter<DamageRequest>,
) {
    for shot in shots.read() {
        alerts.write(AlertEvent::sound(shot.impact_point, shot.hearing_range));

        if let Some((agent, amount)) = shot.hit {
            damage_requests.write(DamageRequest { agent, amount });
        }

        crate::log(&format!(
            "🔫 Shot impact at {:?} (hearing {:.1}m, hit: {:?})",
            shot.impact_point, shot.hearing_range, shot.hit
        ));
    }
}
