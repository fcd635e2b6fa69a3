//! Perception — видит ли агент цель
//!
//! Три фильтра по порядку: дистанция → конус зрения → occlusion ray.
//! Чистые функции от текущих позиций, пересчитываются каждый тик (не кэшируются).

use bevy::math::bounding::{Aabb3d, RayCast3d};
use bevy::math::{Dir3A, Vec3A};
use bevy::prelude::*;

use crate::ai::AgentConfig;
use crate::components::TargetPosture;

/// Статическая геометрия, перекрывающая обзор (стены, ящики)
///
/// Axis-aligned боксы. Динамические тела сюда не попадают — перекрывает только статика.
#[derive(Resource, Debug, Clone, Default)]
pub struct Obstacles {
    pub boxes: Vec<Aabb3d>,
}

impl Obstacles {
    pub fn new(boxes: Vec<Aabb3d>) -> Self {
        Self { boxes }
    }

    /// Бокс по центру и полуразмерам
    pub fn add_box(&mut self, center: Vec3, half_size: Vec3) {
        self.boxes.push(Aabb3d::new(center, half_size));
    }

    /// Перекрыт ли отрезок `from → to` хоть одним боксом
    pub fn segment_blocked(&self, from: Vec3, to: Vec3) -> bool {
        let delta = to - from;
        let length = delta.length();
        if length <= f32::EPSILON {
            return false;
        }
        let Ok(direction) = Dir3A::new(Vec3A::from(delta)) else {
            return false;
        };

        let ray = RayCast3d::new(from, direction, length);
        self.boxes
            .iter()
            .any(|obstacle| ray.aabb_intersection_at(obstacle).is_some())
    }
}

/// Точка "глаз" над pivot'ом
pub fn eye_point(position: Vec3, eye_height: f32) -> Vec3 {
    position + Vec3::Y * eye_height
}

/// Видит ли агент цель: distance ≤ view_radius, угол ≤ view_angle/2, луч не перекрыт
///
/// Граница view_radius включительна. Forward агента — `Transform::forward()` (-Z).
pub fn can_see_target(
    agent: &Transform,
    target_position: Vec3,
    config: &AgentConfig,
    obstacles: &Obstacles,
) -> bool {
    let to_target = target_position - agent.translation;
    let distance = to_target.length();

    if distance > config.view_radius {
        return false;
    }

    // Цель "внутри" агента — направление не определено, считаем что видим
    if distance <= f32::EPSILON {
        return true;
    }

    let angle = agent.forward().as_vec3().angle_between(to_target).to_degrees();
    if angle > config.view_angle / 2.0 {
        return false;
    }

    let from = eye_point(agent.translation, config.eye_height);
    let to = eye_point(target_position, config.eye_height);
    !obstacles.segment_blocked(from, to)
}

/// Полный детект: зрение + (опционально) шаги цели вне конуса
///
/// Peripheral правило не проверяет occlusion — это слух, не зрение.
pub fn detects_target(
    agent: &Transform,
    target_position: Vec3,
    posture: Option<&TargetPosture>,
    config: &AgentConfig,
    obstacles: &Obstacles,
) -> bool {
    if can_see_target(agent, target_position, config, obstacles) {
        return true;
    }

    config.peripheral_motion_detection
        && posture.is_some_and(TargetPosture::is_noisy)
        && agent.translation.distance(target_position) <= config.view_radius
}
