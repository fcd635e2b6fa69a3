//! AI movement systems (state → navigation/animation intents, facing).

use bevy::prelude::*;

use crate::ai::{AgentConfig, AgentState};
use crate::combat::{AgentAttacked, Attacker, Dead};
use crate::components::{Agent, AnimationIntent, Target};
use crate::navigation::NavAgent;

/// Система: AI movement from state
///
/// Конвертирует НОВЫЙ AgentState (после ai_fsm_transitions) → команды навигации,
/// AnimationIntent и AgentAttacked. Без активной навигации агент стоит (perception-only).
pub fn ai_movement_from_state(
    mut agents: Query<
        (
            Entity,
            &AgentState,
            &mut AnimationIntent,
            &mut Attacker,
            Option<&mut NavAgent>,
        ),
        (With<Agent>, Without<Dead>),
    >,
    target: Option<Res<Target>>,
    targets: Query<&Transform, Without<Agent>>,
    mut attacks: EventWriter<AgentAttacked>,
) {
    let target_entity = target.as_ref().map(|target| target.entity);
    let target_position = target_entity
        .and_then(|entity| targets.get(entity).ok())
        .map(|transform| transform.translation);

    for (entity, state, mut intent, mut attacker, nav) in agents.iter_mut() {
        let mut nav = nav.filter(|nav| nav.is_active());

        let next_intent = match state {
            AgentState::Idle | AgentState::Dead => {
                if let Some(nav) = nav.as_mut() {
                    nav.clear();
                }
                AnimationIntent::IDLE
            }

            AgentState::Investigating { point, .. } => match nav.as_mut() {
                Some(nav) => {
                    nav.steer_to(*point);
                    AnimationIntent {
                        is_moving: !nav.arrived(),
                        attacking: false,
                    }
                }
                None => AnimationIntent::IDLE,
            },

            AgentState::Chasing => match (nav.as_mut(), target_position) {
                (Some(nav), Some(position)) => {
                    nav.steer_to(position);
                    AnimationIntent {
                        is_moving: true,
                        attacking: false,
                    }
                }
                _ => AnimationIntent::IDLE,
            },

            AgentState::Attacking => {
                if let Some(nav) = nav.as_mut() {
                    nav.hold();
                }

                if let Some(target) = target_entity.filter(|_| target_position.is_some()) {
                    if attacker.can_attack() {
                        attacker.start_attack();
                        attacks.write(AgentAttacked {
                            agent: entity,
                            target,
                        });
                        crate::log(&format!("🗡️ {:?} attacks {:?}", entity, target));
                    }
                }

                AnimationIntent {
                    is_moving: false,
                    attacking: true,
                }
            }
        };

        // Проверяем что intent изменился — иначе Changed<AnimationIntent> спамит
        if *intent != next_intent {
            *intent = next_intent;
        }
    }
}

/// Система: плавный разворот к цели пока агент в бою
///
/// Только yaw (горизонтальная плоскость), slerp с шагом turn_speed × delta.
pub fn face_target(
    mut agents: Query<(&mut Transform, &AgentState, &AgentConfig), (With<Agent>, Without<Dead>)>,
    target: Option<Res<Target>>,
    targets: Query<&Transform, Without<Agent>>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();
    let Some(target_position) = target
        .as_ref()
        .and_then(|target| targets.get(target.entity).ok())
        .map(|transform| transform.translation)
    else {
        return;
    };

    for (mut transform, state, config) in agents.iter_mut() {
        if !state.is_engaged() {
            continue;
        }

        let to_target = target_position - transform.translation;
        let flat = Vec3::new(to_target.x, 0.0, to_target.z);
        if flat.length_squared() <= f32::EPSILON {
            continue;
        }

        let look = Transform::IDENTITY.looking_to(flat, Vec3::Y).rotation;
        let t = (config.turn_speed * delta).clamp(0.0, 1.0);
        transform.rotation = transform.rotation.slerp(look, t);
    }
}
