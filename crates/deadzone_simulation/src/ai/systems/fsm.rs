//! FSM AI systems (state transitions).

use bevy::prelude::*;

use crate::ai::perception::{detects_target, Obstacles};
use crate::ai::{AgentConfig, AgentState, ChaseLossPolicy, StateChanged};
use crate::combat::Dead;
use crate::components::{Agent, Target, TargetPosture};
use crate::navigation::NavAgent;

/// Что агент знает о мире на этом тике
///
/// Derived: собирается заново каждый тик, не хранится.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Senses {
    /// Perception (зрение + опционально peripheral motion)
    pub detects_target: bool,
    /// `f32::INFINITY` если цели нет (despawned)
    pub distance_to_target: f32,
    /// Из навигации, либо fallback из AgentConfig
    pub stopping_distance: f32,
    /// Дошли до destination (pending путь = не дошли). Без навигации — всегда true.
    pub arrived: bool,
}

impl Senses {
    /// `investigation_point` — куда агент идёт (для arrived), если расследует
    pub fn gather(
        agent: &Transform,
        investigation_point: Option<Vec3>,
        target: Option<(Vec3, Option<TargetPosture>)>,
        config: &AgentConfig,
        obstacles: &Obstacles,
        nav: Option<&NavAgent>,
    ) -> Self {
        let active_nav = nav.filter(|nav| nav.is_active());
        let stopping_distance = active_nav
            .map_or(config.stopping_distance, |nav| nav.navigator().stopping_distance());
        let arrived = match (active_nav, investigation_point) {
            (None, _) => true,
            (Some(nav), Some(point)) => nav.arrived_at(point),
            (Some(nav), None) => nav.arrived(),
        };

        let (detects_target, distance_to_target) = match target {
            Some((position, posture)) => (
                detects_target(agent, position, posture.as_ref(), config, obstacles),
                agent.translation.distance(position),
            ),
            None => (false, f32::INFINITY),
        };

        Self {
            detects_target,
            distance_to_target,
            stopping_distance,
            arrived,
        }
    }
}

/// Следующее состояние агента (не более одного перехода за тик)
///
/// Порядок приоритетов внутри тика: детект цели > таймер расследования.
pub fn next_state(
    current: &AgentState,
    senses: &Senses,
    config: &AgentConfig,
    delta: f32,
) -> AgentState {
    match current {
        AgentState::Dead => AgentState::Dead,

        AgentState::Idle => {
            if senses.detects_target {
                AgentState::Chasing
            } else {
                AgentState::Idle
            }
        }

        AgentState::Investigating { point, timer } => {
            if senses.detects_target {
                return AgentState::Chasing;
            }

            if !senses.arrived {
                // Ещё идём (или путь pending) — таймер стоит
                return AgentState::Investigating {
                    point: *point,
                    timer: *timer,
                };
            }

            let timer = timer + delta;
            if timer >= config.investigation_time {
                AgentState::Idle
            } else {
                AgentState::Investigating {
                    point: *point,
                    timer,
                }
            }
        }

        AgentState::Chasing => {
            if senses.distance_to_target > config.chase_range {
                // Потеряли интерес
                AgentState::Idle
            } else if config.chase_loss == ChaseLossPolicy::RequireSight && !senses.detects_target
            {
                AgentState::Idle
            } else if senses.distance_to_target > senses.stopping_distance {
                AgentState::Chasing
            } else {
                AgentState::Attacking
            }
        }

        AgentState::Attacking => {
            if senses.distance_to_target <= senses.stopping_distance {
                AgentState::Attacking
            } else {
                AgentState::Chasing
            }
        }
    }
}

/// Система: AI FSM transitions
///
/// Для каждого живого агента: собрать Senses → next_state → записать.
/// StateChanged пишется только при смене вида состояния (тики таймера не спамят).
pub fn ai_fsm_transitions(
    mut agents: Query<
        (
            Entity,
            &Transform,
            &mut AgentState,
            &AgentConfig,
            Option<&NavAgent>,
        ),
        (With<Agent>, Without<Dead>),
    >,
    target: Option<Res<Target>>,
    targets: Query<(&Transform, Option<&TargetPosture>), Without<Agent>>,
    obstacles: Res<Obstacles>,
    time: Res<Time>,
    mut state_changes: EventWriter<StateChanged>,
) {
    let delta = time.delta_secs();

    // Цель может быть уже despawned — тогда агенты её просто не видят
    let target_view = target
        .as_ref()
        .and_then(|target| targets.get(target.entity).ok())
        .map(|(transform, posture)| (transform.translation, posture.copied()));

    for (entity, transform, mut state, config, nav) in agents.iter_mut() {
        if state.is_dead() {
            continue;
        }

        let senses = Senses::gather(
            transform,
            state.investigation_point(),
            target_view,
            config,
            &obstacles,
            nav,
        );
        let next = next_state(&state, &senses, config, delta);

        if *state == next {
            continue;
        }

        if state.name() != next.name() {
            crate::log(&format!(
                "AI: {:?} {} → {} (distance {:.1}, detects {})",
                entity,
                state.name(),
                next.name(),
                senses.distance_to_target,
                senses.detects_target
            ));
            state_changes.write(StateChanged {
                agent: entity,
                from: state.clone(),
                to: next.clone(),
            });
        }

        *state = next;
    }
}
