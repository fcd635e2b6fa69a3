//! Health/Lifecycle — урон, смерть, отложенный деспавн
//!
//! Урон по живому агенту всегда шумит: DirectDamage alert от позиции агента
//! поднимает и его самого, и стаю вокруг (радиус sound_reaction_range).
//! Alert виден на следующем тике.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::ai::{AgentConfig, AgentState, AlertEvent};
use crate::components::{AnimationIntent, HitPoints};
use crate::navigation::NavAgent;

/// Компонент-маркер: агент мёртв (hit points <= 0)
///
/// Все AI системы фильтруют `Without<Dead>`.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Компонент-маркер: деспавн entity после указанного времени
///
/// Даёт death animation доиграть. Система `despawn_after_timeout` сверяет с elapsed.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    /// Время деспавна (в секундах от старта симуляции)
    pub despawn_time: f32,
}

/// Событие: запрос урона от ECS-стороннего источника (пуля, взрыв)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub agent: Entity,
    pub amount: f32,
}

/// Событие: агент умер
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentDied {
    pub agent: Entity,
}

/// Итог `take_damage`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Агент уже мёртв или не существует — no-op
    Ignored,
    /// Урон применён, агент жив
    Wounded,
    /// Этот удар убил агента
    Killed,
}

/// Применить урон к состоянию агента
///
/// Первый летальный удар выигрывает: по Dead агенту — Ignored, hit points не трогаем.
pub fn resolve_damage(
    hit_points: &mut HitPoints,
    state: &mut AgentState,
    nav: Option<&mut NavAgent>,
    amount: f32,
) -> DamageOutcome {
    if state.is_dead() {
        return DamageOutcome::Ignored;
    }

    hit_points.take_damage(amount);
    if hit_points.is_alive() {
        return DamageOutcome::Wounded;
    }

    *state = AgentState::Dead;
    if let Some(nav) = nav {
        nav.halt();
    }
    DamageOutcome::Killed
}

/// Всё, что нужно для применения урона внутри системы
#[derive(SystemParam)]
pub struct DamageContext<'w, 's> {
    agents: Query<
        'w,
        's,
        (
            &'static Transform,
            &'static mut HitPoints,
            &'static mut AgentState,
            &'static AgentConfig,
            Option<&'static mut NavAgent>,
        ),
    >,
    commands: Commands<'w, 's>,
    alerts: EventWriter<'w, AlertEvent>,
    deaths: EventWriter<'w, AgentDied>,
    time: Res<'w, Time>,
}

impl DamageContext<'_, '_> {
    /// TakeDamage: hit points → alert стае → смерть + отложенный деспавн
    pub fn apply(&mut self, agent: Entity, amount: f32) -> DamageOutcome {
        let Ok((transform, mut hit_points, mut state, config, nav)) = self.agents.get_mut(agent)
        else {
            // Entity уже despawned — no-op
            return DamageOutcome::Ignored;
        };

        let outcome = resolve_damage(
            &mut hit_points,
            &mut state,
            nav.map(|nav| nav.into_inner()),
            amount,
        );

        if outcome == DamageOutcome::Ignored {
            return outcome;
        }

        self.alerts.write(AlertEvent::direct_damage(
            transform.translation,
            config.sound_reaction_range,
        ));

        crate::log(&format!(
            "🩸 {:?} took {:.1} damage (hp {:.1}/{:.1})",
            agent, amount, hit_points.current, hit_points.max
        ));

        if outcome == DamageOutcome::Killed {
            let despawn_time = self.time.elapsed_secs() + config.despawn_delay;
            self.commands
                .entity(agent)
                .insert((Dead, DespawnAfter { despawn_time }, AnimationIntent::IDLE));
            self.deaths.write(AgentDied { agent });

            crate::log_info(&format!(
                "💀 {:?} died → AI disabled, despawn at {:.2}s",
                agent, despawn_time
            ));
        }

        outcome
    }
}

/// One-shot система для синхронного `Simulation::take_damage`
pub fn damage_agent(
    In((agent, amount)): In<(Entity, f32)>,
    mut damage: DamageContext,
) -> DamageOutcome {
    damage.apply(agent, amount)
}

/// Система: применить DamageRequest события
pub fn apply_damage_requests(
    mut requests: EventReader<DamageRequest>,
    mut damage: DamageContext,
) {
    for request in requests.read() {
        damage.apply(request.agent, request.amount);
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter timeout
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}
