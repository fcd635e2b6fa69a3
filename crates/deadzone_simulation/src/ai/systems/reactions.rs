//! AI reaction systems (alerts: gunfire, pack damage).

use bevy::prelude::*;

use crate::ai::alert::{self, AlertEvent, AlertKind};
use crate::ai::{AgentState, StateChanged};
use crate::combat::Dead;
use crate::components::Agent;

/// System: применить alerts ко всем живым агентам в радиусе
///
/// Читает события, записанные с прошлого тика (или снаружи между тиками).
/// Alerts, которые пишет урон в этом же тике, система увидит на следующем —
/// порядок итерации агентов на результат не влияет.
pub fn apply_alerts(
    mut alerts: EventReader<AlertEvent>,
    mut agents: Query<(Entity, &Transform, &mut AgentState), (With<Agent>, Without<Dead>)>,
    mut state_changes: EventWriter<StateChanged>,
) {
    for event in alerts.read() {
        let responses = alert::emit(
            event,
            agents
                .iter_mut()
                .map(|(entity, transform, state)| (entity, transform.translation, state.into_inner())),
        );

        if responses.is_empty() {
            continue;
        }

        let icon = match event.kind {
            AlertKind::Sound => "🔊",
            AlertKind::DirectDamage => "⚠️",
        };
        crate::log(&format!(
            "{} Alert {:?} at {:?} (radius {:.1}m) → {} agents affected",
            icon,
            event.kind,
            event.origin,
            event.radius,
            responses.len()
        ));

        // Retarget расследования (Investigating → Investigating) — не смена вида состояния
        for response in responses
            .into_iter()
            .filter(|response| response.from.name() != response.to.name())
        {
            state_changes.write(StateChanged {
                agent: response.agent,
                from: response.from,
                to: response.to,
            });
        }
    }
}

