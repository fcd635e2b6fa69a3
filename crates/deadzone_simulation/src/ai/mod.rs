//! AI decision-making module
//!
//! Perception (зрение + occlusion) → alerts (шум/урон) → FSM → intents.
//! Idle / Investigating / Chasing / Attacking / Dead.

use bevy::prelude::*;

pub mod alert;
pub mod components;
pub mod events;
pub mod perception;
pub mod systems;

// Re-export основных типов
pub use alert::{AlertEvent, AlertKind, AlertResponse};
pub use components::{AgentConfig, AgentState, ChaseLossPolicy};
pub use events::StateChanged;
pub use perception::{can_see_target, detects_target, Obstacles};

use crate::SimulationSet;

/// AI Plugin
///
/// Порядок выполнения (через SimulationSet):
/// 1. apply_alerts (Alerts) — шум/урон с прошлого тика
/// 2. ai_fsm_transitions (Decide) — perception + nav feedback → новый AgentState
/// 3. ai_movement_from_state → face_target (Act) — intents из нового состояния
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AlertEvent>()
            .add_event::<StateChanged>()
            .init_resource::<Obstacles>();

        app.add_systems(Update, systems::apply_alerts.in_set(SimulationSet::Alerts))
            .add_systems(
                Update,
                systems::ai_fsm_transitions.in_set(SimulationSet::Decide),
            )
            .add_systems(
                Update,
                (systems::ai_movement_from_state, systems::face_target)
                    .chain()
                    .in_set(SimulationSet::Act),
            );
    }
}
