//! Combat module: урон, смерть, каденс атак, выстрелы игрока
//!
//! ECS ответственность:
//! - Game state: HitPoints, Attacker cooldown
//! - Rules: TakeDamage → DirectDamage alert → Dead → DespawnAfter
//! - Events: DamageRequest, AgentDied, AgentAttacked, ShotFired
//!
//! Хост ответственность:
//! - raycast оружия, death animation, hit reactions

use bevy::prelude::*;

pub mod attacker;
pub mod damage;
pub mod weapon;

// Re-export основных типов
pub use attacker::{tick_attack_cooldowns, AgentAttacked, Attacker};
pub use damage::{
    apply_damage_requests, damage_agent, despawn_after_timeout, resolve_damage, AgentDied,
    DamageContext, DamageOutcome, DamageRequest, Dead, DespawnAfter,
};
pub use weapon::{process_shots, ShotFired};

use crate::SimulationSet;

/// Combat Plugin
///
/// Порядок внутри тика задаётся SimulationSet (см. SimulationPlugin):
/// 1. process_shots (Intake) — выстрелы → Sound alerts + DamageRequest
/// 2. apply_damage_requests (Damage) — после alerts, их DirectDamage виден следующему тику
/// 3. tick_attack_cooldowns (Damage)
/// 4. despawn_after_timeout (Cleanup)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageRequest>()
            .add_event::<AgentDied>()
            .add_event::<AgentAttacked>()
            .add_event::<ShotFired>();

        app.add_systems(Update, process_shots.in_set(SimulationSet::Intake))
            .add_systems(
                Update,
                (apply_damage_requests, tick_attack_cooldowns)
                    .chain()
                    .in_set(SimulationSet::Damage),
            )
            .add_systems(Update, despawn_after_timeout.in_set(SimulationSet::Cleanup));
    }
}
