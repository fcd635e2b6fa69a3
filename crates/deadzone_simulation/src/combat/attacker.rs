//! Attacker component — каденс атак агента
//!
//! Анимацию и hit detection делает хост: ECS только решает КОГДА пора
//! стрелять/бить и пишет AgentAttacked.

use bevy::prelude::*;

/// Attacker — cooldown между атаками
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    /// Cooldown между атаками (секунды)
    pub attack_cooldown: f32,

    /// Текущий cooldown таймер (уменьшается до 0)
    pub cooldown_timer: f32,
}

impl Default for Attacker {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Attacker {
    pub fn new(attack_cooldown: f32) -> Self {
        Self {
            attack_cooldown,
            cooldown_timer: 0.0,
        }
    }

    /// Может ли атаковать (cooldown == 0)
    pub fn can_attack(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    /// Начать атаку (сбросить cooldown)
    pub fn start_attack(&mut self) {
        self.cooldown_timer = self.attack_cooldown;
    }

    pub fn tick(&mut self, delta: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
        }
    }
}

/// Событие: агент атакует цель (trigger "Attack"/"Shoot" для хоста)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentAttacked {
    pub agent: Entity,
    pub target: Entity,
}

/// System: обновление attack cooldown таймеров
pub fn tick_attack_cooldowns(mut query: Query<&mut Attacker>, time: Res<Time>) {
    let delta = time.delta_secs();

    for mut attacker in query.iter_mut() {
        attacker.tick(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attacker_cooldown() {
        let mut attacker = Attacker::default();
        assert!(attacker.can_attack());

        attacker.start_attack();
        assert!(!attacker.can_attack());
        assert_eq!(attacker.cooldown_timer, 1.0);

        attacker.tick(0.5);
        assert!(!attacker.can_attack());

        attacker.tick(0.5);
        assert!(attacker.can_attack());

        attacker.tick(0.5); // не уходит в минус
        assert_eq!(attacker.cooldown_timer, 0.0);
    }
}
