//! Alert propagation — шум и урон, меняющие состояние агентов в радиусе
//!
//! Sound: "шум вызывает любопытство" → Investigating (кроме уже спровоцированных).
//! DirectDamage: "выстрел в тебя вызывает уверенность" → Chasing безусловно.

use bevy::prelude::*;

use crate::ai::AgentState;

/// Вид стимула
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AlertKind {
    /// Выстрел / попадание пули в стену
    Sound,
    /// Агента (или соседа по стае) ранили
    DirectDamage,
}

/// Alert событие: точка интереса + радиус слышимости
///
/// Эфемерное: каждый агент потребляет его не более одного раза, не персистится.
/// Пишут: оружие (Sound на каждом попадании), health (DirectDamage при уроне).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AlertEvent {
    pub origin: Vec3,
    pub radius: f32,
    pub kind: AlertKind,
}

impl AlertEvent {
    pub fn sound(origin: Vec3, radius: f32) -> Self {
        Self {
            origin,
            radius,
            kind: AlertKind::Sound,
        }
    }

    pub fn direct_damage(origin: Vec3, radius: f32) -> Self {
        Self {
            origin,
            radius,
            kind: AlertKind::DirectDamage,
        }
    }

    /// Граница радиуса включительна
    pub fn reaches(&self, position: Vec3) -> bool {
        position.distance_squared(self.origin) <= self.radius * self.radius
    }
}

/// Реакция одного агента на alert
#[derive(Debug, Clone, PartialEq)]
pub struct AlertResponse {
    pub agent: Entity,
    pub from: AgentState,
    pub to: AgentState,
}

/// Применить alert к состоянию одного агента
///
/// Возвращает true если состояние изменилось (агент "затронут").
/// Dead — no-op. Re-investigate на новую точку сбрасывает таймер.
pub fn apply_alert(state: &mut AgentState, event: &AlertEvent) -> bool {
    if state.is_dead() {
        return false;
    }

    let next = match event.kind {
        AlertKind::Sound => {
            if state.is_engaged() {
                // Спровоцированный агент не откатывается в расследование
                return false;
            }
            AgentState::investigating(event.origin)
        }
        AlertKind::DirectDamage => AgentState::Chasing,
    };

    if *state == next {
        return false;
    }
    *state = next;
    true
}

/// Разослать alert всем слушателям в радиусе
///
/// Слушатели — (entity, позиция, состояние). Возвращает затронутых агентов
/// в порядке итерации.
pub fn emit<'a>(
    event: &AlertEvent,
    listeners: impl IntoIterator<Item = (Entity, Vec3, &'a mut AgentState)>,
) -> Vec<AlertResponse> {
    let mut affected = Vec::new();

    for (agent, position, state) in listeners {
        if !event.reaches(position) {
            continue;
        }

        let from = state.clone();
        if apply_alert(state, event) {
            affected.push(AlertResponse {
                agent,
                from,
                to: state.clone(),
            });
        }
    }

    affected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_alert_starts_investigation() {
        // Scenario: Sound в O радиус 20, агент в 18м от O, Idle → Investigating(O)
        let origin = Vec3::new(10.0, 0.0, 10.0);
        let event = AlertEvent::sound(origin, 20.0);
        let mut state = AgentState::Idle;

        let responses = emit(
            &event,
            [(Entity::from_raw(1), origin + Vec3::X * 18.0, &mut state)],
        );

        assert_eq!(responses.len(), 1);
        assert_eq!(state, AgentState::investigating(origin));
        assert_eq!(responses[0].from, AgentState::Idle);
    }

    #[test]
    fn test_sound_alert_out_of_radius_ignored() {
        let event = AlertEvent::sound(Vec3::ZERO, 20.0);
        let mut state = AgentState::Idle;

        let responses = emit(&event, [(Entity::from_raw(1), Vec3::X * 20.5, &mut state)]);

        assert!(responses.is_empty());
        assert_eq!(state, AgentState::Idle);
    }

    #[test]
    fn test_alert_radius_boundary_inclusive() {
        let event = AlertEvent::sound(Vec3::ZERO, 20.0);
        assert!(event.reaches(Vec3::Z * 20.0));
        assert!(!event.reaches(Vec3::Z * 20.001));
    }

    #[test]
    fn test_engaged_agents_ignore_sound() {
        let event = AlertEvent::sound(Vec3::ZERO, 50.0);
        let mut chasing = AgentState::Chasing;
        let mut attacking = AgentState::Attacking;

        let responses = emit(
            &event,
            [
                (Entity::from_raw(1), Vec3::X, &mut chasing),
                (Entity::from_raw(2), Vec3::Z, &mut attacking),
            ],
        );

        assert!(responses.is_empty());
        assert_eq!(chasing, AgentState::Chasing);
        assert_eq!(attacking, AgentState::Attacking);
    }

    #[test]
    fn test_direct_damage_forces_chasing() {
        let event = AlertEvent::direct_damage(Vec3::ZERO, 10.0);
        let mut idle = AgentState::Idle;
        let mut investigating = AgentState::Investigating {
            point: Vec3::X * 3.0,
            timer: 2.5,
        };
        let mut attacking = AgentState::Attacking;

        let responses = emit(
            &event,
            [
                (Entity::from_raw(1), Vec3::X, &mut idle),
                (Entity::from_raw(2), Vec3::Z, &mut investigating),
                (Entity::from_raw(3), Vec3::NEG_X, &mut attacking),
            ],
        );

        assert_eq!(idle, AgentState::Chasing);
        assert_eq!(investigating, AgentState::Chasing);
        assert_eq!(attacking, AgentState::Chasing);
        assert_eq!(responses.len(), 3);
    }

    #[test]
    fn test_new_sound_retargets_investigation() {
        let first = Vec3::new(1.0, 0.0, 1.0);
        let second = Vec3::new(4.0, 0.0, -2.0);
        let mut state = AgentState::Investigating {
            point: first,
            timer: 3.0,
        };

        assert!(apply_alert(&mut state, &AlertEvent::sound(second, 30.0)));
        assert_eq!(state, AgentState::investigating(second));
    }

    #[test]
    fn test_dead_agent_ignores_every_alert() {
        let mut state = AgentState::Dead;

        assert!(!apply_alert(&mut state, &AlertEvent::sound(Vec3::ZERO, 100.0)));
        assert!(!apply_alert(&mut state, &AlertEvent::direct_damage(Vec3::ZERO, 100.0)));
        assert_eq!(state, AgentState::Dead);
    }
}
