//! Alert propagation integration test
//!
//! Sound → Investigating → (таймер) → Idle, DirectDamage → Chasing у соседей.
//! Alerts применяются на тике, следующем за тем, где их записали.

use bevy::prelude::*;
use deadzone_simulation::*;

const DELTA: f32 = 0.1;

/// Цель далеко — никто её не видит и не гонится
const FAR_AWAY: Vec3 = Vec3::new(500.0, 0.0, 500.0);

fn facing(position: Vec3, direction: Vec3) -> Transform {
    Transform::from_translation(position).looking_to(direction, Vec3::Y)
}

#[test]
fn test_sound_within_radius_starts_investigation() {
    // Scenario: Sound в O радиус 20, агент в 18м → Investigating(O) после тика
    let mut sim = Simulation::new(7);
    sim.spawn_target(FAR_AWAY);
    let origin = Vec3::new(0.0, 0.0, 0.0);
    let near = sim.spawn_agent(facing(Vec3::X * 18.0, Vec3::NEG_Z), AgentConfig::default(), None);
    let far = sim.spawn_agent(facing(Vec3::X * 25.0, Vec3::NEG_Z), AgentConfig::default(), None);

    sim.emit_alert(AlertEvent::sound(origin, 20.0));
    sim.tick(DELTA);

    assert!(matches!(
        sim.state(near),
        Some(AgentState::Investigating { point, .. }) if *point == origin
    ));
    assert_eq!(sim.state(far), Some(&AgentState::Idle));
}

#[test]
fn test_investigation_walks_to_point_and_gives_up() {
    let mut sim = Simulation::new(7);
    sim.spawn_target(FAR_AWAY);
    let config = AgentConfig {
        investigation_time: 1.0,
        ..Default::default()
    };
    let agent = sim.spawn_agent(
        facing(Vec3::ZERO, Vec3::NEG_Z),
        config,
        Some(NavAgent::new(StraightLineNavigator::new(10.0, 0.5))),
    );
    let point = Vec3::new(5.0, 0.0, 0.0);

    sim.emit_alert(AlertEvent::sound(point, 10.0));

    let mut visited = Vec::new();
    for _ in 0..100 {
        sim.tick(DELTA);
        let state = sim.state(agent).cloned().expect("agent state");
        visited.push(state.clone());
        if visited.len() > 1 && state == AgentState::Idle {
            break;
        }
    }

    assert!(matches!(visited.first(), Some(AgentState::Investigating { .. })));
    assert_eq!(visited.last(), Some(&AgentState::Idle));
    assert!(visited
        .iter()
        .all(|state| matches!(state, AgentState::Investigating { .. } | AgentState::Idle)));

    let position = sim.world().get::<Transform>(agent).expect("transform").translation;
    assert!(position.distance(point) <= 0.5);

    // Idle сбрасывает путь
    let nav = sim.world().get::<NavAgent>(agent).expect("nav agent");
    assert_eq!(nav.destination(), None);
}

#[test]
fn test_timer_waits_for_pending_path() {
    let mut sim = Simulation::new(7);
    sim.spawn_target(FAR_AWAY);
    let agent = sim.spawn_agent(
        facing(Vec3::ZERO, Vec3::NEG_Z),
        AgentConfig::default(),
        Some(NavAgent::new(
            StraightLineNavigator::new(3.5, 0.5).with_path_latency(3),
        )),
    );

    sim.emit_alert(AlertEvent::sound(Vec3::new(0.0, 0.0, 0.2), 10.0));
    for _ in 0..3 {
        sim.tick(DELTA);
    }

    assert!(matches!(
        sim.state(agent),
        Some(AgentState::Investigating { timer, .. }) if *timer == 0.0
    ));
}

#[test]
fn test_perception_only_investigator_times_out_in_place() {
    let mut sim = Simulation::new(7);
    sim.spawn_target(FAR_AWAY);
    let config = AgentConfig {
        investigation_time: 0.5,
        ..Default::default()
    };
    let agent = sim.spawn_agent(facing(Vec3::ZERO, Vec3::NEG_Z), config, None);

    sim.emit_alert(AlertEvent::sound(Vec3::new(3.0, 0.0, 0.0), 10.0));
    for _ in 0..10 {
        sim.tick(DELTA);
    }

    assert_eq!(sim.state(agent), Some(&AgentState::Idle));
    let position = sim.world().get::<Transform>(agent).expect("transform").translation;
    assert_eq!(position, Vec3::ZERO);
}

#[test]
fn test_sound_does_not_interrupt_chase() {
    let mut sim = Simulation::new(7);
    sim.spawn_target(Vec3::new(0.0, 0.0, -6.0));
    let agent = sim.spawn_agent(facing(Vec3::ZERO, Vec3::NEG_Z), AgentConfig::default(), None);

    sim.tick(DELTA);
    assert_eq!(sim.state(agent), Some(&AgentState::Chasing));

    sim.emit_alert(AlertEvent::sound(Vec3::new(8.0, 0.0, 0.0), 30.0));
    sim.tick(DELTA);

    assert_eq!(sim.state(agent), Some(&AgentState::Chasing));
}

#[test]
fn test_damage_alerts_pack_on_next_tick() {
    let mut sim = Simulation::new(7);
    // Цель за спинами агентов, но в chase range первых двух
    sim.spawn_target(Vec3::new(0.0, 0.0, -8.0));
    let config = AgentConfig::default(); // sound_reaction_range 10
    let victim = sim.spawn_agent(facing(Vec3::ZERO, Vec3::Z), config.clone(), None);
    let neighbour = sim.spawn_agent(facing(Vec3::X * 5.0, Vec3::Z), config.clone(), None);
    let stranger = sim.spawn_agent(facing(Vec3::X * 30.0, Vec3::Z), config, None);

    assert_eq!(sim.take_damage(victim, 10.0), DamageOutcome::Wounded);
    // Урон синхронный, реакция — нет
    assert_eq!(sim.state(victim), Some(&AgentState::Idle));

    sim.tick(DELTA);

    assert_eq!(sim.state(victim), Some(&AgentState::Chasing));
    assert_eq!(sim.state(neighbour), Some(&AgentState::Chasing));
    assert_eq!(sim.state(stranger), Some(&AgentState::Idle));
}

#[test]
fn test_damage_request_reaction_lags_one_tick() {
    let mut sim = Simulation::new(7);
    sim.spawn_target(Vec3::new(0.0, 0.0, -8.0));
    let agent = sim.spawn_agent(facing(Vec3::ZERO, Vec3::Z), AgentConfig::default(), None);

    sim.world_mut().send_event(DamageRequest { agent, amount: 25.0 });
    sim.tick(DELTA);

    let hit_points = sim.hit_points(agent).copied().expect("hit points");
    assert_eq!(hit_points.current, 75.0);
    assert_eq!(sim.state(agent), Some(&AgentState::Idle));

    sim.tick(DELTA);
    assert_eq!(sim.state(agent), Some(&AgentState::Chasing));
}

#[test]
fn test_dead_agents_ignore_alerts() {
    let mut sim = Simulation::new(7);
    sim.spawn_target(FAR_AWAY);
    let agent = sim.spawn_agent(facing(Vec3::ZERO, Vec3::NEG_Z), AgentConfig::default(), None);

    assert_eq!(sim.take_damage(agent, 500.0), DamageOutcome::Killed);

    sim.emit_alert(AlertEvent::sound(Vec3::X, 50.0));
    sim.emit_alert(AlertEvent::direct_damage(Vec3::X, 50.0));
    sim.tick(DELTA);
    sim.tick(DELTA);

    assert_eq!(sim.state(agent), Some(&AgentState::Dead));
}

#[test]
fn test_missed_shot_draws_attention() {
    let mut sim = Simulation::new(7);
    sim.spawn_target(FAR_AWAY);
    let agent = sim.spawn_agent(facing(Vec3::ZERO, Vec3::NEG_Z), AgentConfig::default(), None);
    let impact = Vec3::new(6.0, 1.0, 0.0);

    sim.report_shot(ShotFired::miss(impact, 15.0));
    // Intake → Alerts в том же тике
    sim.tick(DELTA);

    assert!(matches!(
        sim.state(agent),
        Some(AgentState::Investigating { point, .. }) if *point == impact
    ));
    let hit_points = sim.hit_points(agent).copied().expect("hit points");
    assert_eq!(hit_points.current, hit_points.max);
}

#[test]
fn test_investigator_turns_toward_noise_and_spots_target() {
    let mut sim = Simulation::new(7);
    // Цель за шумом, прямо по ходу движения
    sim.spawn_target(Vec3::new(0.0, 0.0, 18.0));
    let agent = sim.spawn_agent(
        facing(Vec3::ZERO, Vec3::NEG_Z),
        AgentConfig::default(),
        Some(NavAgent::new(StraightLineNavigator::default())),
    );

    sim.emit_alert(AlertEvent::sound(Vec3::new(0.0, 0.0, 10.0), 15.0));
    sim.tick(DELTA);
    assert!(matches!(sim.state(agent), Some(AgentState::Investigating { .. })));

    let transform = sim.world().get::<Transform>(agent).expect("transform");
    assert!(transform.forward().dot(Vec3::Z) > 0.99, "агент не развернулся по ходу");

    sim.tick(DELTA);
    assert_eq!(sim.state(agent), Some(&AgentState::Chasing));
}

#[test]
fn test_retargeted_investigation_is_not_a_state_change() {
    let mut sim = Simulation::new(7);
    sim.spawn_target(FAR_AWAY);
    let agent = sim.spawn_agent(facing(Vec3::ZERO, Vec3::NEG_Z), AgentConfig::default(), None);

    sim.emit_alert(AlertEvent::sound(Vec3::X * 3.0, 10.0));
    sim.tick(DELTA);
    assert_eq!(
        sim.world()
            .resource::<Events<StateChanged>>()
            .iter_current_update_events()
            .count(),
        1
    );

    let second = Vec3::Z * 4.0;
    sim.emit_alert(AlertEvent::sound(second, 10.0));
    sim.tick(DELTA);

    assert!(matches!(
        sim.state(agent),
        Some(AgentState::Investigating { point, .. }) if *point == second
    ));
    assert_eq!(
        sim.world()
            .resource::<Events<StateChanged>>()
            .iter_current_update_events()
            .count(),
        0
    );
}
