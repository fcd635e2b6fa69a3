//! Headless симуляция DEADZONE
//!
//! Цель ходит по квадрату, орда зомби раскидана вокруг (seeded), по таймингу
//! стреляем в стену и в одного из агентов. Раз в 100 тиков — гистограмма состояний.
//!
//! Использование: `deadzone_simulation [config.toml]`

use std::collections::BTreeMap;
use std::process::ExitCode;

use bevy::prelude::*;
use rand::Rng;

use deadzone_simulation::logger::{self, LogLevel};
use deadzone_simulation::{
    log_error, log_info, DeterministicRng, NavAgent, ShotFired, Simulation, SimulationConfig,
    TargetPosture,
};

/// Маршрут цели (квадрат 24×24 вокруг центра)
const ROUTE: [Vec3; 4] = [
    Vec3::new(-12.0, 0.0, -12.0),
    Vec3::new(12.0, 0.0, -12.0),
    Vec3::new(12.0, 0.0, 12.0),
    Vec3::new(-12.0, 0.0, 12.0),
];
const TARGET_SPEED: f32 = 2.5;
const SHOT_HEARING_RANGE: f32 = 25.0;
const SHOT_DAMAGE: f32 = 40.0;

fn main() -> ExitCode {
    logger::init_logger();

    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log_error(&format!("❌ {}", err));
                return ExitCode::FAILURE;
            }
        },
        None => SimulationConfig::default(),
    };

    if let Some(level) = LogLevel::parse(&config.scenario.log_level) {
        logger::set_log_level(level);
    }

    run(&config);
    ExitCode::SUCCESS
}

fn run(config: &SimulationConfig) {
    let scenario = &config.scenario;
    log_info(&format!(
        "Starting DEADZONE headless simulation (seed: {}, agents: {}, ticks: {})",
        scenario.seed, scenario.agent_count, scenario.ticks
    ));

    let mut sim = Simulation::new(scenario.seed);

    // Пара стен в центре — тестируем occlusion
    sim.add_obstacle(Vec3::new(0.0, 1.5, -4.0), Vec3::new(6.0, 1.5, 0.3));
    sim.add_obstacle(Vec3::new(4.0, 1.5, 6.0), Vec3::new(0.3, 1.5, 4.0));

    sim.spawn_target(ROUTE[0]);

    let spawn_points: Vec<(Vec3, f32)> = {
        let mut rng = sim.world_mut().resource_mut::<DeterministicRng>();
        (0..scenario.agent_count)
            .map(|_| {
                let angle = rng.rng.gen::<f32>() * std::f32::consts::TAU;
                let distance = rng.rng.gen::<f32>() * scenario.spawn_radius;
                let heading = rng.rng.gen::<f32>() * std::f32::consts::TAU;
                (
                    Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance),
                    heading,
                )
            })
            .collect()
    };

    let agents: Vec<Entity> = spawn_points
        .into_iter()
        .map(|(position, heading)| {
            sim.spawn_agent(
                Transform::from_translation(position).with_rotation(Quat::from_rotation_y(heading)),
                config.agent.clone(),
                Some(NavAgent::new(config.navigator.build())),
            )
        })
        .collect();

    let delta = 1.0 / scenario.tick_rate;
    let mut target_position = ROUTE[0];
    let mut waypoint = 1;

    for tick in 0..scenario.ticks {
        // Цель идёт к следующей точке маршрута
        let to_waypoint = ROUTE[waypoint] - target_position;
        let step = TARGET_SPEED * delta;
        if to_waypoint.length() <= step {
            target_position = ROUTE[waypoint];
            waypoint = (waypoint + 1) % ROUTE.len();
        } else {
            target_position += to_waypoint.normalize() * step;
        }
        sim.move_target(
            target_position,
            TargetPosture {
                is_moving: true,
                is_crouching: false,
            },
        );

        // Промах в стену: только шум
        if tick == 240 {
            sim.report_shot(ShotFired::miss(Vec3::new(0.0, 1.0, -4.0), SHOT_HEARING_RANGE));
        }

        // Попадания в первого агента, пока не умрёт
        if tick >= 480 && tick % 60 == 0 {
            if let Some(&victim) = agents.first() {
                if sim.exists(victim) {
                    let impact = sim
                        .world()
                        .get::<Transform>(victim)
                        .map(|transform| transform.translation)
                        .unwrap_or(target_position);
                    sim.report_shot(ShotFired::hit(impact, SHOT_HEARING_RANGE, victim, SHOT_DAMAGE));
                }
            }
        }

        sim.tick(delta);

        if tick % 100 == 0 {
            log_info(&format!("Tick {}: {}", tick, histogram(&mut sim)));
        }
    }

    log_info(&format!("Simulation complete! Final: {}", histogram(&mut sim)));
}

fn histogram(sim: &mut Simulation) -> String {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for agent in sim.snapshot() {
        *counts.entry(agent.state.name()).or_default() += 1;
    }

    counts
        .iter()
        .map(|(name, count)| format!("{}={}", name, count))
        .collect::<Vec<_>>()
        .join(" ")
}
