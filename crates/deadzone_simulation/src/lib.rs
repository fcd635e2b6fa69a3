//! DEADZONE Simulation Core
//!
//! ECS-симуляция поведения врагов на Bevy 0.16 (headless)
//!
//! HYBRID ARCHITECTURE:
//! - ECS = perception, alerts, state machine, health/lifecycle
//! - Хост-движок = физика тел, навмеш, анимации, звук (через узкие интерфейсы)
//!
//! Движок не дёргает Update сам — внешний драйвер вызывает `Simulation::tick(delta)`.

use std::time::Duration;

use bevy::ecs::schedule::ExecutorKind;
use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod navigation;

// Re-export базовых типов для удобства
pub use ai::{
    can_see_target, detects_target, AIPlugin, AgentConfig, AgentState, AlertEvent, AlertKind,
    ChaseLossPolicy, Obstacles, StateChanged,
};
pub use combat::{
    AgentAttacked, AgentDied, Attacker, CombatPlugin, DamageOutcome, DamageRequest, Dead,
    DespawnAfter, ShotFired,
};
pub use components::*;
pub use config::{ConfigError, NavigatorConfig, ScenarioConfig, SimulationConfig};
pub use logger::{log, log_error, log_info, log_warning};
pub use navigation::{NavAgent, Navigator, StraightLineNavigator};

/// Фазы тика (строго последовательно)
///
/// Alerts читаются ДО Damage: DirectDamage от урона этого тика применится на следующем.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Внешние стимулы (выстрелы) → alerts / damage requests
    Intake,
    Alerts,
    Damage,
    /// Perception + FSM
    Decide,
    /// Intents: навигация, анимация, разворот
    Act,
    Navigate,
    /// Деспавн трупов
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                SimulationSet::Intake,
                SimulationSet::Alerts,
                SimulationSet::Damage,
                SimulationSet::Decide,
                SimulationSet::Act,
                SimulationSet::Navigate,
                SimulationSet::Cleanup,
            )
                .chain(),
        )
        .add_plugins((CombatPlugin, AIPlugin))
        .add_systems(
            Update,
            navigation::drive_navigation.in_set(SimulationSet::Navigate),
        );
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Поведение агентов RNG не использует — только раскладка сценария.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Без TimePlugin: Time двигает только `Simulation::tick`. Update однопоточный.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.init_resource::<Time>()
        .insert_resource(DeterministicRng::new(seed))
        .edit_schedule(Update, |schedule| {
            schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        });

    app
}

/// Снимок агента для сравнения прогонов
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshot {
    pub index: u32,
    pub state: AgentState,
    pub position: Vec3,
    pub hit_points: f32,
}

/// Headless драйвер: владеет App, отдаёт операции ядра наружу
pub struct Simulation {
    app: App,
}

impl Simulation {
    pub fn new(seed: u64) -> Self {
        let mut app = create_headless_app(seed);
        app.add_plugins(SimulationPlugin);
        Self { app }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    /// Заспавнить цель и инжектнуть её как Target (заменяет прежнюю)
    pub fn spawn_target(&mut self, position: Vec3) -> Entity {
        let world = self.app.world_mut();
        let entity = world
            .spawn((Transform::from_translation(position), TargetPosture::default()))
            .id();
        world.insert_resource(Target { entity });
        entity
    }

    /// Хост двигает цель между тиками. false — цели нет.
    pub fn move_target(&mut self, position: Vec3, posture: TargetPosture) -> bool {
        let world = self.app.world_mut();
        let Some(target) = world.get_resource::<Target>().copied() else {
            return false;
        };
        let Ok(mut entity) = world.get_entity_mut(target.entity) else {
            return false;
        };

        if let Some(mut transform) = entity.get_mut::<Transform>() {
            transform.translation = position;
        }
        entity.insert(posture);
        true
    }

    /// Заспавнить агента: Idle, полные hit points. `nav: None` → perception-only.
    pub fn spawn_agent(
        &mut self,
        transform: Transform,
        config: AgentConfig,
        nav: Option<NavAgent>,
    ) -> Entity {
        let mut entity = self.app.world_mut().spawn((
            Agent,
            transform,
            AgentState::Idle,
            HitPoints::new(config.max_hit_points),
            Attacker::new(config.attack_cooldown),
            config,
        ));
        if let Some(nav) = nav {
            entity.insert(nav);
        }
        entity.id()
    }

    pub fn add_obstacle(&mut self, center: Vec3, half_size: Vec3) {
        self.app
            .world_mut()
            .resource_mut::<Obstacles>()
            .add_box(center, half_size);
    }

    /// Один тик симуляции длительностью `delta` секунд
    pub fn tick(&mut self, delta: f32) {
        let delta = Duration::try_from_secs_f32(delta).unwrap_or_default();
        self.app.world_mut().resource_mut::<Time>().advance_by(delta);
        self.app.update();
    }

    /// TakeDamage: синхронно (hit points и смерть видны сразу, alert — на следующем тике)
    pub fn take_damage(&mut self, agent: Entity, amount: f32) -> DamageOutcome {
        self.app
            .world_mut()
            .run_system_once_with(combat::damage_agent, (agent, amount))
            .unwrap_or(DamageOutcome::Ignored)
    }

    /// Взрыв: урон всем живым агентам в радиусе (граница включительна)
    pub fn apply_area_damage(
        &mut self,
        origin: Vec3,
        radius: f32,
        amount: f32,
    ) -> Vec<(Entity, DamageOutcome)> {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<(Entity, &Transform), (With<Agent>, Without<Dead>)>();
        let victims: Vec<Entity> = query
            .iter(world)
            .filter(|(_, transform)| transform.translation.distance(origin) <= radius)
            .map(|(entity, _)| entity)
            .collect();

        victims
            .into_iter()
            .map(|agent| (agent, self.take_damage(agent, amount)))
            .collect()
    }

    /// Alert снаружи (оружие, скрипты) — применится на следующем тике
    pub fn emit_alert(&mut self, event: AlertEvent) {
        self.app.world_mut().send_event(event);
    }

    pub fn report_shot(&mut self, shot: ShotFired) {
        self.app.world_mut().send_event(shot);
    }

    pub fn state(&self, agent: Entity) -> Option<&AgentState> {
        self.app.world().get::<AgentState>(agent)
    }

    pub fn hit_points(&self, agent: Entity) -> Option<&HitPoints> {
        self.app.world().get::<HitPoints>(agent)
    }

    pub fn exists(&self, entity: Entity) -> bool {
        self.app.world().get_entity(entity).is_ok()
    }

    /// Снимок всех агентов, отсортированный по Entity index
    pub fn snapshot(&mut self) -> Vec<AgentSnapshot> {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<(Entity, &AgentState, &Transform, &HitPoints), With<Agent>>();

        let mut snapshot: Vec<AgentSnapshot> = query
            .iter(world)
            .map(|(entity, state, transform, hit_points)| AgentSnapshot {
                index: entity.index(),
                state: state.clone(),
                position: transform.translation,
                hit_points: hit_points.current,
            })
            .collect();
        snapshot.sort_by_key(|agent| agent.index);
        snapshot
    }
}
