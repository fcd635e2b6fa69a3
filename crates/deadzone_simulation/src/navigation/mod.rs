//! Navigation — узкий интерфейс к pathfinding коллаборатору
//!
//! ECS не владеет навмешем: FSM только ставит destination / паузу и читает
//! feedback (remaining distance, path pending). Реализация может считать путь
//! асинхронно на своём расписании — pending трактуется как "ещё не дошли".
//!
//! Для headless прогонов и тестов есть StraightLineNavigator (по прямой, без навмеша).

use bevy::prelude::*;

use crate::combat::Dead;

/// Дистанция, на которую должна сместиться точка назначения чтобы перезапросить путь
///
/// Без порога погоня за движущейся целью держала бы путь вечно pending.
pub const REPATH_DISTANCE: f32 = 0.25;

/// Насколько StraightLineNavigator заходит внутрь stopping distance
///
/// Останавливаемся чуть ближе границы, чтобы `distance <= stopping_distance` в FSM
/// не зависал на ошибке округления.
pub const ARRIVAL_SLACK: f32 = 0.01;

/// Скорость доворота StraightLineNavigator по ходу движения (доля slerp в секунду)
pub const DEFAULT_TURN_SPEED: f32 = 10.0;

/// Контракт навигационного коллаборатора
pub trait Navigator: Send + Sync + 'static {
    fn set_destination(&mut self, point: Vec3);

    /// Сбросить путь (destination забывается)
    fn reset_path(&mut self);

    /// Оставшаяся длина пути; пока путь не посчитан — `f32::INFINITY`
    fn remaining_distance(&self) -> f32;

    fn stopping_distance(&self) -> f32;

    fn path_pending(&self) -> bool;

    fn is_stopped(&self) -> bool;

    /// Пауза без сброса destination (держим позицию в Attacking)
    fn set_stopped(&mut self, stopped: bool);

    fn velocity(&self) -> Vec3;

    /// Продвинуть агента на тик: позиция и поворот по ходу движения.
    /// Внешние коллабораторы двигают тело сами — no-op.
    fn step(&mut self, _body: &mut Transform, _delta: f32) {}
}

/// Компонент: навигация агента
///
/// Отсутствие компонента или `enabled == false` → агент perception-only:
/// детектит и меняет state, но команд движения не отдаёт.
#[derive(Component)]
pub struct NavAgent {
    navigator: Box<dyn Navigator>,
    pub enabled: bool,
    destination: Option<Vec3>,
}

impl NavAgent {
    pub fn new(navigator: impl Navigator) -> Self {
        Self {
            navigator: Box::new(navigator),
            enabled: true,
            destination: None,
        }
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.enabled
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    /// Дошли до destination: путь есть, посчитан и remaining ≤ stopping distance
    pub fn arrived(&self) -> bool {
        self.destination.is_some()
            && !self.navigator.path_pending()
            && self.navigator.remaining_distance() <= self.navigator.stopping_distance()
    }

    /// Дошли именно до `point` (а не до старого destination)
    pub fn arrived_at(&self, point: Vec3) -> bool {
        self.destination
            .is_some_and(|destination| destination.distance(point) <= REPATH_DISTANCE)
            && self.arrived()
    }

    /// Идти к точке (перезапрос пути только если точка сместилась)
    ///
    /// Уже дошли, а точка уехала хоть немного — перезапрашиваем без порога,
    /// иначе агент стоит в stopping distance + REPATH_DISTANCE от цели.
    pub fn steer_to(&mut self, point: Vec3) {
        let needs_repath = match self.destination {
            None => true,
            Some(current) => {
                current.distance(point) > REPATH_DISTANCE || (current != point && self.arrived())
            }
        };

        if needs_repath {
            self.navigator.set_destination(point);
            self.destination = Some(point);
        }
        if self.navigator.is_stopped() {
            self.navigator.set_stopped(false);
        }
    }

    /// Стоять на месте, destination сохраняется
    pub fn hold(&mut self) {
        if !self.navigator.is_stopped() {
            self.navigator.set_stopped(true);
        }
    }

    /// Забыть путь (Idle)
    pub fn clear(&mut self) {
        if self.destination.take().is_some() {
            self.navigator.reset_path();
        }
        if self.navigator.is_stopped() {
            self.navigator.set_stopped(false);
        }
    }

    /// Отключить навсегда (смерть)
    pub fn halt(&mut self) {
        self.navigator.reset_path();
        self.navigator.set_stopped(true);
        self.destination = None;
        self.enabled = false;
    }

    pub fn step(&mut self, body: &mut Transform, delta: f32) {
        self.navigator.step(body, delta);
    }
}

/// Навигатор по прямой без навмеша (headless/тесты)
///
/// `path_latency_ticks` имитирует асинхронный расчёт пути: столько тиков после
/// `set_destination` путь pending и агент стоит. На ходу тело доворачивается
/// по направлению движения (yaw, slerp с шагом `turn_speed × delta`).
#[derive(Debug, Clone)]
pub struct StraightLineNavigator {
    pub speed: f32,
    pub stopping_distance: f32,
    pub path_latency_ticks: u32,
    pub turn_speed: f32,
    destination: Option<Vec3>,
    pending_ticks: u32,
    remaining: f32,
    velocity: Vec3,
    stopped: bool,
}

impl StraightLineNavigator {
    pub fn new(speed: f32, stopping_distance: f32) -> Self {
        Self {
            speed,
            stopping_distance,
            path_latency_ticks: 0,
            turn_speed: DEFAULT_TURN_SPEED,
            destination: None,
            pending_ticks: 0,
            remaining: 0.0,
            velocity: Vec3::ZERO,
            stopped: false,
        }
    }

    pub fn with_path_latency(mut self, ticks: u32) -> Self {
        self.path_latency_ticks = ticks;
        self
    }

    pub fn with_turn_speed(mut self, turn_speed: f32) -> Self {
        self.turn_speed = turn_speed;
        self
    }
}

impl Default for StraightLineNavigator {
    fn default() -> Self {
        Self::new(3.5, 2.0)
    }
}

impl Navigator for StraightLineNavigator {
    fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
        self.pending_ticks = self.path_latency_ticks;
        self.remaining = f32::INFINITY;
    }

    fn reset_path(&mut self) {
        self.destination = None;
        self.pending_ticks = 0;
        self.remaining = 0.0;
        self.velocity = Vec3::ZERO;
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn path_pending(&self) -> bool {
        self.pending_ticks > 0
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
        if stopped {
            self.velocity = Vec3::ZERO;
        }
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn step(&mut self, body: &mut Transform, delta: f32) {
        let Some(destination) = self.destination else {
            self.velocity = Vec3::ZERO;
            return;
        };

        if self.pending_ticks > 0 {
            self.pending_ticks -= 1;
            self.velocity = Vec3::ZERO;
            return;
        }

        let offset = destination - body.translation;
        let distance = offset.length();

        if self.stopped || distance <= self.stopping_distance {
            self.remaining = distance;
            self.velocity = Vec3::ZERO;
            return;
        }

        let direction = offset / distance;
        let rest_distance = (self.stopping_distance - ARRIVAL_SLACK).max(0.0);
        let travel = (self.speed * delta).min(distance - rest_distance);
        body.translation += direction * travel;
        self.remaining = distance - travel;
        self.velocity = direction * self.speed;

        let flat = Vec3::new(direction.x, 0.0, direction.z);
        if self.turn_speed > 0.0 && flat.length_squared() > f32::EPSILON {
            let look = Transform::IDENTITY.looking_to(flat, Vec3::Y).rotation;
            let t = (self.turn_speed * delta).clamp(0.0, 1.0);
            body.rotation = body.rotation.slerp(look, t);
        }
    }
}

/// Система: продвинуть навигаторы живых агентов на тик
pub fn drive_navigation(
    mut agents: Query<(&mut Transform, &mut NavAgent), Without<Dead>>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut nav) in agents.iter_mut() {
        if !nav.is_active() {
            continue;
        }
        nav.step(&mut transform, delta);
    }
}
