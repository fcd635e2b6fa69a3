//! ECS Components для агентов и цели
//!
//! Организация по доменам:
//! - agent: маркер агента + hit points
//! - target: преследуемая цель (игрок) и её поза
//! - animation: intent флаги для анимационного слоя
//! - ai: state machine + тюнинг (живут в crate::ai, здесь re-export)

pub mod agent;
pub mod ai;
pub mod animation;
pub mod target;

// Re-exports для удобного импорта
pub use agent::*;
pub use ai::*;
pub use animation::*;
pub use target::*;
