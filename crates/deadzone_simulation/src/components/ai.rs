//! AI компоненты: state machine, config

// AgentState и AgentConfig определены в crate::ai (ai/components/fsm.rs),
// здесь только re-export для единообразия импорта.
pub use crate::ai::{AgentConfig, AgentState, ChaseLossPolicy};
