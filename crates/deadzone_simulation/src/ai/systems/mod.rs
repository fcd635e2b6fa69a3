//! AI systems (perception → decision → intents)

pub mod fsm;
pub mod movement;
pub mod reactions;

#[cfg(test)]
mod fsm_tests;

// Re-export all systems
pub use fsm::*;
pub use movement::*;
pub use reactions::*;
