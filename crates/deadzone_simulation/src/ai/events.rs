//! AI Events — наблюдаемые переходы state machine
//!
//! Хост (анимации, звук, UI, дебаг оверлей) подписывается вместо опроса AgentState.

use bevy::prelude::*;

use crate::ai::AgentState;

/// Агент сменил состояние (через тик FSM или через alert)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct StateChanged {
    pub agent: Entity,
    pub from: AgentState,
    pub to: AgentState,
}
