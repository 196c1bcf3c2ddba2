use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Lifecycle of one voice call.
///
/// `Unset` is the state before the SDK has reported anything and behaves
/// exactly like `Disconnected`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    #[default]
    Unset,
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl AgentState {
    pub fn is_idle(&self) -> bool {
        matches!(self, AgentState::Unset | AgentState::Disconnected)
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self, AgentState::Connecting | AgentState::Disconnecting)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, AgentState::Connected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentState::Unset => "unset",
            AgentState::Disconnected => "disconnected",
            AgentState::Connecting => "connecting",
            AgentState::Connected => "connected",
            AgentState::Disconnecting => "disconnecting",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
