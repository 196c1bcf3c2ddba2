use ourstreet_config::VoiceConfig;
use serde::Serialize;
use utoipa::ToSchema;

/// Voice agent a client connects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub agent_id: String,
    pub name: String,
    pub description: String,
    pub connection_type: String,
}

impl AgentProfile {
    pub fn from_config(config: &VoiceConfig) -> Self {
        Self {
            agent_id: config.agent_id.clone(),
            name: config.agent_name.clone(),
            description: config.agent_description.clone(),
            connection_type: config.connection_type.clone(),
        }
    }

    pub fn session_request(&self) -> SessionRequest {
        SessionRequest {
            agent_id: self.agent_id.clone(),
            connection_type: self.connection_type.clone(),
        }
    }
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self::from_config(&VoiceConfig::default())
    }
}

/// Parameters handed to the transport when a session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub agent_id: String,
    pub connection_type: String,
}
