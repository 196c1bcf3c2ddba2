use crate::AgentState;

/// Callback from the voice SDK, delivered over the controller's event channel.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceEvent {
    StatusChanged(AgentState),
    Connected,
    Disconnected,
    Message(String),
    Error(String),
}
