//! What the call screen shows for a given state.

use crate::{AgentProfile, AgentState};

pub const IDLE_HINT: &str = "Tap the button below to start a voice conversation. I can help you report issues, check status, and navigate the platform.";
pub const LISTENING_TIP: &str = "I'm listening... Speak naturally to report issues or ask questions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbMode {
    Talking,
    Thinking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallButton {
    Start,
    End,
    /// Spinner; presses are ignored.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Error(String),
    Description(String),
    Transitioning(AgentState),
    Connected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceView {
    pub title: String,
    pub orb: Option<OrbMode>,
    pub button: CallButton,
    pub status: StatusLine,
    pub hint: Option<&'static str>,
    pub listening_tip: Option<&'static str>,
}

impl VoiceView {
    pub fn button_enabled(&self) -> bool {
        self.button != CallButton::Busy
    }
}

pub fn render(state: AgentState, error: Option<&str>, agent: &AgentProfile) -> VoiceView {
    let orb = match state {
        AgentState::Connected => Some(OrbMode::Talking),
        AgentState::Connecting => Some(OrbMode::Thinking),
        _ => None,
    };

    let button = if state.is_transitioning() {
        CallButton::Busy
    } else if state.is_active() {
        CallButton::End
    } else {
        CallButton::Start
    };

    let status = match error {
        Some(message) => StatusLine::Error(message.to_string()),
        None if state.is_idle() => StatusLine::Description(agent.description.clone()),
        None if state.is_transitioning() => StatusLine::Transitioning(state),
        None => StatusLine::Connected,
    };

    VoiceView {
        title: agent.name.clone(),
        orb,
        button,
        status,
        hint: state.is_idle().then_some(IDLE_HINT),
        listening_tip: state.is_active().then_some(LISTENING_TIP),
    }
}
