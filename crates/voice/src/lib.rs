//! Voice assistant call lifecycle.
//!
//! [`VoiceSessionController`] owns the call state machine. Microphone access
//! and the real-time voice SDK sit behind [`MicrophoneAccess`] and
//! [`VoiceTransport`]; SDK callbacks arrive as [`VoiceEvent`]s on a channel
//! the controller hands to the transport when a session starts.

mod agent;
mod controller;
pub mod display;
mod error;
mod event;
mod state;
pub mod volume;

pub use agent::{AgentProfile, SessionRequest};
pub use controller::{MicrophoneAccess, VoiceSessionController, VoiceTransport, PERMISSION_DENIED_MESSAGE};
pub use display::{render, CallButton, OrbMode, StatusLine, VoiceView};
pub use error::VoiceError;
pub use event::VoiceEvent;
pub use state::AgentState;
pub use volume::{normalize_volume, VolumeLevels, VolumeMonitor, VolumeSource};
