use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    /// The user or platform refused microphone access.
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("microphone unavailable: {0}")]
    Microphone(String),

    #[error("voice session failed: {0}")]
    Session(String),
}
