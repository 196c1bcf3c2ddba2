//! Call lifecycle driven by user presses and SDK callbacks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn};

use crate::{AgentProfile, AgentState, SessionRequest, VoiceError, VoiceEvent};
use crate::volume::{VolumeLevels, VolumeMonitor, VolumeSource};

/// Shown when microphone access is refused.
pub const PERMISSION_DENIED_MESSAGE: &str = "Please enable microphone permissions in your browser.";

const EVENT_BUFFER: usize = 32;

pub trait MicrophoneAccess {
    async fn request_permission(&self) -> Result<(), VoiceError>;
}

/// The real-time voice SDK as seen by the controller.
pub trait VoiceTransport {
    /// Open a session. SDK callbacks must be forwarded to `events`.
    async fn start_session(
        &mut self,
        request: SessionRequest,
        events: mpsc::Sender<VoiceEvent>,
    ) -> Result<(), VoiceError>;

    fn end_session(&mut self);

    fn volume_source(&self) -> Arc<dyn VolumeSource>;
}

pub struct VoiceSessionController<M, T> {
    microphone: M,
    transport: T,
    agent: AgentProfile,
    state: AgentState,
    error_message: Option<String>,
    events_tx: mpsc::Sender<VoiceEvent>,
    events_rx: mpsc::Receiver<VoiceEvent>,
    state_change: broadcast::Sender<AgentState>,
    volume_interval: Duration,
    volume: Option<VolumeMonitor>,
}

impl<M, T> VoiceSessionController<M, T>
where
    M: MicrophoneAccess,
    T: VoiceTransport,
{
    pub fn new(microphone: M, transport: T, agent: AgentProfile, volume_interval: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let (state_change, _) = broadcast::channel(16);
        Self {
            microphone,
            transport,
            agent,
            state: AgentState::Disconnected,
            error_message: None,
            events_tx,
            events_rx,
            state_change,
            volume_interval,
            volume: None,
        }
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn agent(&self) -> &AgentProfile {
        &self.agent
    }

    pub fn on_state_change(&self) -> broadcast::Receiver<AgentState> {
        self.state_change.subscribe()
    }

    /// Normalized volume levels while a call is connected.
    pub fn volume_levels(&self) -> Option<watch::Receiver<VolumeLevels>> {
        self.volume.as_ref().map(VolumeMonitor::subscribe)
    }

    /// A press of the call button: start when idle, hang up when connected,
    /// ignored while a transition is in flight.
    pub async fn handle_call(&mut self) {
        if self.state.is_idle() {
            self.set_state(AgentState::Connecting);
            self.start_conversation().await;
        } else if self.state.is_active() {
            self.transport.end_session();
            self.set_state(AgentState::Disconnected);
        } else {
            debug!(state = %self.state, "call button pressed while transitioning");
        }
    }

    async fn start_conversation(&mut self) {
        self.error_message = None;
        self.reset_events();

        if let Err(err) = self.microphone.request_permission().await {
            warn!(error = %err, "microphone unavailable");
            self.set_state(AgentState::Disconnected);
            if err == VoiceError::PermissionDenied {
                self.error_message = Some(PERMISSION_DENIED_MESSAGE.to_string());
            }
            return;
        }

        let request = self.agent.session_request();
        if let Err(err) = self
            .transport
            .start_session(request, self.events_tx.clone())
            .await
        {
            warn!(error = %err, "failed to start voice session");
            self.set_state(AgentState::Disconnected);
        }
    }

    /// Each session gets its own channel; callbacks from an earlier session
    /// are dropped along with the old receiver.
    fn reset_events(&mut self) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        self.events_tx = events_tx;
        let mut stale = std::mem::replace(&mut self.events_rx, events_rx);
        stale.close();

        let mut discarded = 0;
        while stale.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            debug!(discarded, "dropped events from previous session");
        }
    }

    /// Apply every event already queued, without waiting.
    pub fn process_pending_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next SDK event and apply it.
    pub async fn next_event(&mut self) -> Option<VoiceEvent> {
        let event = self.events_rx.recv().await?;
        self.apply_event(event.clone());
        Some(event)
    }

    fn apply_event(&mut self, event: VoiceEvent) {
        match event {
            VoiceEvent::StatusChanged(status) => self.set_state(status),
            VoiceEvent::Connected => info!(agent = %self.agent.agent_id, "connected to voice agent"),
            VoiceEvent::Disconnected => info!(agent = %self.agent.agent_id, "disconnected from voice agent"),
            VoiceEvent::Message(message) => debug!(%message, "voice message"),
            VoiceEvent::Error(error) => {
                warn!(%error, "voice agent error");
                self.set_state(AgentState::Disconnected);
            }
        }
    }

    fn set_state(&mut self, state: AgentState) {
        if self.state == state {
            return;
        }
        info!(from = %self.state, to = %state, "voice state changing");
        self.state = state;

        if state.is_active() {
            if self.volume.is_none() {
                let source = self.transport.volume_source();
                self.volume = Some(VolumeMonitor::spawn(source, self.volume_interval));
            }
        } else if let Some(monitor) = self.volume.take() {
            monitor.stop();
        }

        // No receivers is fine.
        let _ = self.state_change.send(state);
    }
}
