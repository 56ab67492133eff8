//! Game-loop side of the host bridge
//!
//! [`HostBridge`] owns the session, applies [`InboundCommand`]s to it and turns
//! the results into outbound messages. It never touches the async runtime; the
//! loop hands its output to [`Adapter::send`](crate::Adapter::send).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use picture_puzzle_core::types::SessionState;
use picture_puzzle_core::{
    CompletionEvent, CompletionRecorder, GameSession, RecordAck, RecordError,
};

use crate::protocol::{build_completion, build_observation, create_ack, create_error, ErrorCode};
use crate::runtime::{InboundCommand, InboundPayload, OutboundMessage, SlideTarget};

/// Sequence numbers for engine-originated messages (observations, completions)
#[derive(Debug, Clone, Default)]
pub struct SeqCounter(Arc<AtomicU64>);

impl SeqCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Completion recorder that forwards the event to every connected host.
///
/// Delivery is fire-and-forget; the host answers later with `completion_result`.
#[derive(Debug, Clone)]
pub struct ChannelRecorder {
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    seq: SeqCounter,
}

impl ChannelRecorder {
    pub fn new(out_tx: mpsc::UnboundedSender<OutboundMessage>, seq: SeqCounter) -> Self {
        Self { out_tx, seq }
    }
}

impl CompletionRecorder for ChannelRecorder {
    fn record_completion(&mut self, event: &CompletionEvent) -> Result<RecordAck, RecordError> {
        let completion = build_completion(event, self.seq.next());
        self.out_tx
            .send(OutboundMessage::BroadcastCompletion { completion })
            .map_err(|_| RecordError::Disconnected)?;
        Ok(RecordAck { success: true })
    }
}

/// Observations stream once per this many milliseconds while playing
pub const OBSERVATION_INTERVAL_MS: u32 = 1000;

pub struct HostBridge {
    session: GameSession,
    seq: SeqCounter,
    since_observation_ms: u32,
}

impl HostBridge {
    pub fn new(session: GameSession, seq: SeqCounter) -> Self {
        Self {
            session,
            seq,
            since_observation_ms: 0,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Apply one command. Returns the ack (or error) for the sender followed by
    /// an observation: broadcast when the command changed something, sent to the
    /// sender alone otherwise.
    pub fn handle(&mut self, cmd: InboundCommand) -> Vec<OutboundMessage> {
        let InboundCommand {
            client_id,
            seq,
            payload,
        } = cmd;

        if payload == InboundPayload::SnapshotRequest {
            return vec![OutboundMessage::ToClientObservation {
                client_id,
                obs: build_observation(&self.session.snapshot(), self.seq.next()),
            }];
        }

        let applied = match self.apply(payload) {
            Ok(applied) => applied,
            Err(e) => {
                return vec![OutboundMessage::ToClientError {
                    client_id,
                    err: create_error(seq, ErrorCode::InvalidDifficulty, &e.to_string()),
                }];
            }
        };

        let obs = build_observation(&self.session.snapshot(), self.seq.next());
        let observation = if applied {
            self.since_observation_ms = 0;
            OutboundMessage::BroadcastObservation { obs }
        } else {
            OutboundMessage::ToClientObservation { client_id, obs }
        };
        vec![
            OutboundMessage::ToClientAck {
                client_id,
                ack: create_ack(seq, applied),
            },
            observation,
        ]
    }

    /// Advance the session clock. Yields the periodic observation while playing.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<OutboundMessage> {
        self.session.tick(elapsed_ms);
        if self.session.state() != SessionState::Playing {
            self.since_observation_ms = 0;
            return None;
        }
        self.since_observation_ms = self.since_observation_ms.saturating_add(elapsed_ms);
        if self.since_observation_ms < OBSERVATION_INTERVAL_MS {
            return None;
        }
        self.since_observation_ms = 0;
        Some(OutboundMessage::BroadcastObservation {
            obs: build_observation(&self.session.snapshot(), self.seq.next()),
        })
    }

    fn apply(&mut self, payload: InboundPayload) -> Result<bool, picture_puzzle_core::SessionError> {
        let s = &mut self.session;
        let applied = match payload {
            InboundPayload::SnapshotRequest => false,
            InboundPayload::Load {
                puzzle_id,
                category,
                game_type,
                difficulty,
                image,
                container,
            } => {
                s.configure(game_type, difficulty)?;
                s.set_puzzle(puzzle_id, category);
                s.resize(container);
                s.image_ready(image)
            }
            InboundPayload::ImageFailed { reason } => {
                s.image_failed(&reason);
                false
            }
            InboundPayload::Command(command) => s.apply_command(command),
            InboundPayload::Configure {
                game_type,
                difficulty,
            } => s.configure(game_type, difficulty)?,
            InboundPayload::Resize(container) => s.resize(container),
            InboundPayload::Slide(SlideTarget::Position(p)) => s.slide_move(p),
            InboundPayload::Slide(SlideTarget::Direction(d)) => s.slide_direction(d),
            InboundPayload::Pointer { phase, point } => s.pointer(phase, point),
            InboundPayload::CompletionResult { success, message } => {
                if success {
                    info!("Host recorded completion");
                } else {
                    warn!(message = message.as_deref().unwrap_or(""), "Host failed to record completion");
                }
                false
            }
        };
        debug!(applied, state = %s.state(), "Applied host command");
        Ok(applied)
    }
}
