//! Adapter runtime integration.
//!
//! Bridges the synchronous game loop with the async TCP server.

use std::net::SocketAddr;

use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot};
use tracing::error;

use picture_puzzle_core::types::{
    Direction, GameType, Point, PointerPhase, SessionCommand, Size,
};

use crate::protocol::{
    AckMessage, CompletionMessage, ErrorMessage, ObservationMessage, WelcomeMessage,
};
use crate::server::{run_server, ServerConfig};

/// Command delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

/// Slide target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideTarget {
    Position(usize),
    Direction(Direction),
}

/// Command payload, already validated against the wire vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundPayload {
    /// Send an observation to the requesting client only
    SnapshotRequest,
    Load {
        puzzle_id: String,
        category: String,
        game_type: GameType,
        difficulty: u8,
        image: Size,
        container: Size,
    },
    ImageFailed {
        reason: String,
    },
    Command(SessionCommand),
    Configure {
        game_type: GameType,
        difficulty: u8,
    },
    Resize(Size),
    Slide(SlideTarget),
    Pointer {
        phase: PointerPhase,
        point: Point,
    },
    CompletionResult {
        success: bool,
        message: Option<String>,
    },
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClientWelcome { client_id: usize, welcome: WelcomeMessage },
    ToClientAck { client_id: usize, ack: AckMessage },
    ToClientError { client_id: usize, err: ErrorMessage },
    ToClientObservation { client_id: usize, obs: ObservationMessage },
    BroadcastObservation { obs: ObservationMessage },
    BroadcastCompletion { completion: CompletionMessage },
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    addr: SocketAddr,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl Adapter {
    /// Start the server on a background runtime and wait until it listens.
    pub fn start(config: ServerConfig) -> anyhow::Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let (ready_tx, ready_rx) = oneshot::channel();

        let rt = Runtime::new()?;
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await {
                error!(error = %e, "Host bridge server stopped");
            }
        });
        let addr = rt.block_on(ready_rx)?;

        Ok(Self {
            _rt: rt,
            addr,
            cmd_rx,
            out_tx,
        })
    }

    /// Start the adapter from environment variables.
    pub fn start_from_env() -> anyhow::Result<Self> {
        Self::start(ServerConfig::from_env())
    }

    /// Address the server is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    /// Sender for collaborators that emit messages on their own (completion recorder)
    pub fn outbound(&self) -> mpsc::UnboundedSender<OutboundMessage> {
        self.out_tx.clone()
    }
}
