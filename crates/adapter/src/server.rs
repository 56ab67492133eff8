//! TCP server for the host bridge
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, warn};

use picture_puzzle_core::types::{
    Direction, GameType, Point, PointerPhase, SessionCommand, Size,
};

use crate::protocol::*;
use crate::runtime::{InboundCommand, InboundPayload, OutboundMessage, SlideTarget};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: 16,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("PUZZLE_HOST_ADDR").unwrap_or(defaults.host);
        let port = env::var("PUZZLE_HOST_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_commands = env::var("PUZZLE_HOST_MAX_PENDING")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_pending_commands);

        Self {
            host,
            port,
            protocol_version: defaults.protocol_version,
            max_pending_commands,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }
}

/// Shared server state
pub struct ServerState {
    config: ServerConfig,
    clients: RwLock<Vec<ClientHandle>>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            clients: RwLock::new(Vec::new()),
        }
    }

    async fn is_handshaken(&self, client_id: usize) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| c.handshaken)
            .unwrap_or(false)
    }

    /// Record `seq` if it is strictly greater than the client's last one.
    async fn check_and_update_seq(&self, client_id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return true;
        };
        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }

    async fn send_to(&self, client_id: usize, msg: ClientOutbound) {
        let clients = self.clients.read().await;
        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
            let _ = c.tx.send(msg);
        }
    }

    async fn broadcast(&self, msg: ClientOutbound) {
        let clients = self.clients.read().await;
        for c in clients.iter().filter(|c| c.handshaken) {
            let _ = c.tx.send(msg.clone());
        }
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: usize,
    pub addr: SocketAddr,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<ClientOutbound>,
}

#[derive(Debug, Clone)]
pub enum ClientOutbound {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(ObservationMessage),
    Completion(CompletionMessage),
}

impl ClientOutbound {
    fn write_json(&self, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        match self {
            ClientOutbound::Welcome(m) => serde_json::to_writer(buf, m),
            ClientOutbound::Ack(m) => serde_json::to_writer(buf, m),
            ClientOutbound::Error(m) => serde_json::to_writer(buf, m),
            ClientOutbound::Observation(m) => serde_json::to_writer(buf, m),
            ClientOutbound::Completion(m) => serde_json::to_writer(buf, m),
        }
    }
}

/// Start the TCP server
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr).await?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, "Host bridge listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(config));
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match msg {
                    OutboundMessage::ToClientWelcome { client_id, welcome } => {
                        state.send_to(client_id, ClientOutbound::Welcome(welcome)).await;
                    }
                    OutboundMessage::ToClientAck { client_id, ack } => {
                        state.send_to(client_id, ClientOutbound::Ack(ack)).await;
                    }
                    OutboundMessage::ToClientError { client_id, err } => {
                        state.send_to(client_id, ClientOutbound::Error(err)).await;
                    }
                    OutboundMessage::ToClientObservation { client_id, obs } => {
                        state.send_to(client_id, ClientOutbound::Observation(obs)).await;
                    }
                    OutboundMessage::BroadcastObservation { obs } => {
                        state.broadcast(ClientOutbound::Observation(obs)).await;
                    }
                    OutboundMessage::BroadcastCompletion { completion } => {
                        state.broadcast(ClientOutbound::Completion(completion)).await;
                    }
                }
            }
        });
    }

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        info!(client_id, %addr, "Client connected");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, addr, client_id, state, command_tx).await {
                warn!(client_id, error = %e, "Client error");
            }
            info!(client_id, "Client disconnected");
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<ClientOutbound>();
    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            addr,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
    }

    // Spawn task to write messages to client
    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(msg) = rx.recv().await {
            buf.clear();
            if msg.write_json(&mut buf).is_err() {
                continue;
            }
            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let send_error = |seq: u64, code: ErrorCode, message: &str| {
        let _ = tx.send(ClientOutbound::Error(create_error(seq, code, message)));
    };

    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let parsed = match parse_message(trimmed) {
            Ok(parsed) => parsed,
            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                send_error(seq, ErrorCode::InvalidMessage, &format!("JSON parse error: {}", e));
                continue;
            }
        };
        let seq = parsed.seq();
        let handshaken = state.is_handshaken(client_id).await;

        if let ParsedMessage::Hello(hello) = &parsed {
            if handshaken && !state.check_and_update_seq(client_id, seq).await {
                send_error(seq, ErrorCode::SeqOutOfOrder, "seq must be strictly increasing");
                continue;
            }
            {
                let mut clients = state.clients.write().await;
                if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                    client.handshaken = true;
                    client.last_seq = Some(seq);
                }
            }
            debug!(client_id, name = %hello.client.name, version = %hello.client.version, "Hello");
            let welcome =
                create_welcome(seq, &state.config.protocol_version, client_id as u64);
            let _ = tx.send(ClientOutbound::Welcome(welcome));
            let _ = command_tx.try_send(InboundCommand {
                client_id,
                seq,
                payload: InboundPayload::SnapshotRequest,
            });
            continue;
        }

        if !handshaken {
            send_error(seq, ErrorCode::HandshakeRequired, "Send hello first");
            continue;
        }
        if !state.check_and_update_seq(client_id, seq).await {
            send_error(seq, ErrorCode::SeqOutOfOrder, "seq must be strictly increasing");
            continue;
        }

        let payload = match map_message(&parsed) {
            Ok(payload) => payload,
            Err((code, message)) => {
                send_error(seq, code, &message);
                continue;
            }
        };

        // Backpressure: bounded queue. The ack comes from the game loop.
        if command_tx
            .try_send(InboundCommand {
                client_id,
                seq,
                payload,
            })
            .is_err()
        {
            send_error(seq, ErrorCode::Backpressure, "Command queue is full");
        }
    }

    {
        let mut clients = state.clients.write().await;
        clients.retain(|c| c.id != client_id);
    }
    drop(tx);
    let _ = write_task.await;
    Ok(())
}

/// Translate a parsed wire message into a game-loop payload.
pub fn map_message(msg: &ParsedMessage) -> Result<InboundPayload, (ErrorCode, String)> {
    let parse_game_type = |s: &str| {
        GameType::from_str(s)
            .ok_or_else(|| (ErrorCode::InvalidCommand, format!("Unknown game type: {}", s)))
    };
    let check_difficulty = |game_type: GameType, difficulty: u8| {
        if game_type.is_valid_difficulty(difficulty) {
            Ok(difficulty)
        } else {
            let (min, max) = game_type.difficulty_range();
            Err((
                ErrorCode::InvalidDifficulty,
                format!("difficulty must be {}..={} for {}", min, max, game_type),
            ))
        }
    };

    match msg {
        ParsedMessage::Load(m) => {
            let game_type = parse_game_type(&m.game_type)?;
            Ok(InboundPayload::Load {
                puzzle_id: m.puzzle_id.clone(),
                category: m.category.clone(),
                game_type,
                difficulty: check_difficulty(game_type, m.difficulty)?,
                image: Size::new(m.image.width, m.image.height),
                container: Size::new(m.container.width, m.container.height),
            })
        }
        ParsedMessage::ImageFailed(m) => Ok(InboundPayload::ImageFailed {
            reason: m.reason.clone().unwrap_or_default(),
        }),
        ParsedMessage::Command(m) => SessionCommand::from_str(&m.action)
            .map(InboundPayload::Command)
            .ok_or_else(|| (ErrorCode::InvalidCommand, format!("Unknown action: {}", m.action))),
        ParsedMessage::Configure(m) => {
            let game_type = parse_game_type(&m.game_type)?;
            Ok(InboundPayload::Configure {
                game_type,
                difficulty: check_difficulty(game_type, m.difficulty)?,
            })
        }
        ParsedMessage::Resize(m) => Ok(InboundPayload::Resize(Size::new(
            m.container.width,
            m.container.height,
        ))),
        ParsedMessage::Slide(m) => match (m.position, m.direction.as_deref()) {
            (Some(position), None) => Ok(InboundPayload::Slide(SlideTarget::Position(position))),
            (None, Some(direction)) => Direction::from_str(direction)
                .map(|d| InboundPayload::Slide(SlideTarget::Direction(d)))
                .ok_or_else(|| {
                    (ErrorCode::InvalidCommand, format!("Unknown direction: {}", direction))
                }),
            _ => Err((
                ErrorCode::InvalidCommand,
                "slide needs exactly one of position or direction".to_string(),
            )),
        },
        ParsedMessage::Pointer(m) => PointerPhase::from_str(&m.phase)
            .map(|phase| InboundPayload::Pointer {
                phase,
                point: Point::new(m.x, m.y),
            })
            .ok_or_else(|| (ErrorCode::InvalidCommand, format!("Unknown phase: {}", m.phase))),
        ParsedMessage::CompletionResult(m) => Ok(InboundPayload::CompletionResult {
            success: m.success,
            message: m.message.clone(),
        }),
        ParsedMessage::Hello(_) => Ok(InboundPayload::SnapshotRequest),
        ParsedMessage::Unknown(u) => Err((
            ErrorCode::InvalidMessage,
            format!(
                "Unknown message type: {}",
                u.msg_type.as_deref().unwrap_or("<missing>")
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ParsedMessage {
        parse_message(line).unwrap()
    }

    #[test]
    fn test_map_load() {
        let payload = map_message(&parse(
            r#"{"type":"load","seq":1,"game_type":"slide","difficulty":4,"image":{"width":4,"height":3},"container":{"width":800,"height":600}}"#,
        ))
        .unwrap();
        assert_eq!(
            payload,
            InboundPayload::Load {
                puzzle_id: String::new(),
                category: String::new(),
                game_type: GameType::Slide,
                difficulty: 4,
                image: Size::new(4.0, 3.0),
                container: Size::new(800.0, 600.0),
            }
        );
    }

    #[test]
    fn test_map_rejects_out_of_range_difficulty() {
        let err = map_message(&parse(
            r#"{"type":"configure","seq":1,"game_type":"slide","difficulty":2}"#,
        ))
        .unwrap_err();
        assert_eq!(err.0, ErrorCode::InvalidDifficulty);

        let err = map_message(&parse(
            r#"{"type":"configure","seq":1,"game_type":"sudoku","difficulty":4}"#,
        ))
        .unwrap_err();
        assert_eq!(err.0, ErrorCode::InvalidCommand);
    }

    #[test]
    fn test_map_commands_and_directions() {
        let p = map_message(&parse(r#"{"type":"command","seq":1,"action":"playAgain"}"#)).unwrap();
        assert_eq!(p, InboundPayload::Command(SessionCommand::PlayAgain));

        let p = map_message(&parse(r#"{"type":"slide","seq":2,"direction":"left"}"#)).unwrap();
        assert_eq!(p, InboundPayload::Slide(SlideTarget::Direction(Direction::Left)));

        assert!(map_message(&parse(r#"{"type":"slide","seq":3}"#)).is_err());
        assert!(map_message(&parse(r#"{"type":"command","seq":4,"action":"jump"}"#)).is_err());
    }

    #[test]
    fn test_map_pointer() {
        let p = map_message(&parse(r#"{"type":"pointer","seq":1,"phase":"move","x":3,"y":4}"#))
            .unwrap();
        assert_eq!(
            p,
            InboundPayload::Pointer {
                phase: PointerPhase::Move,
                point: Point::new(3.0, 4.0),
            }
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 7878);
        assert_eq!(config.max_pending_commands, 16);
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:7878");

        let bad = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }
}
