//! Protocol module - JSON message types for the host bridge
//!
//! Line-delimited JSON. Every message carries `type` and `seq`; messages sent by
//! the engine also carry `ts` (milliseconds since the Unix epoch).

use serde::{Deserialize, Serialize};

use picture_puzzle_core::{BoardSnapshot, CompletionEvent, SessionSnapshot};

pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Host -> Engine Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// First message on every connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    pub seq: u64,
    pub client: ClientInfo,
}

/// The host's image is ready; (re)build the puzzle around it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadMessage {
    pub seq: u64,
    #[serde(default)]
    pub puzzle_id: String,
    #[serde(default)]
    pub category: String,
    pub game_type: String,
    pub difficulty: u8,
    pub image: Dimensions,
    pub container: Dimensions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFailedMessage {
    pub seq: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Lifecycle command: `start`, `pause`, `resume`, `stop`, `playAgain`, `close`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    pub seq: u64,
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigureMessage {
    pub seq: u64,
    pub game_type: String,
    pub difficulty: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeMessage {
    pub seq: u64,
    pub container: Dimensions,
}

/// Slide a tile, either by board position or by direction (`up`, `down`,
/// `left`, `right`). Exactly one of the two is expected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideMessage {
    pub seq: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerMessage {
    pub seq: u64,
    pub phase: String,
    pub x: f32,
    pub y: f32,
}

/// The host's answer from its completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResultMessage {
    pub seq: u64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Any inbound message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Load(LoadMessage),
    ImageFailed(ImageFailedMessage),
    Command(CommandMessage),
    Configure(ConfigureMessage),
    Resize(ResizeMessage),
    Slide(SlideMessage),
    Pointer(PointerMessage),
    CompletionResult(CompletionResultMessage),
    Unknown(UnknownMessage),
}

impl ParsedMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ParsedMessage::Hello(m) => m.seq,
            ParsedMessage::Load(m) => m.seq,
            ParsedMessage::ImageFailed(m) => m.seq,
            ParsedMessage::Command(m) => m.seq,
            ParsedMessage::Configure(m) => m.seq,
            ParsedMessage::Resize(m) => m.seq,
            ParsedMessage::Slide(m) => m.seq,
            ParsedMessage::Pointer(m) => m.seq,
            ParsedMessage::CompletionResult(m) => m.seq,
            ParsedMessage::Unknown(m) => m.seq,
        }
    }
}

/// A well-formed object whose `type` is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
    pub msg_type: Option<String>,
}

// ============== Engine -> Host Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompletionType {
    #[serde(rename = "completion")]
    Completion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    Ok,
}

/// Sent after the engine handled a command. `applied` is false when the command
/// was valid but ignored in the current state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
    pub applied: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    SeqOutOfOrder,
    InvalidMessage,
    InvalidCommand,
    InvalidDifficulty,
    Backpressure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectObs {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<picture_puzzle_core::types::Rect> for RectObs {
    fn from(r: picture_puzzle_core::types::Rect) -> Self {
        Self {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileObs {
    pub value: u16,
    pub position: usize,
    pub rect: RectObs,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceObs {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub placed: bool,
    pub z: usize,
}

/// Session state for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub puzzle_id: String,
    pub category: String,
    pub game_type: String,
    pub difficulty: u8,
    pub state: String,
    pub playable: bool,
    pub moves: u32,
    pub elapsed_seconds: u32,
    pub best_time: Option<u32>,
    pub container: Dimensions,
    pub board_bounds: Option<RectObs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiles: Option<Vec<TileObs>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blank_position: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pieces: Option<Vec<PieceObs>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dragging: Option<usize>,
}

/// Forwarded completion event; the host answers with `completion_result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionMessage {
    #[serde(rename = "type")]
    pub msg_type: CompletionType,
    pub seq: u64,
    pub ts: u64,
    pub puzzle_id: String,
    pub category: String,
    pub game_type: String,
    pub difficulty: u8,
    pub time_in_seconds: u32,
    pub moves: u32,
}

// ============== Parsing ==============

pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    enum InboundMessage {
        Hello(HelloMessage),
        Load(LoadMessage),
        ImageFailed(ImageFailedMessage),
        Command(CommandMessage),
        Configure(ConfigureMessage),
        Resize(ResizeMessage),
        Slide(SlideMessage),
        Pointer(PointerMessage),
        CompletionResult(CompletionResultMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(m) => Ok(match m {
            InboundMessage::Hello(m) => ParsedMessage::Hello(m),
            InboundMessage::Load(m) => ParsedMessage::Load(m),
            InboundMessage::ImageFailed(m) => ParsedMessage::ImageFailed(m),
            InboundMessage::Command(m) => ParsedMessage::Command(m),
            InboundMessage::Configure(m) => ParsedMessage::Configure(m),
            InboundMessage::Resize(m) => ParsedMessage::Resize(m),
            InboundMessage::Slide(m) => ParsedMessage::Slide(m),
            InboundMessage::Pointer(m) => ParsedMessage::Pointer(m),
            InboundMessage::CompletionResult(m) => ParsedMessage::CompletionResult(m),
        }),
        Err(e) => {
            // An unknown type is a protocol-level error, not a JSON error.
            #[derive(Debug, Deserialize)]
            struct TypeOnly {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            match serde_json::from_str::<TypeOnly>(json) {
                Ok(t) if !is_known_type(t.msg_type.as_deref()) => {
                    Ok(ParsedMessage::Unknown(UnknownMessage {
                        seq: t.seq.unwrap_or(0),
                        msg_type: t.msg_type,
                    }))
                }
                _ => Err(e),
            }
        }
    }
}

fn is_known_type(t: Option<&str>) -> bool {
    matches!(
        t,
        Some(
            "hello"
                | "load"
                | "image_failed"
                | "command"
                | "configure"
                | "resize"
                | "slide"
                | "pointer"
                | "completion_result"
        )
    )
}

/// Best-effort `seq` lookup for lines that failed to parse
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let value: serde_json::Value = serde_json::from_str(s).ok()?;
    value.get("seq")?.as_u64()
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str) -> HelloMessage {
    HelloMessage {
        seq,
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    }
}

/// Create a welcome message
pub fn create_welcome(seq: u64, protocol_version: &str, client_id: u64) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        client_id,
    }
}

/// Create an ack message
pub fn create_ack(seq: u64, applied: bool) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status: AckStatus::Ok,
        applied,
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Build an observation from a session snapshot
pub fn build_observation(snapshot: &SessionSnapshot, seq: u64) -> ObservationMessage {
    let mut obs = ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        puzzle_id: snapshot.puzzle_id.clone(),
        category: snapshot.category.clone(),
        game_type: snapshot.game_type.as_str().to_string(),
        difficulty: snapshot.difficulty,
        state: snapshot.state.as_str().to_string(),
        playable: snapshot.playable(),
        moves: snapshot.moves,
        elapsed_seconds: snapshot.elapsed_seconds,
        best_time: snapshot.best_time,
        container: Dimensions {
            width: snapshot.container.width,
            height: snapshot.container.height,
        },
        board_bounds: snapshot.board_bounds.map(RectObs::from),
        tiles: None,
        blank_position: None,
        pieces: None,
        dragging: None,
    };

    match &snapshot.board {
        BoardSnapshot::Empty => {}
        BoardSnapshot::Slide {
            tiles,
            blank_position,
            ..
        } => {
            obs.tiles = Some(
                tiles
                    .iter()
                    .map(|t| TileObs {
                        value: t.value,
                        position: t.position,
                        rect: t.rect.into(),
                    })
                    .collect(),
            );
            obs.blank_position = Some(*blank_position);
        }
        BoardSnapshot::Jigsaw {
            pieces, dragging, ..
        } => {
            obs.pieces = Some(
                pieces
                    .iter()
                    .map(|p| PieceObs {
                        id: p.id,
                        x: p.rect.x,
                        y: p.rect.y,
                        placed: p.placed,
                        z: p.z,
                    })
                    .collect(),
            );
            obs.dragging = *dragging;
        }
    }

    obs
}

/// Build a completion message from the recorder event
pub fn build_completion(event: &CompletionEvent, seq: u64) -> CompletionMessage {
    CompletionMessage {
        msg_type: CompletionType::Completion,
        seq,
        ts: current_timestamp_ms(),
        puzzle_id: event.puzzle_id.clone(),
        category: event.category.clone(),
        game_type: event.game_type.as_str().to_string(),
        difficulty: event.difficulty,
        time_in_seconds: event.time_in_seconds,
        moves: event.moves,
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use picture_puzzle_core::types::{GameType, Size};
    use picture_puzzle_core::{GameSession, SessionConfig};

    #[test]
    fn test_parse_load() {
        let line = r#"{"type":"load","seq":2,"puzzle_id":"p1","category":"cats","game_type":"jigsaw","difficulty":4,"image":{"width":640,"height":480},"container":{"width":1280,"height":720}}"#;
        match parse_message(line).unwrap() {
            ParsedMessage::Load(m) => {
                assert_eq!(m.seq, 2);
                assert_eq!(m.game_type, "jigsaw");
                assert_eq!(m.difficulty, 4);
                assert_eq!(m.image.width, 640.0);
                assert_eq!(m.container.height, 720.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_pointer_and_slide() {
        let p = parse_message(r#"{"type":"pointer","seq":5,"phase":"down","x":10.5,"y":20}"#).unwrap();
        assert!(matches!(p, ParsedMessage::Pointer(ref m) if m.phase == "down" && m.x == 10.5));

        let s = parse_message(r#"{"type":"slide","seq":6,"position":7}"#).unwrap();
        assert!(matches!(s, ParsedMessage::Slide(ref m) if m.position == Some(7) && m.direction.is_none()));
        assert_eq!(s.seq(), 6);
    }

    #[test]
    fn test_parse_command_and_completion_result() {
        let c = parse_message(r#"{"type":"command","seq":3,"action":"playAgain"}"#).unwrap();
        assert!(matches!(c, ParsedMessage::Command(ref m) if m.action == "playAgain"));

        let r = parse_message(r#"{"type":"completion_result","seq":9,"success":true}"#).unwrap();
        assert!(matches!(r, ParsedMessage::CompletionResult(ref m) if m.success));
    }

    #[test]
    fn test_unknown_type_is_not_a_json_error() {
        let m = parse_message(r#"{"type":"teleport","seq":4}"#).unwrap();
        match m {
            ParsedMessage::Unknown(u) => {
                assert_eq!(u.seq, 4);
                assert_eq!(u.msg_type.as_deref(), Some("teleport"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_known_type_with_bad_fields_is_an_error() {
        assert!(parse_message(r#"{"type":"pointer","seq":4,"phase":"down"}"#).is_err());
        assert!(parse_message("not json").is_err());
        assert_eq!(extract_seq_best_effort(r#"{"type":"pointer","seq":4}"#), Some(4));
        assert_eq!(extract_seq_best_effort("garbage"), None);
    }

    #[test]
    fn test_outbound_field_names() {
        let ack = serde_json::to_value(create_ack(3, false)).unwrap();
        assert_eq!(ack["type"], "ack");
        assert_eq!(ack["status"], "ok");
        assert_eq!(ack["applied"], false);

        let err = serde_json::to_value(create_error(4, ErrorCode::SeqOutOfOrder, "late")).unwrap();
        assert_eq!(err["type"], "error");
        assert_eq!(err["code"], "seq_out_of_order");

        let welcome = serde_json::to_value(create_welcome(1, PROTOCOL_VERSION, 7)).unwrap();
        assert_eq!(welcome["type"], "welcome");
        assert_eq!(welcome["protocol_version"], PROTOCOL_VERSION);
    }

    #[test]
    fn test_observation_carries_board() {
        let mut session = GameSession::new(
            SessionConfig::new(GameType::Slide, 3).with_seed(1),
            Size::new(900.0, 900.0),
        )
        .unwrap();
        let obs = serde_json::to_value(build_observation(&session.snapshot(), 1)).unwrap();
        assert_eq!(obs["state"], "initial");
        assert!(obs["board_bounds"].is_null());
        assert!(obs.get("tiles").is_none());

        session.image_ready(Size::new(1.0, 1.0));
        let obs = serde_json::to_value(build_observation(&session.snapshot(), 2)).unwrap();
        assert_eq!(obs["state"], "ready");
        assert_eq!(obs["tiles"].as_array().unwrap().len(), 8);
        assert_eq!(obs["blank_position"], 8);
        assert_eq!(obs["game_type"], "slide");
    }
}
