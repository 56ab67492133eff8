//! Host bridge - drive a puzzle session over a TCP socket with JSON messages
//!
//! A host (the page or app that owns the picture, the puzzle catalogue and the
//! completion endpoint) connects, loads an image, forwards the player's input
//! and receives state observations plus a completion notice when the puzzle is
//! solved.
//!
//! # Protocol Overview
//!
//! The bridge speaks **line-delimited JSON** over TCP:
//!
//! 1. **Connection**: Host connects to the socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Host sends `hello`, engine answers with `welcome` and a
//!    first observation
//! 3. **Commanding**: Host sends `load`, `command`, `slide`, `pointer`, ...;
//!    each is answered with an `ack` whose `applied` flag says whether the
//!    session changed
//! 4. **Observation Streaming**: State changes are broadcast to every
//!    handshaken connection, and once per second while the timer runs
//! 5. **Completion**: On solve the engine broadcasts `completion`; the host
//!    answers with `completion_result`
//!
//! # Message Types
//!
//! ## Host → Engine
//!
//! - **hello**: Handshake with client info
//! - **load**: Image ready, with puzzle id, category, game type, difficulty and
//!   image/container dimensions
//! - **image_failed**: The image could not be loaded
//! - **command**: `start`, `pause`, `resume`, `stop`, `playAgain`, `close`
//! - **configure**: Change game type and difficulty
//! - **resize**: New container dimensions
//! - **slide**: Move a tile by position or direction
//! - **pointer**: Pointer down/move/up in container coordinates
//! - **completion_result**: Outcome of recording a completion
//!
//! ## Engine → Host
//!
//! - **welcome**, **ack**, **error**, **observation**, **completion**
//!
//! # Environment Variables
//!
//! - `PUZZLE_HOST_ADDR`: Bind address (default: "127.0.0.1")
//! - `PUZZLE_HOST_PORT`: Port number (default: 7878)
//! - `PUZZLE_HOST_MAX_PENDING`: Commands buffered for the game loop before
//!   `backpressure` errors (default: 16)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Host -> Engine: {"type":"hello","seq":1,"client":{"name":"web","version":"1.0.0"}}
//! Engine -> Host: {"type":"welcome","seq":1,"ts":1700000000000,"protocol_version":"1.0.0","client_id":1}
//! Host -> Engine: {"type":"load","seq":2,"puzzle_id":"p-7","category":"birds","game_type":"jigsaw","difficulty":4,"image":{"width":800,"height":600},"container":{"width":1280,"height":720}}
//! Engine -> Host: {"type":"ack","seq":2,"ts":1700000000010,"status":"ok","applied":true}
//! Engine -> Host: {"type":"observation","seq":3,"ts":1700000000010,"state":"ready",...}
//! Host -> Engine: {"type":"command","seq":3,"action":"start"}
//! ```
//!
//! # Implementation
//!
//! - [`server`] runs on **tokio**; [`Adapter`] owns the runtime so the game
//!   loop stays synchronous
//! - [`HostBridge`] applies commands to the session on the game-loop thread
//! - See [`protocol`] for message structure definitions
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"client":{"name":"nc","version":"0"}}
//! ```

pub mod bridge;
pub mod protocol;
pub mod runtime;
pub mod server;

pub use picture_puzzle_core as core;
pub use picture_puzzle_types as types;

pub use bridge::{ChannelRecorder, HostBridge, SeqCounter, OBSERVATION_INTERVAL_MS};
pub use protocol::*;
pub use runtime::{Adapter, InboundCommand, InboundPayload, OutboundMessage, SlideTarget};
pub use server::{map_message, run_server, ServerConfig};
