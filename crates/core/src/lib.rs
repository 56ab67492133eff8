//! Core puzzle logic - pure, deterministic, and testable
//!
//! This crate turns an image's dimensions into a playable picture puzzle, tracks
//! player interaction, detects completion, and guarantees every shuffled board
//! can be solved. It has no UI, networking, or file I/O; hosts drive it with
//! events and read back a [`SessionSnapshot`].
//!
//! # Module Structure
//!
//! - [`session`]: the lifecycle state machine that owns everything below
//! - [`slide`]: N x N sliding tiles, parity check and rejection-sampling shuffle
//! - [`jigsaw`]: free-drag pieces, scatter placement, single drag slot, snap-on-drop
//! - [`geometry`]: fitting the board into the host container
//! - [`board`]: the active variant behind one type
//! - [`timer`]: elapsed-time clock and move counter
//! - [`best_time`]: minimum solve time per game type and grid size
//! - [`recorder`]: the outbound completion call
//! - [`rng`]: seedable randomness
//!
//! # Example
//!
//! ```
//! use picture_puzzle_core::{GameSession, SessionConfig};
//! use picture_puzzle_types::{GameType, SessionState, Size};
//!
//! let config = SessionConfig::new(GameType::Slide, 3).with_seed(7);
//! let mut session = GameSession::new(config, Size::new(800.0, 600.0)).unwrap();
//!
//! session.image_ready(Size::new(640.0, 480.0));
//! assert_eq!(session.state(), SessionState::Ready);
//!
//! session.start();
//! assert_eq!(session.state(), SessionState::Playing);
//! assert!(!session.board().unwrap().is_solved());
//! ```
//!
//! # Timing
//!
//! The clock only moves through [`GameSession::tick`](session::GameSession::tick),
//! which the host calls with the milliseconds elapsed since its previous call.

pub mod best_time;
pub mod board;
pub mod error;
pub mod geometry;
pub mod jigsaw;
pub mod recorder;
pub mod rng;
pub mod session;
pub mod slide;
pub mod snapshot;
pub mod timer;

pub use picture_puzzle_types as types;

// Re-export commonly used types for convenience
pub use best_time::{BestTimeCache, BestTimeKey, BestTimeStore, MemoryBestTimes};
pub use board::PuzzleBoard;
pub use error::{RecordError, SessionError, StoreError};
pub use geometry::{BoardGeometry, FitLimits};
pub use jigsaw::{DragSession, DropOutcome, JigsawBoard, JigsawPiece};
pub use recorder::{CompletionEvent, CompletionRecorder, LogRecorder, RecordAck};
pub use rng::PuzzleRng;
pub use session::{GameSession, SessionConfig};
pub use slide::{count_inversions, is_solvable_arrangement, SlideBoard};
pub use snapshot::{BoardSnapshot, PieceSnapshot, SessionSnapshot, TileSnapshot};
pub use timer::{GameClock, MoveCounter};
