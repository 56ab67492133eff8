//! Terminal input module (session-facing).
//!
//! Maps `crossterm` key events into [`InputAction`]s and mouse events into
//! pointer gestures in container coordinates. Nothing here touches the
//! session; the game loop decides what each action means in the current state.

pub mod map;
pub mod pointer;

pub use picture_puzzle_types as types;

pub use map::{handle_key_event, should_quit, InputAction};
pub use pointer::PointerMapper;
