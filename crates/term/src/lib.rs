//! Terminal puzzle renderer.
//!
//! A small rendering layer for playing in a terminal. It renders a
//! [`SessionSnapshot`](crate::core::SessionSnapshot) into a framebuffer of
//! styled cells and flushes only what changed.
//!
//! - [`fb`]: cells, styles and the framebuffer
//! - [`puzzle_view`]: snapshot to framebuffer, pure and testable
//! - [`renderer`]: framebuffer to terminal, diffed

pub mod fb;
pub mod puzzle_view;
pub mod renderer;

pub use picture_puzzle_core as core;
pub use picture_puzzle_types as types;

pub use fb::{format_clock, Cell, CellStyle, FrameBuffer, Rgb};
pub use puzzle_view::{PuzzleView, Viewport, FOOTER_ROWS, HUD_ROWS, UNITS_PER_COL, UNITS_PER_ROW};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
