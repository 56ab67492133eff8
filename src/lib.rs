//! Picture puzzle (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so binaries, tests and
//! benches can write `picture_puzzle::{core, adapter, store, term, input, types}`.

pub use picture_puzzle_adapter as adapter;
pub use picture_puzzle_core as core;
pub use picture_puzzle_input as input;
pub use picture_puzzle_store as store;
pub use picture_puzzle_term as term;
pub use picture_puzzle_types as types;
