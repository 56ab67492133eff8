//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, so they can be used by
//! the engine, the terminal front-end and the host bridge alike.
//!
//! # Difficulty
//!
//! Difficulty is the grid dimension `N` (the board is `N x N`):
//!
//! | Game type | Min | Max | Default |
//! |-----------|-----|-----|---------|
//! | `slide`   | 3   | 10  | 3       |
//! | `jigsaw`  | 2   | 12  | 4       |
//!
//! # Geometry constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SNAP_TOLERANCE_RATIO` | 0.3 | Per-axis snap distance, as a fraction of cell width |
//! | `JIGSAW_BOARD_WIDTH_FRAC` | 0.6 | Max share of container width used by a jigsaw board |
//! | `SLIDE_BOARD_WIDTH_FRAC` | 0.9 | Max share of container width used by a slide board |
//! | `BOARD_HEIGHT_FRAC` | 0.9 | Max share of container height used by any board |
//!
//! # Examples
//!
//! ```
//! use picture_puzzle_types::{GameType, SessionCommand, Direction};
//!
//! let game_type = GameType::from_str("Jigsaw").unwrap();
//! assert_eq!(game_type, GameType::Jigsaw);
//! assert!(game_type.is_valid_difficulty(12));
//! assert!(!GameType::Slide.is_valid_difficulty(2));
//!
//! assert_eq!(SessionCommand::from_str("playAgain"), Some(SessionCommand::PlayAgain));
//! assert_eq!(Direction::Up.opposite(), Direction::Down);
//! ```

pub mod geometry;

pub use geometry::{Point, Rect, Size};

/// Smallest sliding-tile grid (3x3, the classic 8-puzzle).
pub const SLIDE_MIN_DIFFICULTY: u8 = 3;

/// Largest sliding-tile grid.
pub const SLIDE_MAX_DIFFICULTY: u8 = 10;

/// Smallest jigsaw grid.
pub const JIGSAW_MIN_DIFFICULTY: u8 = 2;

/// Largest jigsaw grid.
pub const JIGSAW_MAX_DIFFICULTY: u8 = 12;

/// Snap tolerance as a fraction of one cell width.
pub const SNAP_TOLERANCE_RATIO: f32 = 0.3;

/// Jigsaw boards leave room on both sides for scattered pieces.
pub const JIGSAW_BOARD_WIDTH_FRAC: f32 = 0.6;

pub const SLIDE_BOARD_WIDTH_FRAC: f32 = 0.9;

pub const BOARD_HEIGHT_FRAC: f32 = 0.9;

/// Host loop tick interval in milliseconds.
pub const TICK_MS: u32 = 100;

/// The two puzzle variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameType {
    /// N x N sliding tiles with one blank slot
    Slide,
    /// Free-drag pieces that snap onto a board
    Jigsaw,
}

impl GameType {
    /// Parse game type from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use picture_puzzle_types::GameType;
    ///
    /// assert_eq!(GameType::from_str("slide"), Some(GameType::Slide));
    /// assert_eq!(GameType::from_str("JIGSAW"), Some(GameType::Jigsaw));
    /// assert_eq!(GameType::from_str("sudoku"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slide" => Some(GameType::Slide),
            "jigsaw" => Some(GameType::Jigsaw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Slide => "slide",
            GameType::Jigsaw => "jigsaw",
        }
    }

    /// Inclusive range of accepted grid dimensions.
    pub fn difficulty_range(&self) -> (u8, u8) {
        match self {
            GameType::Slide => (SLIDE_MIN_DIFFICULTY, SLIDE_MAX_DIFFICULTY),
            GameType::Jigsaw => (JIGSAW_MIN_DIFFICULTY, JIGSAW_MAX_DIFFICULTY),
        }
    }

    pub fn default_difficulty(&self) -> u8 {
        match self {
            GameType::Slide => 3,
            GameType::Jigsaw => 4,
        }
    }

    pub fn is_valid_difficulty(&self, difficulty: u8) -> bool {
        let (min, max) = self.difficulty_range();
        (min..=max).contains(&difficulty)
    }

    pub fn clamp_difficulty(&self, difficulty: u8) -> u8 {
        let (min, max) = self.difficulty_range();
        difficulty.clamp(min, max)
    }

    /// The other variant.
    pub fn toggled(&self) -> Self {
        match self {
            GameType::Slide => GameType::Jigsaw,
            GameType::Jigsaw => GameType::Slide,
        }
    }

    /// Largest share of the container width a board of this type may use.
    pub fn board_width_frac(&self) -> f32 {
        match self {
            GameType::Slide => SLIDE_BOARD_WIDTH_FRAC,
            GameType::Jigsaw => JIGSAW_BOARD_WIDTH_FRAC,
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session lifecycle states
///
/// ```text
/// initial -> ready -> playing <-> paused
///              ^         |          |
///              |         v          |
///              +----- solved        |
///              +--------------------+ (stop)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Waiting for the image
    Initial,
    /// Board laid out in its solved configuration, timer at zero
    Ready,
    Playing,
    Paused,
    Solved,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Initial => "initial",
            SessionState::Ready => "ready",
            SessionState::Playing => "playing",
            SessionState::Paused => "paused",
            SessionState::Solved => "solved",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "initial" => Some(SessionState::Initial),
            "ready" => Some(SessionState::Ready),
            "playing" => Some(SessionState::Playing),
            "paused" => Some(SessionState::Paused),
            "solved" => Some(SessionState::Solved),
            _ => None,
        }
    }

    /// Whether moves and drags are accepted.
    pub fn is_interactive(&self) -> bool {
        matches!(self, SessionState::Playing)
    }

    /// Whether an attempt is under way (board shuffled, not yet finished).
    pub fn in_progress(&self) -> bool {
        matches!(self, SessionState::Playing | SessionState::Paused)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Player-initiated lifecycle commands
///
/// These are used by keyboard input and by the host bridge protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionCommand {
    /// Shuffle and start the timer (from `ready`)
    Start,
    Pause,
    Resume,
    /// Abandon the attempt and rebuild the solved board
    Stop,
    /// Leave the solved screen and play the same puzzle again
    PlayAgain,
    /// Leave the solved screen
    Close,
}

impl SessionCommand {
    /// Parse command from string (for host protocol)
    ///
    /// # Examples
    ///
    /// ```
    /// use picture_puzzle_types::SessionCommand;
    ///
    /// assert_eq!(SessionCommand::from_str("start"), Some(SessionCommand::Start));
    /// assert_eq!(SessionCommand::from_str("play_again"), Some(SessionCommand::PlayAgain));
    /// assert_eq!(SessionCommand::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "").as_str() {
            "start" => Some(SessionCommand::Start),
            "pause" => Some(SessionCommand::Pause),
            "resume" => Some(SessionCommand::Resume),
            "stop" => Some(SessionCommand::Stop),
            "playagain" => Some(SessionCommand::PlayAgain),
            "close" => Some(SessionCommand::Close),
            _ => None,
        }
    }

    /// Convert to camelCase string for the host protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionCommand::Start => "start",
            SessionCommand::Pause => "pause",
            SessionCommand::Resume => "resume",
            SessionCommand::Stop => "stop",
            SessionCommand::PlayAgain => "playAgain",
            SessionCommand::Close => "close",
        }
    }
}

/// Direction a sliding tile travels into the blank.
///
/// `Up` moves the tile below the blank upward, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Row/column step as `(d_row, d_col)`.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Pointer gesture phase (mouse or touch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

impl PointerPhase {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "down" | "start" => Some(PointerPhase::Down),
            "move" | "drag" => Some(PointerPhase::Move),
            "up" | "end" => Some(PointerPhase::Up),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PointerPhase::Down => "down",
            PointerPhase::Move => "move",
            PointerPhase::Up => "up",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_ranges_match_variants() {
        assert_eq!(GameType::Slide.difficulty_range(), (3, 10));
        assert_eq!(GameType::Jigsaw.difficulty_range(), (2, 12));

        assert!(!GameType::Slide.is_valid_difficulty(2));
        assert!(GameType::Slide.is_valid_difficulty(10));
        assert!(!GameType::Slide.is_valid_difficulty(11));
        assert!(GameType::Jigsaw.is_valid_difficulty(2));
        assert!(!GameType::Jigsaw.is_valid_difficulty(13));

        assert_eq!(GameType::Slide.clamp_difficulty(1), 3);
        assert_eq!(GameType::Jigsaw.clamp_difficulty(40), 12);
    }

    #[test]
    fn default_difficulty_is_valid() {
        for game_type in [GameType::Slide, GameType::Jigsaw] {
            assert!(game_type.is_valid_difficulty(game_type.default_difficulty()));
        }
    }

    #[test]
    fn session_state_round_trips_through_str() {
        for state in [
            SessionState::Initial,
            SessionState::Ready,
            SessionState::Playing,
            SessionState::Paused,
            SessionState::Solved,
        ] {
            assert_eq!(SessionState::from_str(state.as_str()), Some(state));
        }
        assert!(SessionState::Playing.is_interactive());
        assert!(!SessionState::Paused.is_interactive());
        assert!(SessionState::Paused.in_progress());
        assert!(!SessionState::Solved.in_progress());
    }

    #[test]
    fn command_strings_accept_camel_and_snake_case() {
        assert_eq!(SessionCommand::from_str("PLAYAGAIN"), Some(SessionCommand::PlayAgain));
        assert_eq!(SessionCommand::from_str("play_again"), Some(SessionCommand::PlayAgain));
        assert_eq!(SessionCommand::PlayAgain.as_str(), "playAgain");
    }

    #[test]
    fn direction_deltas_are_unit_steps() {
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let (dr, dc) = dir.delta();
            assert_eq!(dr.abs() + dc.abs(), 1);
            let (or, oc) = dir.opposite().delta();
            assert_eq!((dr + or, dc + oc), (0, 0));
        }
    }
}
