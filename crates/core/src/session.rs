//! Session module - one puzzle attempt and its lifecycle
//!
//! [`GameSession`] owns the active board, the clock, the move counter, the
//! best-time cache and the completion recorder. Every input is an event; an event
//! that does not apply to the current state is ignored and reported as `false`.
//!
//! | From | Event | To |
//! |---|---|---|
//! | `initial` | image ready | `ready` |
//! | `ready` | start | `playing` (board shuffled, clock running) |
//! | `playing` | pause | `paused` (drag abandoned) |
//! | `paused` | resume | `playing` |
//! | `playing` / `paused` | stop | `ready` (board rebuilt) |
//! | `playing` | board solved | `solved` (best time written, completion recorded once) |
//! | `solved` | play again / close | `ready` |
//! | any | resize | unchanged, progress preserved |
//! | any with image | configure / new image | `ready` |

use tracing::{debug, info, warn};

use crate::best_time::BestTimeCache;
use crate::board::PuzzleBoard;
use crate::error::SessionError;
use crate::jigsaw::DropOutcome;
use crate::recorder::{CompletionEvent, CompletionRecorder, LogRecorder};
use crate::rng::PuzzleRng;
use crate::snapshot::{BoardSnapshot, SessionSnapshot};
use crate::timer::{GameClock, MoveCounter};
use crate::types::{
    Direction, GameType, Point, PointerPhase, Rect, SessionCommand, SessionState, Size,
};

/// What the host asks for when it creates a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub puzzle_id: String,
    pub category: String,
    pub game_type: GameType,
    pub difficulty: u8,
    /// Fixed RNG seed for replayable shuffles; OS entropy when absent
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn new(game_type: GameType, difficulty: u8) -> Self {
        Self {
            puzzle_id: String::new(),
            category: String::new(),
            game_type,
            difficulty,
            seed: None,
        }
    }

    pub fn with_puzzle(mut self, puzzle_id: impl Into<String>, category: impl Into<String>) -> Self {
        self.puzzle_id = puzzle_id.into();
        self.category = category.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.game_type.is_valid_difficulty(self.difficulty) {
            Ok(())
        } else {
            Err(SessionError::invalid_difficulty(
                self.game_type,
                self.difficulty,
            ))
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(GameType::Slide, GameType::Slide.default_difficulty())
    }
}

pub struct GameSession {
    config: SessionConfig,
    state: SessionState,
    container: Size,
    image: Option<Size>,
    board: Option<PuzzleBoard>,
    clock: GameClock,
    moves: MoveCounter,
    rng: PuzzleRng,
    best_times: BestTimeCache,
    best_time: Option<u32>,
    recorder: Box<dyn CompletionRecorder + Send>,
    completion_recorded: bool,
    last_completion: Option<CompletionEvent>,
    last_shuffle_attempts: u32,
}

impl GameSession {
    /// Create a session waiting for its image.
    pub fn new(config: SessionConfig, container: Size) -> Result<Self, SessionError> {
        config.validate()?;
        let best_times = BestTimeCache::in_memory();
        Ok(Self {
            rng: PuzzleRng::from_optional_seed(config.seed),
            best_time: best_times.read(config.game_type, config.difficulty),
            config,
            state: SessionState::Initial,
            container,
            image: None,
            board: None,
            clock: GameClock::new(),
            moves: MoveCounter::new(),
            best_times,
            recorder: Box::new(LogRecorder),
            completion_recorded: false,
            last_completion: None,
            last_shuffle_attempts: 0,
        })
    }

    pub fn with_best_times(mut self, best_times: BestTimeCache) -> Self {
        self.best_times = best_times;
        self.refresh_best_time();
        self
    }

    pub fn with_recorder(mut self, recorder: impl CompletionRecorder + Send + 'static) -> Self {
        self.recorder = Box::new(recorder);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn game_type(&self) -> GameType {
        self.config.game_type
    }

    pub fn difficulty(&self) -> u8 {
        self.config.difficulty
    }

    pub fn moves(&self) -> u32 {
        self.moves.count()
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.clock.elapsed_seconds()
    }

    pub fn best_time(&self) -> Option<u32> {
        self.best_time
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn image(&self) -> Option<Size> {
        self.image
    }

    pub fn board(&self) -> Option<&PuzzleBoard> {
        self.board.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> Option<&mut PuzzleBoard> {
        self.board.as_mut()
    }

    pub fn board_bounds(&self) -> Option<Rect> {
        self.board.as_ref().map(PuzzleBoard::bounds)
    }

    /// Permutations drawn by the last slide shuffle
    pub fn last_shuffle_attempts(&self) -> u32 {
        self.last_shuffle_attempts
    }

    /// The event sent to the recorder for the current solve, if any
    pub fn last_completion(&self) -> Option<&CompletionEvent> {
        self.last_completion.as_ref()
    }

    pub fn completion_recorded(&self) -> bool {
        self.completion_recorded
    }

    // ----- lifecycle -----

    /// The host's image finished loading. Lays the board out in home
    /// configuration and moves to `ready` from any state.
    pub fn image_ready(&mut self, image: Size) -> bool {
        self.image = Some(image);
        self.rebuild_home();
        debug!(width = image.width, height = image.height, "Image ready");
        true
    }

    /// The host's image failed to load. Only meaningful before the first image.
    pub fn image_failed(&mut self, reason: &str) -> bool {
        warn!(reason, state = %self.state, "Puzzle image failed to load");
        self.state == SessionState::Initial
    }

    /// Switch variant and/or grid size. Rebuilds the board when an image is known.
    pub fn configure(&mut self, game_type: GameType, difficulty: u8) -> Result<bool, SessionError> {
        if !game_type.is_valid_difficulty(difficulty) {
            return Err(SessionError::invalid_difficulty(game_type, difficulty));
        }
        self.config.game_type = game_type;
        self.config.difficulty = difficulty;
        self.refresh_best_time();
        if self.image.is_some() {
            self.rebuild_home();
        }
        debug!(%game_type, difficulty, "Session configured");
        Ok(true)
    }

    /// Identify the puzzle in completion events.
    pub fn set_puzzle(&mut self, puzzle_id: impl Into<String>, category: impl Into<String>) {
        self.config.puzzle_id = puzzle_id.into();
        self.config.category = category.into();
    }

    pub fn apply_command(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Start => self.start(),
            SessionCommand::Pause => self.pause(),
            SessionCommand::Resume => self.resume(),
            SessionCommand::Stop => self.stop(),
            SessionCommand::PlayAgain => self.play_again(),
            SessionCommand::Close => self.close(),
        }
    }

    /// Shuffle and start the clock.
    pub fn start(&mut self) -> bool {
        if self.state != SessionState::Ready {
            return false;
        }
        let Some(board) = self.board.as_mut() else {
            return false;
        };
        self.last_shuffle_attempts = board.shuffle(&mut self.rng);
        self.clock.reset();
        self.moves.reset();
        self.clock.start();
        self.completion_recorded = false;
        self.last_completion = None;
        self.set_state(SessionState::Playing);
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != SessionState::Playing {
            return false;
        }
        self.clock.pause();
        if let Some(board) = self.board.as_mut() {
            board.cancel_drag();
        }
        self.set_state(SessionState::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != SessionState::Paused {
            return false;
        }
        self.clock.start();
        self.set_state(SessionState::Playing);
        true
    }

    /// Pause when playing, resume when paused
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            SessionState::Playing => self.pause(),
            SessionState::Paused => self.resume(),
            _ => false,
        }
    }

    /// Abandon the attempt.
    pub fn stop(&mut self) -> bool {
        if !self.state.in_progress() {
            return false;
        }
        self.clock.stop();
        self.rebuild_home();
        true
    }

    pub fn play_again(&mut self) -> bool {
        self.leave_solved()
    }

    pub fn close(&mut self) -> bool {
        self.leave_solved()
    }

    /// New container size. Geometry follows; the board keeps its progress.
    pub fn resize(&mut self, container: Size) -> bool {
        self.container = container;
        if let Some(board) = self.board.as_mut() {
            board.resize(container);
        }
        debug!(width = container.width, height = container.height, "Container resized");
        true
    }

    /// Advance the clock. Returns true when the displayed second changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.state != SessionState::Playing {
            return false;
        }
        self.clock.tick(elapsed_ms)
    }

    // ----- slide input -----

    /// Slide the tile at `position` into the blank.
    pub fn slide_move(&mut self, position: usize) -> bool {
        if self.state != SessionState::Playing {
            return false;
        }
        let Some(tiles) = self.board.as_mut().and_then(PuzzleBoard::as_slide_mut) else {
            return false;
        };
        if !tiles.try_move(position) {
            return false;
        }
        self.moves.increment();
        self.check_completion();
        true
    }

    /// Slide the tile that travels in `direction`.
    pub fn slide_direction(&mut self, direction: Direction) -> bool {
        if self.state != SessionState::Playing {
            return false;
        }
        let Some(tiles) = self.board.as_mut().and_then(PuzzleBoard::as_slide_mut) else {
            return false;
        };
        if tiles.try_move_direction(direction).is_none() {
            return false;
        }
        self.moves.increment();
        self.check_completion();
        true
    }

    /// Slide the tile under a container point.
    pub fn slide_at(&mut self, point: Point) -> bool {
        let Some(position) = self
            .board
            .as_ref()
            .filter(|b| b.game_type() == GameType::Slide)
            .and_then(|b| b.geometry().cell_at(point))
        else {
            return false;
        };
        self.slide_move(position)
    }

    // ----- jigsaw input -----

    pub fn drag_start(&mut self, pointer: Point) -> Option<usize> {
        if self.state != SessionState::Playing {
            return None;
        }
        self.board
            .as_mut()
            .and_then(PuzzleBoard::as_jigsaw_mut)?
            .drag_start(pointer)
    }

    pub fn drag_move(&mut self, pointer: Point) -> bool {
        if self.state != SessionState::Playing {
            return false;
        }
        self.board
            .as_mut()
            .and_then(PuzzleBoard::as_jigsaw_mut)
            .is_some_and(|b| b.drag_move(pointer))
    }

    /// Release the held piece. Every drop counts as one move.
    pub fn drag_end(&mut self, pointer: Point) -> Option<DropOutcome> {
        if self.state != SessionState::Playing {
            return None;
        }
        let outcome = self
            .board
            .as_mut()
            .and_then(PuzzleBoard::as_jigsaw_mut)?
            .drag_end(pointer)?;
        self.moves.increment();
        self.check_completion();
        Some(outcome)
    }

    /// Route a pointer gesture to the active variant.
    ///
    /// Slide boards treat a press as a tap on a tile; jigsaw boards map the
    /// phases onto drag start, move and end.
    pub fn pointer(&mut self, phase: PointerPhase, point: Point) -> bool {
        match (self.config.game_type, phase) {
            (GameType::Slide, PointerPhase::Down) => self.slide_at(point),
            (GameType::Slide, _) => false,
            (GameType::Jigsaw, PointerPhase::Down) => self.drag_start(point).is_some(),
            (GameType::Jigsaw, PointerPhase::Move) => self.drag_move(point),
            (GameType::Jigsaw, PointerPhase::Up) => self.drag_end(point).is_some(),
        }
    }

    // ----- completion -----

    /// Evaluate the win condition. Safe to call at any time; the solve is
    /// finalized at most once. Returns true when the session is solved.
    pub fn check_completion(&mut self) -> bool {
        match self.state {
            SessionState::Solved => true,
            SessionState::Playing => {
                if self.board.as_ref().is_some_and(PuzzleBoard::is_solved) {
                    self.finish();
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    fn finish(&mut self) {
        self.clock.stop();
        self.set_state(SessionState::Solved);
        if self.completion_recorded {
            return;
        }
        self.completion_recorded = true;

        let seconds = self.clock.elapsed_seconds();
        let (game_type, difficulty) = (self.config.game_type, self.config.difficulty);
        if self.best_times.write(game_type, difficulty, seconds) {
            info!(%game_type, difficulty, seconds, "New best time");
        }
        self.refresh_best_time();

        let event = CompletionEvent {
            puzzle_id: self.config.puzzle_id.clone(),
            category: self.config.category.clone(),
            game_type,
            difficulty,
            time_in_seconds: seconds,
            moves: self.moves.count(),
        };
        match self.recorder.record_completion(&event) {
            Ok(ack) => debug!(success = ack.success, "Completion recorded"),
            Err(e) => warn!(error = %e, "Failed to record completion"),
        }
        self.last_completion = Some(event);
    }

    // ----- observation -----

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            puzzle_id: self.config.puzzle_id.clone(),
            category: self.config.category.clone(),
            game_type: self.config.game_type,
            difficulty: self.config.difficulty,
            state: self.state,
            moves: self.moves.count(),
            elapsed_seconds: self.clock.elapsed_seconds(),
            best_time: self.best_time,
            container: self.container,
            board_bounds: self.board_bounds(),
            cell_size: self.board.as_ref().map(|b| b.geometry().cell_size()),
            board: self
                .board
                .as_ref()
                .map(BoardSnapshot::from_board)
                .unwrap_or_default(),
        }
    }

    // ----- internals -----

    fn leave_solved(&mut self) -> bool {
        if self.state != SessionState::Solved {
            return false;
        }
        self.rebuild_home();
        true
    }

    /// Fresh home-configuration board for the current config, clock and moves
    /// zeroed, state `ready`.
    fn rebuild_home(&mut self) {
        let Some(image) = self.image else {
            return;
        };
        self.board = Some(PuzzleBoard::home(
            self.config.game_type,
            self.config.difficulty,
            self.container,
            image,
        ));
        self.clock.stop();
        self.clock.reset();
        self.moves.reset();
        self.completion_recorded = false;
        self.last_completion = None;
        self.set_state(SessionState::Ready);
    }

    fn refresh_best_time(&mut self) {
        self.best_time = self
            .best_times
            .read(self.config.game_type, self.config.difficulty);
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, "Session state changed");
            self.state = state;
        }
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("moves", &self.moves.count())
            .field("elapsed_seconds", &self.clock.elapsed_seconds())
            .field("best_time", &self.best_time)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::RecordError;
    use crate::recorder::RecordAck;
    use crate::slide::SlideBoard;

    const CONTAINER: Size = Size::new(1000.0, 1000.0);
    const IMAGE: Size = Size::new(1.0, 1.0);

    fn recording_session(
        game_type: GameType,
        difficulty: u8,
    ) -> (GameSession, Arc<Mutex<Vec<CompletionEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let config = SessionConfig::new(game_type, difficulty)
            .with_puzzle("p-7", "landscapes")
            .with_seed(99);
        let session = GameSession::new(config, CONTAINER)
            .unwrap()
            .with_recorder(move |e: &CompletionEvent| {
                sink.lock().unwrap().push(e.clone());
                Ok::<_, RecordError>(RecordAck { success: true })
            });
        (session, events)
    }

    fn playing(game_type: GameType, difficulty: u8) -> (GameSession, Arc<Mutex<Vec<CompletionEvent>>>) {
        let (mut s, events) = recording_session(game_type, difficulty);
        assert!(s.image_ready(IMAGE));
        assert!(s.start());
        (s, events)
    }

    /// Replace the shuffled slide board with one that is a single move from solved.
    fn one_move_from_solved(s: &mut GameSession) {
        let tiles = s.board_mut().and_then(PuzzleBoard::as_slide_mut).unwrap();
        *tiles = SlideBoard::from_tiles(3, &[1, 2, 3, 4, 5, 6, 7, 9, 8]).unwrap();
    }

    #[test]
    fn test_invalid_difficulty_is_rejected() {
        let err = GameSession::new(SessionConfig::new(GameType::Slide, 2), CONTAINER).unwrap_err();
        assert!(matches!(err, SessionError::InvalidDifficulty { min: 3, max: 10, .. }));
        assert!(GameSession::new(SessionConfig::new(GameType::Jigsaw, 13), CONTAINER).is_err());
        assert!(GameSession::new(SessionConfig::new(GameType::Jigsaw, 2), CONTAINER).is_ok());
    }

    #[test]
    fn test_lifecycle_transitions() {
        let (mut s, _) = recording_session(GameType::Slide, 3);
        assert_eq!(s.state(), SessionState::Initial);
        assert!(!s.start());
        assert!(s.board().is_none());

        s.image_ready(IMAGE);
        assert_eq!(s.state(), SessionState::Ready);
        assert!(s.board().unwrap().is_solved());

        assert!(!s.pause());
        assert!(s.start());
        assert_eq!(s.state(), SessionState::Playing);
        assert!(!s.board().unwrap().is_solved());
        assert!(s.last_shuffle_attempts() >= 1);

        assert!(!s.start());
        assert!(s.pause());
        assert_eq!(s.state(), SessionState::Paused);
        assert!(s.resume());
        assert!(s.stop());
        assert_eq!(s.state(), SessionState::Ready);
        assert!(s.board().unwrap().is_solved());
        assert!(!s.stop());
    }

    #[test]
    fn test_image_failure_keeps_initial() {
        let (mut s, _) = recording_session(GameType::Jigsaw, 3);
        assert!(s.image_failed("404"));
        assert_eq!(s.state(), SessionState::Initial);

        s.image_ready(IMAGE);
        assert!(!s.image_failed("late failure"));
        assert_eq!(s.state(), SessionState::Ready);
    }

    #[test]
    fn test_clock_runs_only_while_playing() {
        let (mut s, _) = recording_session(GameType::Slide, 3);
        s.image_ready(IMAGE);
        assert!(!s.tick(5000));
        s.start();
        s.tick(2500);
        assert_eq!(s.elapsed_seconds(), 2);

        s.pause();
        s.tick(10_000);
        assert_eq!(s.elapsed_seconds(), 2);

        s.resume();
        assert!(s.tick(500));
        assert_eq!(s.elapsed_seconds(), 3);

        s.stop();
        assert_eq!(s.elapsed_seconds(), 0);
        assert_eq!(s.moves(), 0);
    }

    #[test]
    fn test_slide_counts_only_legal_moves() {
        let (mut s, _) = playing(GameType::Slide, 3);
        let tiles = s.board().and_then(PuzzleBoard::as_slide).unwrap().clone();
        let blank = tiles.blank_index();
        let illegal = (0..9).find(|&p| p != blank && !tiles.is_adjacent_to_blank(p)).unwrap();
        let legal = tiles.movable_positions()[0];

        assert!(!s.slide_move(illegal));
        assert!(!s.slide_move(blank));
        assert_eq!(s.moves(), 0);

        assert!(s.slide_move(legal));
        assert_eq!(s.moves(), 1);
    }

    #[test]
    fn test_moves_rejected_while_paused() {
        let (mut s, _) = playing(GameType::Slide, 3);
        let legal = s.board().and_then(PuzzleBoard::as_slide).unwrap().movable_positions()[0];
        s.pause();
        assert!(!s.slide_move(legal));
        assert_eq!(s.moves(), 0);
    }

    #[test]
    fn test_completion_is_recorded_once() {
        let (mut s, events) = playing(GameType::Slide, 3);
        s.tick(4200);
        one_move_from_solved(&mut s);

        assert!(s.slide_move(8));
        assert_eq!(s.state(), SessionState::Solved);
        assert!(s.check_completion());
        assert!(s.check_completion());

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].puzzle_id, "p-7");
        assert_eq!(events[0].category, "landscapes");
        assert_eq!(events[0].time_in_seconds, 4);
        assert_eq!(events[0].moves, 1);
        assert_eq!(s.best_time(), Some(4));
    }

    #[test]
    fn test_solved_freezes_clock_and_moves() {
        let (mut s, _) = playing(GameType::Slide, 3);
        one_move_from_solved(&mut s);
        s.slide_move(8);
        assert!(!s.tick(5000));
        assert_eq!(s.elapsed_seconds(), 0);
        assert!(!s.slide_direction(Direction::Up));
        assert_eq!(s.moves(), 1);

        assert!(s.play_again());
        assert_eq!(s.state(), SessionState::Ready);
        assert!(!s.completion_recorded());
        assert_eq!(s.moves(), 0);
    }

    #[test]
    fn test_best_time_only_improves() {
        let (mut s, _) = playing(GameType::Slide, 3);
        s.tick(10_000);
        one_move_from_solved(&mut s);
        s.slide_move(8);
        assert_eq!(s.best_time(), Some(10));

        s.play_again();
        s.start();
        s.tick(20_000);
        one_move_from_solved(&mut s);
        s.slide_move(8);
        assert_eq!(s.best_time(), Some(10));

        s.close();
        s.start();
        s.tick(3_000);
        one_move_from_solved(&mut s);
        s.slide_move(8);
        assert_eq!(s.best_time(), Some(3));
    }

    #[test]
    fn test_failing_recorder_still_solves() {
        let config = SessionConfig::new(GameType::Slide, 3).with_seed(1);
        let mut s = GameSession::new(config, CONTAINER)
            .unwrap()
            .with_recorder(|_: &CompletionEvent| Err::<RecordAck, _>(RecordError::Disconnected));
        s.image_ready(IMAGE);
        s.start();
        one_move_from_solved(&mut s);
        assert!(s.slide_move(8));
        assert_eq!(s.state(), SessionState::Solved);
        assert!(s.completion_recorded());
    }

    /// Snap every piece but 0 directly, then finish with a real drag.
    fn solve_jigsaw(s: &mut GameSession) {
        let jigsaw = s.board_mut().and_then(PuzzleBoard::as_jigsaw_mut).unwrap();
        for id in 1..jigsaw.geometry().cell_count() {
            let home = jigsaw.geometry().home_of(id);
            jigsaw.drop_piece(id, home);
        }
        assert!(!s.check_completion());

        let jigsaw = s.board().and_then(PuzzleBoard::as_jigsaw).unwrap();
        let grab = jigsaw.piece(0).unwrap().position.offset(1.0, 1.0);
        let home = jigsaw.geometry().home_of(0).offset(1.0, 1.0);
        assert!(s.pointer(PointerPhase::Down, grab));
        assert!(s.pointer(PointerPhase::Up, home));
    }

    #[test]
    fn test_jigsaw_counts_every_drop() {
        let (mut s, _) = playing(GameType::Jigsaw, 3);
        let jigsaw = s.board().and_then(PuzzleBoard::as_jigsaw).unwrap();
        let top = *jigsaw.stacking().last().unwrap();
        let grab = jigsaw.piece(top).unwrap().position.offset(5.0, 5.0);

        assert!(s.pointer(PointerPhase::Down, grab));
        assert!(s.pointer(PointerPhase::Move, grab.offset(3.0, 0.0)));
        assert!(s.pointer(PointerPhase::Up, grab.offset(3.0, 0.0)));
        assert_eq!(s.moves(), 1);

        // Releasing with nothing held is not a drop.
        assert!(!s.pointer(PointerPhase::Up, grab));
        assert_eq!(s.moves(), 1);
    }

    #[test]
    fn test_jigsaw_solve_records_completion() {
        let (mut s, events) = playing(GameType::Jigsaw, 2);
        solve_jigsaw(&mut s);
        assert!(s.check_completion());
        assert_eq!(s.state(), SessionState::Solved);
        assert_eq!(events.lock().unwrap().len(), 1);
        assert!(s.check_completion());
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_pause_abandons_drag() {
        let (mut s, _) = playing(GameType::Jigsaw, 3);
        let jigsaw = s.board().and_then(PuzzleBoard::as_jigsaw).unwrap();
        let top = *jigsaw.stacking().last().unwrap();
        let grab = jigsaw.piece(top).unwrap().position.offset(5.0, 5.0);
        assert_eq!(s.drag_start(grab), Some(top));

        s.pause();
        assert!(!s.board().and_then(PuzzleBoard::as_jigsaw).unwrap().is_dragging());
        s.resume();
        assert!(s.drag_end(grab).is_none());
        assert_eq!(s.moves(), 0);
    }

    #[test]
    fn test_resize_preserves_progress() {
        let (mut s, _) = playing(GameType::Slide, 4);
        let legal = s.board().and_then(PuzzleBoard::as_slide).unwrap().movable_positions()[0];
        s.slide_move(legal);
        let before = s.board().and_then(PuzzleBoard::as_slide).unwrap().clone();
        let bounds = s.board_bounds().unwrap();

        assert!(s.resize(Size::new(400.0, 300.0)));
        assert_eq!(s.state(), SessionState::Playing);
        assert_eq!(s.moves(), 1);
        assert_eq!(s.board().and_then(PuzzleBoard::as_slide), Some(&before));
        assert!(s.board_bounds().unwrap().width < bounds.width);
    }

    #[test]
    fn test_configure_rebuilds_board() {
        let (mut s, _) = playing(GameType::Slide, 3);
        s.slide_move(s.board().and_then(PuzzleBoard::as_slide).unwrap().movable_positions()[0]);

        assert!(s.configure(GameType::Jigsaw, 5).unwrap());
        assert_eq!(s.state(), SessionState::Ready);
        assert_eq!(s.moves(), 0);
        let board = s.board().unwrap();
        assert_eq!(board.game_type(), GameType::Jigsaw);
        assert_eq!(board.geometry().grid(), 5);
        assert!(board.is_solved());

        assert!(s.configure(GameType::Slide, 11).is_err());
        assert_eq!(s.game_type(), GameType::Jigsaw);
    }

    #[test]
    fn test_configure_before_image_stays_initial() {
        let (mut s, _) = recording_session(GameType::Slide, 3);
        s.configure(GameType::Jigsaw, 4).unwrap();
        assert_eq!(s.state(), SessionState::Initial);
        assert!(s.board().is_none());
    }

    #[test]
    fn test_snapshot_reflects_board() {
        let (mut s, _) = recording_session(GameType::Slide, 3);
        let snap = s.snapshot();
        assert_eq!(snap.state, SessionState::Initial);
        assert_eq!(snap.board, BoardSnapshot::Empty);
        assert!(snap.board_bounds.is_none());

        s.image_ready(IMAGE);
        let snap = s.snapshot();
        match snap.board {
            BoardSnapshot::Slide { size, tiles, blank_position } => {
                assert_eq!(size, 3);
                assert_eq!(tiles.len(), 8);
                assert_eq!(blank_position, 8);
            }
            other => panic!("unexpected board {other:?}"),
        }
    }
}
