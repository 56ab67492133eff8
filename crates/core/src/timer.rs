//! Timer module - elapsed-time clock and move counter
//!
//! The clock accrues time only through [`GameClock::tick`], which the host loop
//! calls with the wall time elapsed since the previous tick. This keeps the
//! engine free of system-clock reads and lets tests advance time exactly.

/// Elapsed-time clock with start/pause/stop/reset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameClock {
    elapsed_ms: u64,
    running: bool,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume accrual
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Freeze without resetting
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Freeze. Callers follow this with [`GameClock::reset`] when the attempt is discarded.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Zero the elapsed time. Running state is left as is.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance the clock.
    ///
    /// Returns true when the whole-second reading changed, so callers can
    /// refresh a seconds display only when it would show something new.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.running {
            return false;
        }
        let before = self.elapsed_seconds();
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms as u64);
        self.elapsed_seconds() != before
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Whole seconds accrued
    pub fn elapsed_seconds(&self) -> u32 {
        (self.elapsed_ms / 1000).min(u32::MAX as u64) as u32
    }
}

/// Count of registered player actions. Never decremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveCounter {
    moves: u32,
}

impl MoveCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self) {
        self.moves = self.moves.saturating_add(1);
    }

    pub fn count(&self) -> u32 {
        self.moves
    }

    pub fn reset(&mut self) {
        self.moves = 0;
    }
}
