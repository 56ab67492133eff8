//! Completion recording - the outbound "puzzle finished" call
//!
//! The session invokes its recorder exactly once per solve. The result is only
//! logged; a failing recorder never affects the session.

use tracing::info;

use crate::error::RecordError;
use crate::types::GameType;

/// Data reported when a puzzle is solved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEvent {
    pub puzzle_id: String,
    pub category: String,
    pub game_type: GameType,
    pub difficulty: u8,
    pub time_in_seconds: u32,
    pub moves: u32,
}

/// Recorder acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordAck {
    pub success: bool,
}

pub trait CompletionRecorder {
    fn record_completion(&mut self, event: &CompletionEvent) -> Result<RecordAck, RecordError>;
}

impl<F> CompletionRecorder for F
where
    F: FnMut(&CompletionEvent) -> Result<RecordAck, RecordError>,
{
    fn record_completion(&mut self, event: &CompletionEvent) -> Result<RecordAck, RecordError> {
        self(event)
    }
}

/// Recorder that only writes a log line
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRecorder;

impl CompletionRecorder for LogRecorder {
    fn record_completion(&mut self, event: &CompletionEvent) -> Result<RecordAck, RecordError> {
        info!(
            puzzle_id = %event.puzzle_id,
            category = %event.category,
            game_type = %event.game_type,
            difficulty = event.difficulty,
            seconds = event.time_in_seconds,
            moves = event.moves,
            "Puzzle completed"
        );
        Ok(RecordAck { success: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> CompletionEvent {
        CompletionEvent {
            puzzle_id: "p-1".to_string(),
            category: "animals".to_string(),
            game_type: GameType::Slide,
            difficulty: 3,
            time_in_seconds: 42,
            moves: 17,
        }
    }

    #[test]
    fn test_closures_are_recorders() {
        let mut seen = Vec::new();
        let mut recorder = |e: &CompletionEvent| {
            seen.push(e.moves);
            Ok::<_, RecordError>(RecordAck { success: true })
        };
        assert!(recorder.record_completion(&event()).unwrap().success);
        drop(recorder);
        assert_eq!(seen, vec![17]);
    }

    #[test]
    fn test_log_recorder_acknowledges() {
        let ack = LogRecorder.record_completion(&event()).unwrap();
        assert!(ack.success);
    }
}
