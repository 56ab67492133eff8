use crate::board::PuzzleBoard;
use crate::types::{GameType, Rect, SessionState, Size};

/// A slide tile and the cell it is drawn in. The blank is never listed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSnapshot {
    pub value: u16,
    pub position: usize,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceSnapshot {
    pub id: usize,
    pub rect: Rect,
    pub placed: bool,
    /// Stacking order, 0 is the bottom
    pub z: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum BoardSnapshot {
    /// No image yet
    #[default]
    Empty,
    Slide {
        size: u8,
        tiles: Vec<TileSnapshot>,
        blank_position: usize,
    },
    Jigsaw {
        /// Bottom to top
        pieces: Vec<PieceSnapshot>,
        placed: usize,
        dragging: Option<usize>,
    },
}

impl BoardSnapshot {
    pub fn from_board(board: &PuzzleBoard) -> Self {
        match board {
            PuzzleBoard::Slide { tiles, geometry } => {
                let blank = tiles.blank();
                let tiles_out = tiles
                    .tiles()
                    .iter()
                    .enumerate()
                    .filter(|&(_, &value)| value != blank)
                    .map(|(position, &value)| TileSnapshot {
                        value,
                        position,
                        rect: geometry.cell_rect(position),
                    })
                    .collect();
                BoardSnapshot::Slide {
                    size: tiles.size(),
                    tiles: tiles_out,
                    blank_position: tiles.blank_index(),
                }
            }
            PuzzleBoard::Jigsaw(board) => {
                let size = board.geometry().cell_size();
                let pieces = board
                    .stacking()
                    .iter()
                    .enumerate()
                    .filter_map(|(z, &id)| {
                        let p = board.piece(id)?;
                        Some(PieceSnapshot {
                            id,
                            rect: Rect::from_origin(p.position, size),
                            placed: p.placed,
                            z,
                        })
                    })
                    .collect();
                BoardSnapshot::Jigsaw {
                    pieces,
                    placed: board.placed_count(),
                    dragging: board.drag().map(|d| d.piece_id),
                }
            }
        }
    }
}

/// Everything a host needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub puzzle_id: String,
    pub category: String,
    pub game_type: GameType,
    pub difficulty: u8,
    pub state: SessionState,
    pub moves: u32,
    pub elapsed_seconds: u32,
    pub best_time: Option<u32>,
    pub container: Size,
    /// `None` until an image is known
    pub board_bounds: Option<Rect>,
    pub cell_size: Option<Size>,
    pub board: BoardSnapshot,
}

impl SessionSnapshot {
    pub fn playable(&self) -> bool {
        self.state.is_interactive()
    }
}
