//! Board module - the active variant's board together with its geometry

use crate::geometry::{BoardGeometry, FitLimits};
use crate::jigsaw::JigsawBoard;
use crate::rng::PuzzleRng;
use crate::slide::SlideBoard;
use crate::types::{GameType, Rect, Size};

#[derive(Debug, Clone, PartialEq)]
pub enum PuzzleBoard {
    Slide {
        tiles: SlideBoard,
        geometry: BoardGeometry,
    },
    Jigsaw(JigsawBoard),
}

impl PuzzleBoard {
    /// Lay out a board of `game_type` in its solved configuration.
    pub fn home(game_type: GameType, difficulty: u8, container: Size, image: Size) -> Self {
        let geometry = BoardGeometry::compute(
            container,
            image,
            difficulty,
            FitLimits::for_game_type(game_type),
        );
        match game_type {
            GameType::Slide => PuzzleBoard::Slide {
                tiles: SlideBoard::solved(difficulty),
                geometry,
            },
            GameType::Jigsaw => PuzzleBoard::Jigsaw(JigsawBoard::new(geometry)),
        }
    }

    pub fn game_type(&self) -> GameType {
        match self {
            PuzzleBoard::Slide { .. } => GameType::Slide,
            PuzzleBoard::Jigsaw(_) => GameType::Jigsaw,
        }
    }

    pub fn geometry(&self) -> &BoardGeometry {
        match self {
            PuzzleBoard::Slide { geometry, .. } => geometry,
            PuzzleBoard::Jigsaw(board) => board.geometry(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.geometry().bounds()
    }

    pub fn as_slide(&self) -> Option<&SlideBoard> {
        match self {
            PuzzleBoard::Slide { tiles, .. } => Some(tiles),
            PuzzleBoard::Jigsaw(_) => None,
        }
    }

    pub fn as_slide_mut(&mut self) -> Option<&mut SlideBoard> {
        match self {
            PuzzleBoard::Slide { tiles, .. } => Some(tiles),
            PuzzleBoard::Jigsaw(_) => None,
        }
    }

    pub fn as_jigsaw(&self) -> Option<&JigsawBoard> {
        match self {
            PuzzleBoard::Jigsaw(board) => Some(board),
            PuzzleBoard::Slide { .. } => None,
        }
    }

    pub fn as_jigsaw_mut(&mut self) -> Option<&mut JigsawBoard> {
        match self {
            PuzzleBoard::Jigsaw(board) => Some(board),
            PuzzleBoard::Slide { .. } => None,
        }
    }

    /// Run the variant's shuffle. Returns the slide attempt count (0 for jigsaw).
    pub fn shuffle(&mut self, rng: &mut PuzzleRng) -> u32 {
        match self {
            PuzzleBoard::Slide { tiles, .. } => tiles.shuffle(rng),
            PuzzleBoard::Jigsaw(board) => {
                board.scatter(rng);
                0
            }
        }
    }

    /// Recompute geometry for a new container without touching progress.
    pub fn resize(&mut self, container: Size) {
        match self {
            PuzzleBoard::Slide { geometry, .. } => *geometry = geometry.with_container(container),
            PuzzleBoard::Jigsaw(board) => {
                let geometry = board.geometry().with_container(container);
                board.relayout(geometry);
            }
        }
    }

    pub fn is_solved(&self) -> bool {
        match self {
            PuzzleBoard::Slide { tiles, .. } => tiles.is_solved(),
            PuzzleBoard::Jigsaw(board) => board.is_solved(),
        }
    }

    /// Drop any in-flight drag. Returns true when one was active.
    pub fn cancel_drag(&mut self) -> bool {
        match self {
            PuzzleBoard::Jigsaw(board) => board.cancel_drag().is_some(),
            PuzzleBoard::Slide { .. } => false,
        }
    }
}
