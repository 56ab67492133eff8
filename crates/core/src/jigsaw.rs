//! Jigsaw module - free-drag pieces that snap onto a board
//!
//! Each of the N² pieces has a stable id; its home is the top-left corner of cell
//! `id` on the board. A piece is placed exactly when it sits on its home. Pieces are
//! scattered around the board on start, picked up one at a time, and snap home when
//! dropped within a fraction of a cell width on both axes.
//!
//! At most one piece is in flight. The drag slot is an `Option<DragSession>` that
//! only [`JigsawBoard::drag_start`], [`JigsawBoard::drag_move`],
//! [`JigsawBoard::drag_end`] and [`JigsawBoard::cancel_drag`] touch.

use tracing::trace;

use crate::geometry::BoardGeometry;
use crate::rng::PuzzleRng;
use crate::types::{Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JigsawPiece {
    /// Row-major home cell
    pub id: usize,
    /// Top-left corner in container coordinates
    pub position: Point,
    pub placed: bool,
}

/// The piece currently held by the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub piece_id: usize,
    /// Piece position minus pointer position at pick-up
    pub grab_offset: Point,
}

impl DragSession {
    /// Where the piece sits for a given pointer position
    pub fn piece_position(&self, pointer: Point) -> Point {
        pointer.plus(self.grab_offset)
    }
}

/// Result of dropping a piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    /// The piece snapped onto its home and is now placed
    Snapped { piece_id: usize },
    /// The piece stays where it was released
    Loose { piece_id: usize, position: Point },
}

impl DropOutcome {
    pub fn piece_id(&self) -> usize {
        match *self {
            DropOutcome::Snapped { piece_id } | DropOutcome::Loose { piece_id, .. } => piece_id,
        }
    }

    pub fn snapped(&self) -> bool {
        matches!(self, DropOutcome::Snapped { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JigsawBoard {
    geometry: BoardGeometry,
    pieces: Vec<JigsawPiece>,
    /// Piece ids from bottom to top
    stacking: Vec<usize>,
    drag: Option<DragSession>,
    /// Last non-empty extent on each axis, the reference for scaling loose pieces
    basis: Size,
}

impl JigsawBoard {
    /// Board with every piece at home.
    pub fn new(geometry: BoardGeometry) -> Self {
        let mut board = Self {
            basis: geometry.container(),
            geometry,
            pieces: Vec::new(),
            stacking: Vec::new(),
            drag: None,
        };
        board.reset_home();
        board
    }

    /// Put every piece on its home and restore the default stacking order.
    pub fn reset_home(&mut self) {
        let count = self.geometry.cell_count();
        self.pieces = (0..count)
            .map(|id| JigsawPiece {
                id,
                position: self.geometry.home_of(id),
                placed: true,
            })
            .collect();
        self.stacking = (0..count).collect();
        self.drag = None;
    }

    /// Scatter every piece around the board and randomize the stacking order.
    ///
    /// Candidates are drawn uniformly over the container. A candidate that
    /// overlaps the board has its x redrawn inside the strip left or right of the
    /// board. When neither strip is a full piece wide, the overlap is kept.
    pub fn scatter(&mut self, rng: &mut PuzzleRng) {
        let container = self.geometry.container();
        let board = self.geometry.bounds();
        let piece = self.geometry.cell_size();

        for p in &mut self.pieces {
            p.position = scatter_position(rng, container, board, piece);
            p.placed = false;
        }

        rng.shuffle(&mut self.stacking);
        self.drag = None;
        trace!(pieces = self.pieces.len(), "Scattered jigsaw pieces");
    }

    /// Move to a new geometry, keeping progress.
    ///
    /// Placed pieces follow their home. Loose pieces keep their relative spot in
    /// the container and are clamped inside it. An axis with no extent leaves
    /// loose pieces untouched on that axis, so they come back when it grows
    /// again. Any drag is abandoned.
    pub fn relayout(&mut self, geometry: BoardGeometry) {
        let new = geometry.container();
        let piece = geometry.cell_size();
        let x_axis = Axis::new(self.basis.width, new.width, piece.width);
        let y_axis = Axis::new(self.basis.height, new.height, piece.height);

        for p in &mut self.pieces {
            if p.placed {
                p.position = geometry.home_of(p.id);
            } else {
                p.position = Point::new(x_axis.map(p.position.x), y_axis.map(p.position.y));
            }
        }

        if new.width > 0.0 {
            self.basis.width = new.width;
        }
        if new.height > 0.0 {
            self.basis.height = new.height;
        }
        self.geometry = geometry;
        self.drag = None;
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    pub fn pieces(&self) -> &[JigsawPiece] {
        &self.pieces
    }

    pub fn piece(&self, id: usize) -> Option<&JigsawPiece> {
        self.pieces.get(id)
    }

    /// Piece ids from bottom to top
    pub fn stacking(&self) -> &[usize] {
        &self.stacking
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Topmost unplaced piece under `point`
    pub fn piece_at(&self, point: Point) -> Option<usize> {
        let size = self.geometry.cell_size();
        self.stacking.iter().rev().copied().find(|&id| {
            let p = &self.pieces[id];
            !p.placed && Rect::from_origin(p.position, size).contains(point)
        })
    }

    /// Pick up the topmost unplaced piece under the pointer.
    ///
    /// Refused while another drag is active. The picked piece is raised to the
    /// top of the stack.
    pub fn drag_start(&mut self, pointer: Point) -> Option<usize> {
        if self.drag.is_some() {
            return None;
        }
        let id = self.piece_at(pointer)?;
        self.drag = Some(DragSession {
            piece_id: id,
            grab_offset: self.pieces[id].position.minus(pointer),
        });
        self.raise(id);
        Some(id)
    }

    /// Follow the pointer with the held piece. False when nothing is held.
    pub fn drag_move(&mut self, pointer: Point) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        self.pieces[drag.piece_id].position = drag.piece_position(pointer);
        true
    }

    /// Release the held piece at the pointer.
    pub fn drag_end(&mut self, pointer: Point) -> Option<DropOutcome> {
        let drag = self.drag.take()?;
        self.drop_piece(drag.piece_id, drag.piece_position(pointer))
    }

    /// Abandon the drag. The piece stays wherever it was last moved to.
    pub fn cancel_drag(&mut self) -> Option<DragSession> {
        self.drag.take()
    }

    /// Resolve a drop of `piece_id` with its top-left corner at `position`.
    ///
    /// Snaps home when both axis distances are strictly below the snap tolerance.
    pub fn drop_piece(&mut self, piece_id: usize, position: Point) -> Option<DropOutcome> {
        let home = self.geometry.home_of(piece_id);
        let tolerance = self.geometry.snap_tolerance();
        let piece = self.pieces.get_mut(piece_id)?;

        let dx = (position.x - home.x).abs();
        let dy = (position.y - home.y).abs();
        if dx < tolerance && dy < tolerance {
            piece.position = home;
            piece.placed = true;
            Some(DropOutcome::Snapped { piece_id })
        } else {
            piece.position = position;
            piece.placed = false;
            Some(DropOutcome::Loose { piece_id, position })
        }
    }

    pub fn placed_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.placed).count()
    }

    pub fn is_solved(&self) -> bool {
        self.pieces.iter().all(|p| p.placed)
    }

    fn raise(&mut self, id: usize) {
        if let Some(idx) = self.stacking.iter().position(|&s| s == id) {
            self.stacking.remove(idx);
            self.stacking.push(id);
        }
    }
}

/// One scatter candidate for a piece of size `piece`.
///
/// Only strips at least one piece wide are used for redraws. With no such strip
/// the first candidate is returned even if it overlaps the board.
fn scatter_position(rng: &mut PuzzleRng, container: Size, board: Rect, piece: Size) -> Point {
    let max_x = (container.width - piece.width).max(0.0);
    let max_y = (container.height - piece.height).max(0.0);
    let left_room = board.x >= piece.width;
    let right_room = container.width - board.right() >= piece.width;

    let mut pos = Point::new(rng.range_f32(0.0, max_x), rng.range_f32(0.0, max_y));
    if !(left_room || right_room) {
        return pos;
    }
    while Rect::from_origin(pos, piece).overlaps(&board) {
        let go_left = if left_room && right_room {
            rng.coin_flip()
        } else {
            left_room
        };
        pos.x = if go_left {
            rng.range_f32(0.0, board.x - piece.width)
        } else {
            rng.range_f32(board.right(), max_x)
        };
    }
    pos
}

/// Scaling of loose piece coordinates along one axis.
struct Axis {
    scale: f32,
    max: f32,
    /// False when the new extent is empty
    live: bool,
}

impl Axis {
    fn new(basis: f32, extent: f32, piece: f32) -> Self {
        Self {
            scale: if basis > 0.0 { extent / basis } else { 1.0 },
            max: (extent - piece).max(0.0),
            live: extent > 0.0,
        }
    }

    fn map(&self, v: f32) -> f32 {
        if self.live {
            (v * self.scale).min(self.max).max(0.0)
        } else {
            v
        }
    }
}
