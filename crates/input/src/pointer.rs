//! Mouse events to container-space pointer gestures.
//!
//! The puzzle works in abstract container units. The terminal front end lays
//! the container out from a fixed row offset, with a known number of units per
//! column and per row; [`PointerMapper`] inverts that layout.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::types::{Point, PointerPhase};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMapper {
    /// First terminal row of the container
    top_row: u16,
    units_per_col: f32,
    units_per_row: f32,
}

impl PointerMapper {
    pub fn new(top_row: u16, units_per_col: f32, units_per_row: f32) -> Self {
        Self {
            top_row,
            units_per_col,
            units_per_row,
        }
    }

    /// Container point at the centre of a terminal cell, or `None` above the
    /// container.
    pub fn point_at(&self, column: u16, row: u16) -> Option<Point> {
        let row = row.checked_sub(self.top_row)?;
        Some(Point::new(
            (column as f32 + 0.5) * self.units_per_col,
            (row as f32 + 0.5) * self.units_per_row,
        ))
    }

    /// Map a left-button gesture. Other buttons, scrolling and plain motion
    /// are ignored.
    pub fn map(&self, event: &MouseEvent) -> Option<(PointerPhase, Point)> {
        let phase = match event.kind {
            MouseEventKind::Down(MouseButton::Left) => PointerPhase::Down,
            MouseEventKind::Drag(MouseButton::Left) => PointerPhase::Move,
            MouseEventKind::Up(MouseButton::Left) => PointerPhase::Up,
            _ => return None,
        };
        let point = self.point_at(event.column, event.row)?;
        Some((phase, point))
    }
}
