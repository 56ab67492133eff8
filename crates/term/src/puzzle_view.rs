//! PuzzleView: maps a [`SessionSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! The session works in container units. The view lays the container out
//! below the HUD with one unit per column and two units per row, which keeps
//! square cells roughly square on a typical terminal font.

use crate::core::{BoardSnapshot, SessionSnapshot};
use crate::fb::{format_clock, CellStyle, FrameBuffer, Rgb};
use crate::types::{GameType, Rect, SessionState, Size};

/// Rows above the container (status and stats)
pub const HUD_ROWS: u16 = 2;
/// Rows below the container (key help)
pub const FOOTER_ROWS: u16 = 1;
pub const UNITS_PER_COL: f32 = 1.0;
pub const UNITS_PER_ROW: f32 = 2.0;

const BG: Rgb = Rgb::new(0, 0, 0);
const SLOT: Rgb = Rgb::new(30, 30, 40);
const TEXT: Rgb = Rgb::new(220, 220, 220);
const MUTED: Rgb = Rgb::new(130, 130, 140);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Container size handed to the session for this viewport.
    pub fn container(&self) -> Size {
        let rows = self.height.saturating_sub(HUD_ROWS + FOOTER_ROWS);
        Size::new(
            self.width as f32 * UNITS_PER_COL,
            rows as f32 * UNITS_PER_ROW,
        )
    }
}

/// Terminal cell span of a container rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellSpan {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl CellSpan {
    fn of(rect: Rect) -> Self {
        let to_col = |v: f32| (v / UNITS_PER_COL).round().max(0.0) as u16;
        let to_row = |v: f32| (v / UNITS_PER_ROW).round().max(0.0) as u16;
        let (x0, x1) = (to_col(rect.x), to_col(rect.right()));
        let (y0, y1) = (to_row(rect.y), to_row(rect.bottom()));
        Self {
            x: x0,
            y: HUD_ROWS + y0,
            w: (x1 - x0).max(1),
            h: (y1 - y0).max(1),
        }
    }
}

#[derive(Debug, Default)]
pub struct PuzzleView;

impl PuzzleView {
    pub fn new() -> Self {
        Self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &SessionSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(TEXT, BG));

        self.draw_hud(fb, snap);

        if let Some(bounds) = snap.board_bounds {
            let span = CellSpan::of(bounds);
            fb.fill_rect(span.x, span.y, span.w, span.h, ' ', CellStyle::new(MUTED, SLOT));
            fb.draw_box(
                span.x.saturating_sub(1),
                span.y.saturating_sub(1),
                span.w + 2,
                span.h + 2,
                CellStyle::new(MUTED, BG),
            );
        }

        match &snap.board {
            BoardSnapshot::Empty => {}
            BoardSnapshot::Slide { size, tiles, .. } => {
                for tile in tiles {
                    let home = (tile.value - 1) as usize;
                    let style = CellStyle::new(TEXT, cell_color(home, *size)).bold();
                    self.draw_cell(fb, tile.rect, &tile.value.to_string(), style);
                }
            }
            BoardSnapshot::Jigsaw {
                pieces, dragging, ..
            } => {
                let grid = snap.difficulty;
                // Placed pieces sit under everything loose.
                let ordered = pieces
                    .iter()
                    .filter(|p| p.placed)
                    .chain(pieces.iter().filter(|p| !p.placed));
                for piece in ordered {
                    let mut style = CellStyle::new(TEXT, cell_color(piece.id, grid));
                    if Some(piece.id) == *dragging {
                        style.bg = style.bg.mix(Rgb::new(255, 255, 255), 0.35);
                        style = style.bold();
                    } else if piece.placed {
                        style = style.dim();
                    }
                    self.draw_cell(fb, piece.rect, &(piece.id + 1).to_string(), style);
                }
            }
        }

        self.draw_overlay(fb, snap, viewport);
        self.draw_footer(fb, snap, viewport);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_cell(&self, fb: &mut FrameBuffer, rect: Rect, label: &str, style: CellStyle) {
        let span = CellSpan::of(rect);
        // One column and row of gutter so neighbours stay distinguishable.
        let w = if span.w > 2 { span.w - 1 } else { span.w };
        let h = if span.h > 1 { span.h - 1 } else { span.h };
        fb.fill_rect(span.x, span.y, w, h, ' ', style);
        fb.put_str_centered(span.x, span.y + h / 2, w, label, None);
    }

    fn draw_hud(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot) {
        let label = CellStyle::new(TEXT, BG).bold();
        let value = CellStyle::new(TEXT, BG);
        let muted = CellStyle::new(MUTED, BG);

        let kind = match snap.game_type {
            GameType::Slide => "SLIDE",
            GameType::Jigsaw => "JIGSAW",
        };
        let n = snap.difficulty;
        let mut x = fb.put_str(0, 0, &format!("{kind} {n}x{n}"), label);
        x = fb.put_str(x + 2, 0, &snap.state.as_str().to_uppercase(), value);
        if !snap.puzzle_id.is_empty() || !snap.category.is_empty() {
            fb.put_str(x + 2, 0, &format!("{} {}", snap.category, snap.puzzle_id), muted);
        }

        let mut x = fb.put_str(0, 1, "moves ", muted);
        x = fb.put_u32(x, 1, snap.moves, value);
        x = fb.put_str(x + 3, 1, "time ", muted);
        x = fb.put_clock(x, 1, snap.elapsed_seconds, value);
        x = fb.put_str(x + 3, 1, "best ", muted);
        x = match snap.best_time {
            Some(best) => fb.put_clock(x, 1, best, value),
            None => fb.put_str(x, 1, "--:--", muted),
        };
        if let BoardSnapshot::Jigsaw { pieces, placed, .. } = &snap.board {
            x = fb.put_str(x + 3, 1, "placed ", muted);
            fb.put_str(x, 1, &format!("{placed}/{}", pieces.len()), value);
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, viewport: Viewport) {
        let text = match snap.state {
            SessionState::Initial => "Loading image...".to_string(),
            SessionState::Ready => "Press Enter to start".to_string(),
            SessionState::Paused => "PAUSED".to_string(),
            SessionState::Solved => format!(
                "SOLVED in {} with {} moves",
                format_clock(snap.elapsed_seconds),
                snap.moves
            ),
            SessionState::Playing => return,
        };
        let (x, y, w, h) = match snap.board_bounds {
            Some(bounds) => {
                let s = CellSpan::of(bounds);
                (s.x, s.y, s.w, s.h)
            }
            None => (
                0,
                HUD_ROWS,
                viewport.width,
                viewport.height.saturating_sub(HUD_ROWS + FOOTER_ROWS),
            ),
        };
        let style = CellStyle::new(Rgb::new(255, 255, 255), BG).bold();
        let padded = format!(" {text} ");
        fb.put_str_centered(x, y + h / 2, w.max(padded.chars().count() as u16), &padded, Some(style));
    }

    fn draw_footer(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, viewport: Viewport) {
        let Some(y) = viewport.height.checked_sub(1) else {
            return;
        };
        if y < HUD_ROWS {
            return;
        }
        let help = match snap.game_type {
            GameType::Slide => "arrows/hjkl slide  click tile",
            GameType::Jigsaw => "drag pieces with the mouse",
        };
        let style = CellStyle::new(MUTED, BG).dim();
        let x = fb.put_str(0, y, help, style);
        fb.put_str(
            x,
            y,
            "  enter start  space pause  x stop  r again  t type  +/- size  q quit",
            style,
        );
    }
}

/// Colour for the cell whose home index is `home` on an `n x n` grid, so the
/// picture reads as a gradient when solved.
fn cell_color(home: usize, n: u8) -> Rgb {
    let n = n.max(2) as usize;
    let (row, col) = (home / n, home % n);
    let fx = col as f32 / (n - 1) as f32;
    let fy = row as f32 / (n - 1) as f32;
    Rgb::new(50, 80, 150)
        .mix(Rgb::new(190, 100, 50), fx)
        .mix(Rgb::new(60, 150, 90), fy * 0.5)
}
