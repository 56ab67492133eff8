//! Board geometry - fitting an N x N board into the host container
//!
//! The board keeps the image's aspect ratio. Its width starts at a fixed share of
//! the container width; if that makes it taller than the allowed share of the
//! container height, both sides shrink proportionally. The board is then centered.
//! Every cell's top-left corner is a piece's home coordinate.

use crate::types::{
    GameType, Point, Rect, Size, BOARD_HEIGHT_FRAC, SNAP_TOLERANCE_RATIO,
};

/// Largest share of the container a board may occupy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitLimits {
    pub max_width_frac: f32,
    pub max_height_frac: f32,
}

impl FitLimits {
    pub fn for_game_type(game_type: GameType) -> Self {
        Self {
            max_width_frac: game_type.board_width_frac(),
            max_height_frac: BOARD_HEIGHT_FRAC,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    container: Size,
    image: Size,
    limits: FitLimits,
    grid: u8,
    board: Rect,
}

impl BoardGeometry {
    /// Lay out a `grid x grid` board for `image` inside `container`.
    pub fn compute(container: Size, image: Size, grid: u8, limits: FitLimits) -> Self {
        let container = Size::new(finite_or_zero(container.width), finite_or_zero(container.height));
        let aspect = image.aspect_ratio();

        let mut width = container.width * limits.max_width_frac;
        let mut height = width / aspect;
        let max_height = container.height * limits.max_height_frac;
        if height > max_height {
            height = max_height;
            width = height * aspect;
        }

        let x = (container.width - width) / 2.0;
        let y = (container.height - height) / 2.0;

        Self {
            container,
            image,
            limits,
            grid: grid.max(1),
            board: Rect::new(x, y, width, height),
        }
    }

    /// Same image, grid and limits in a resized container
    pub fn with_container(&self, container: Size) -> Self {
        Self::compute(container, self.image, self.grid, self.limits)
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn image(&self) -> Size {
        self.image
    }

    pub fn limits(&self) -> FitLimits {
        self.limits
    }

    /// Grid dimension N
    pub fn grid(&self) -> u8 {
        self.grid
    }

    pub fn cell_count(&self) -> usize {
        let n = self.grid as usize;
        n * n
    }

    /// Board rectangle in container coordinates
    pub fn bounds(&self) -> Rect {
        self.board
    }

    /// Top-left corner of the board
    pub fn anchor(&self) -> Point {
        self.board.origin()
    }

    pub fn cell_size(&self) -> Size {
        let n = self.grid as f32;
        Size::new(self.board.width / n, self.board.height / n)
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_size().width
    }

    /// Per-axis distance within which a dropped piece snaps home
    pub fn snap_tolerance(&self) -> f32 {
        SNAP_TOLERANCE_RATIO * self.cell_width()
    }

    /// Cell offset from the board anchor for a row-major cell index
    pub fn cell_offset(&self, index: usize) -> Point {
        let n = self.grid as usize;
        let cell = self.cell_size();
        let row = (index / n) as f32;
        let col = (index % n) as f32;
        Point::new(col * cell.width, row * cell.height)
    }

    /// Home coordinate (top-left corner) of the cell at `index`
    pub fn home_of(&self, index: usize) -> Point {
        self.anchor().plus(self.cell_offset(index))
    }

    pub fn cell_rect(&self, index: usize) -> Rect {
        Rect::from_origin(self.home_of(index), self.cell_size())
    }

    /// Row-major index of the cell under `point`
    pub fn cell_at(&self, point: Point) -> Option<usize> {
        if !self.board.contains(point) {
            return None;
        }
        let n = self.grid as usize;
        let cell = self.cell_size();
        if cell.width <= 0.0 || cell.height <= 0.0 {
            return None;
        }
        let col = (((point.x - self.board.x) / cell.width) as usize).min(n - 1);
        let row = (((point.y - self.board.y) / cell.height) as usize).min(n - 1);
        Some(row * n + col)
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JIGSAW: FitLimits = FitLimits {
        max_width_frac: 0.6,
        max_height_frac: 0.9,
    };

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_wide_container_is_limited_by_height() {
        // 60% of 2000 = 1200 wide; a square image would be 1200 tall > 900.
        let geo = BoardGeometry::compute(
            Size::new(2000.0, 1000.0),
            Size::new(500.0, 500.0),
            4,
            JIGSAW,
        );
        let b = geo.bounds();
        assert!(approx(b.height, 900.0));
        assert!(approx(b.width, 900.0));
        assert!(approx(b.x, 550.0));
        assert!(approx(b.y, 50.0));
    }

    #[test]
    fn test_tall_container_is_limited_by_width() {
        let geo = BoardGeometry::compute(
            Size::new(1000.0, 2000.0),
            Size::new(800.0, 600.0),
            3,
            JIGSAW,
        );
        let b = geo.bounds();
        assert!(approx(b.width, 600.0));
        assert!(approx(b.height, 450.0));
        assert!(approx(b.x, 200.0));
        assert!(approx(b.y, 775.0));
    }

    #[test]
    fn test_home_coordinates_follow_grid() {
        let geo = BoardGeometry::compute(
            Size::new(1000.0, 1000.0),
            Size::new(1.0, 1.0),
            3,
            JIGSAW,
        );
        // 600 x 600 board at (200, 200), 200px cells.
        assert!(approx(geo.cell_width(), 200.0));
        assert_eq!(geo.home_of(0), Point::new(200.0, 200.0));
        assert_eq!(geo.home_of(4), Point::new(400.0, 400.0));
        assert_eq!(geo.home_of(5), Point::new(600.0, 400.0));
        assert!(approx(geo.snap_tolerance(), 60.0));
    }

    #[test]
    fn test_cell_at_maps_points_to_indices() {
        let geo = BoardGeometry::compute(
            Size::new(1000.0, 1000.0),
            Size::new(1.0, 1.0),
            3,
            JIGSAW,
        );
        assert_eq!(geo.cell_at(Point::new(210.0, 210.0)), Some(0));
        assert_eq!(geo.cell_at(Point::new(790.0, 790.0)), Some(8));
        assert_eq!(geo.cell_at(Point::new(100.0, 500.0)), None);
    }

    #[test]
    fn test_degenerate_inputs_do_not_produce_nan() {
        let geo = BoardGeometry::compute(
            Size::new(f32::NAN, 400.0),
            Size::new(0.0, 0.0),
            4,
            JIGSAW,
        );
        let b = geo.bounds();
        assert!(b.x.is_finite() && b.y.is_finite());
        assert!(b.width.is_finite() && b.height.is_finite());
    }

    #[test]
    fn test_with_container_keeps_grid_and_image() {
        let geo = BoardGeometry::compute(
            Size::new(1000.0, 800.0),
            Size::new(4.0, 3.0),
            5,
            JIGSAW,
        );
        let resized = geo.with_container(Size::new(500.0, 400.0));
        assert_eq!(resized.grid(), 5);
        assert_eq!(resized.image(), geo.image());
        assert!(approx(resized.bounds().width, geo.bounds().width / 2.0));
    }
}
