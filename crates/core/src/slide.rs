//! Slide module - the N x N sliding-tile board
//!
//! Positions are row-major indices `0..N²`. Tokens are `1..=N²`; the token `N²`
//! is the blank. The board is always a permutation of `1..=N²`, so it holds
//! exactly one blank.
//!
//! Only arrangements that pass the parity test can be solved by sliding moves:
//! - N odd: solvable iff the inversion count is even
//! - N even: solvable iff inversions plus the blank's row (counted from the top,
//!   zero-indexed) is odd
//!
//! [`SlideBoard::shuffle`] samples uniform permutations until it finds one that is
//! solvable and not already solved.

use arrayvec::ArrayVec;

use crate::rng::PuzzleRng;
use crate::types::Direction;

/// Count pairs `i < j` of non-blank tokens with `tokens[i] > tokens[j]`.
pub fn count_inversions(tokens: &[u16], blank: u16) -> u32 {
    let mut inversions = 0u32;
    for (i, &a) in tokens.iter().enumerate() {
        if a == blank {
            continue;
        }
        for &b in &tokens[i + 1..] {
            if b != blank && a > b {
                inversions += 1;
            }
        }
    }
    inversions
}

/// Parity test for an `n x n` arrangement whose blank token is `n * n`.
pub fn is_solvable_arrangement(tokens: &[u16], n: u8) -> bool {
    let n = n as usize;
    let blank = (n * n) as u16;
    let inversions = count_inversions(tokens, blank);
    if n % 2 == 1 {
        inversions % 2 == 0
    } else {
        let Some(blank_index) = tokens.iter().position(|&t| t == blank) else {
            return false;
        };
        let blank_row = (blank_index / n) as u32;
        (inversions + blank_row) % 2 == 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideBoard {
    size: u8,
    tiles: Vec<u16>,
}

impl SlideBoard {
    /// Board in its solved configuration: `1..N²` ascending, blank last.
    pub fn solved(size: u8) -> Self {
        let size = size.max(1);
        let count = size as u16 * size as u16;
        Self {
            size,
            tiles: (1..=count).collect(),
        }
    }

    /// Build a board from an explicit arrangement.
    ///
    /// Returns `None` unless `tiles` is a permutation of `1..=size²`.
    pub fn from_tiles(size: u8, tiles: &[u16]) -> Option<Self> {
        if size == 0 {
            return None;
        }
        let count = size as usize * size as usize;
        if tiles.len() != count {
            return None;
        }
        let mut seen = vec![false; count];
        for &t in tiles {
            let idx = (t as usize).checked_sub(1)?;
            if idx >= count || seen[idx] {
                return None;
            }
            seen[idx] = true;
        }
        Some(Self {
            size,
            tiles: tiles.to_vec(),
        })
    }

    /// Grid dimension N
    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The blank token, `N²`
    pub fn blank(&self) -> u16 {
        self.tiles.len() as u16
    }

    pub fn tiles(&self) -> &[u16] {
        &self.tiles
    }

    pub fn tile_at(&self, position: usize) -> Option<u16> {
        self.tiles.get(position).copied()
    }

    pub fn blank_index(&self) -> usize {
        let blank = self.blank();
        self.tiles.iter().position(|&t| t == blank).unwrap_or(0)
    }

    pub fn inversions(&self) -> u32 {
        count_inversions(&self.tiles, self.blank())
    }

    pub fn is_solvable(&self) -> bool {
        is_solvable_arrangement(&self.tiles, self.size)
    }

    pub fn is_solved(&self) -> bool {
        self.tiles
            .iter()
            .enumerate()
            .all(|(i, &t)| t as usize == i + 1)
    }

    /// Replace the arrangement with a uniformly random solvable, unsolved one.
    ///
    /// Returns the number of permutations drawn. Boards smaller than 2 x 2 have
    /// no unsolved arrangement and are left untouched (returns 0).
    pub fn shuffle(&mut self, rng: &mut PuzzleRng) -> u32 {
        if self.size < 2 {
            return 0;
        }
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            rng.shuffle(&mut self.tiles);
            if self.is_solvable() && !self.is_solved() {
                return attempts;
            }
        }
    }

    /// Whether `position` is a horizontal or vertical neighbour of the blank.
    pub fn is_adjacent_to_blank(&self, position: usize) -> bool {
        if position >= self.tiles.len() {
            return false;
        }
        let n = self.size as usize;
        let blank = self.blank_index();
        let (br, bc) = (blank / n, blank % n);
        let (r, c) = (position / n, position % n);
        br.abs_diff(r) + bc.abs_diff(c) == 1
    }

    /// Positions whose tile may move into the blank.
    pub fn movable_positions(&self) -> ArrayVec<usize, 4> {
        let n = self.size as usize;
        let blank = self.blank_index();
        let (row, col) = (blank / n, blank % n);
        let mut out = ArrayVec::new();
        if row > 0 {
            out.push(blank - n);
        }
        if row + 1 < n {
            out.push(blank + n);
        }
        if col > 0 {
            out.push(blank - 1);
        }
        if col + 1 < n {
            out.push(blank + 1);
        }
        out
    }

    /// Slide the tile at `position` into the blank.
    ///
    /// Returns false, leaving the board unchanged, when the position is not
    /// adjacent to the blank.
    pub fn try_move(&mut self, position: usize) -> bool {
        if !self.is_adjacent_to_blank(position) {
            return false;
        }
        let blank = self.blank_index();
        self.tiles.swap(position, blank);
        true
    }

    /// Slide the tile that travels in `direction` into the blank.
    ///
    /// Returns the position the tile moved from.
    pub fn try_move_direction(&mut self, direction: Direction) -> Option<usize> {
        let n = self.size as i32;
        let blank = self.blank_index() as i32;
        let (d_row, d_col) = direction.delta();
        // The moving tile sits on the opposite side of the blank.
        let row = blank / n - d_row;
        let col = blank % n - d_col;
        if row < 0 || row >= n || col < 0 || col >= n {
            return None;
        }
        let position = (row * n + col) as usize;
        self.try_move(position).then_some(position)
    }
}
