//! Board module - manages the playfield grid
//!
//! The playfield is 10 columns x 22 rows where each cell is empty or holds the
//! kind of the piece that filled it. The top 2 rows are a hidden spawn buffer;
//! rows 2..21 are visible. Uses a flat array for cache locality and
//! zero-allocation. Coordinates: (col, row), row 0 is the topmost hidden row.

use arrayvec::ArrayVec;

use crate::core::pieces::Tetromino;
use crate::types::{Cell, Rotation, BOARD_COLS, BOARD_ROWS};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_COLS as usize) * (BOARD_ROWS as usize);

/// The playfield - 10 columns x 22 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (row * COLS + col)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (col, row) coordinates
    #[inline(always)]
    fn index(col: i8, row: i8) -> Option<usize> {
        if col < 0 || col >= BOARD_COLS as i8 || row < 0 || row >= BOARD_ROWS as i8 {
            return None;
        }
        Some((row as usize) * (BOARD_COLS as usize) + (col as usize))
    }

    /// Check if (col, row) lies inside the grid
    pub fn is_in_bounds(&self, col: i8, row: i8) -> bool {
        col >= 0 && col < BOARD_COLS as i8 && row >= 0 && row < BOARD_ROWS as i8
    }

    /// Check if a position is occupied. Out-of-bounds counts as occupied,
    /// which makes every off-grid placement read as a collision.
    pub fn is_occupied(&self, col: i8, row: i8) -> bool {
        match Self::index(col, row) {
            Some(idx) => self.cells[idx].is_some(),
            None => true,
        }
    }

    /// Check if a position is free (within bounds and empty)
    pub fn is_free(&self, col: i8, row: i8) -> bool {
        matches!(Self::index(col, row), Some(idx) if self.cells[idx].is_none())
    }

    /// Get cell at (col, row). Returns None if out of bounds.
    pub fn get(&self, col: i8, row: i8) -> Option<Cell> {
        Self::index(col, row).map(|idx| self.cells[idx])
    }

    /// Set cell at (col, row). Returns false if out of bounds.
    pub fn set(&mut self, col: i8, row: i8, cell: Cell) -> bool {
        match Self::index(col, row) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Single authority for placement legality: true iff all 4 cells the
    /// piece would occupy at (test_col, test_row, test_rotation) are in
    /// bounds and empty. Every move/rotate/gravity/lock check routes here.
    pub fn is_valid_position(
        &self,
        piece: &Tetromino,
        test_col: i8,
        test_row: i8,
        test_rotation: Rotation,
    ) -> bool {
        piece
            .cells_at(test_col, test_row, test_rotation)
            .iter()
            .all(|&(col, row)| self.is_free(col, row))
    }

    /// Lock a piece into the grid at its current placement, then clear any
    /// full rows. Returns the number of rows cleared (0-4).
    ///
    /// Cells that fall out of bounds are skipped rather than wrapping; the
    /// only caller that can present one is the game-over lock.
    pub fn lock_piece(&mut self, piece: &Tetromino) -> usize {
        for (col, row) in piece.cells() {
            if let Some(idx) = Self::index(col, row) {
                self.cells[idx] = Some(piece.kind);
            }
        }
        self.clear_full_rows().len()
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= BOARD_ROWS as usize {
            return false;
        }
        let start = row * BOARD_COLS as usize;
        let end = start + BOARD_COLS as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Clear all full rows and return their original indices.
    ///
    /// Compacts in a single bottom-up pass: non-full rows are written to the
    /// lowest open row, so adjacent full rows can never cause an index-shift
    /// skip. Returned indices are sorted top to bottom.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, 4> {
        let mut cleared_rows = ArrayVec::new();
        let cols = BOARD_COLS as usize;
        let mut write_row = BOARD_ROWS as usize;

        for read_row in (0..BOARD_ROWS as usize).rev() {
            if self.is_row_full(read_row) {
                cleared_rows.push(read_row);
            } else {
                write_row -= 1;
                if write_row != read_row {
                    let src = read_row * cols;
                    let dst = write_row * cols;
                    self.cells.copy_within(src..src + cols, dst);
                }
            }
        }

        // Re-empty the rows vacated at the top.
        for cell in &mut self.cells[..write_row * cols] {
            *cell = None;
        }

        cleared_rows.reverse();
        cleared_rows
    }

    /// Maximum number of rows the piece can fall from its current position
    /// before the next row down would be invalid.
    pub fn ghost_drop_distance(&self, piece: &Tetromino) -> i8 {
        let mut dist: i8 = 0;
        while dist < BOARD_ROWS as i8 {
            if !self.is_valid_position(piece, piece.col, piece.row + dist + 1, piece.rotation) {
                break;
            }
            dist += 1;
        }
        dist
    }

    /// Wipe all cells back to empty
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Copy the grid into a caller-owned 2D array (for snapshots)
    pub fn write_grid(&self, out: &mut [[Cell; BOARD_COLS as usize]; BOARD_ROWS as usize]) {
        for (row, out_row) in out.iter_mut().enumerate() {
            let start = row * BOARD_COLS as usize;
            out_row.copy_from_slice(&self.cells[start..start + BOARD_COLS as usize]);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
