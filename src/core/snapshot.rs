//! Read-only view of the game state for presentation sinks
//!
//! The engine never exposes its internals to the renderer; it fills a
//! caller-owned `GameSnapshot` between ticks. Snapshots are plain data and
//! carry no references back into the engine.

use crate::core::pieces::Tetromino;
use crate::types::{Cell, Phase, PieceKind, BOARD_COLS, BOARD_ROWS};

/// Everything a frame needs to draw: grid, active piece, ghost offset,
/// hold/preview, counters, and phase.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub board: [[Cell; BOARD_COLS as usize]; BOARD_ROWS as usize],
    pub current: Tetromino,
    /// Rows the current piece would fall under a hard drop
    pub ghost_distance: i8,
    pub held: Option<PieceKind>,
    pub hold_used: bool,
    pub next: [PieceKind; 3],
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub phase: Phase,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_COLS as usize]; BOARD_ROWS as usize],
            current: Tetromino::new(PieceKind::I),
            ghost_distance: 0,
            held: None,
            hold_used: false,
            next: [PieceKind::I; 3],
            score: 0,
            level: 1,
            lines: 0,
            combo: 0,
            phase: Phase::Playing,
        }
    }
}
