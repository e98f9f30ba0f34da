//! Core types shared across the application
//! This module contains pure data types with no external dependencies

/// Board dimensions. The top two rows are a hidden spawn buffer;
/// only the bottom `VISIBLE_ROWS` rows are drawn.
pub const BOARD_COLS: u8 = 10;
pub const BOARD_ROWS: u8 = 22;
pub const HIDDEN_ROWS: u8 = 2;
pub const VISIBLE_ROWS: u8 = BOARD_ROWS - HIDDEN_ROWS;

/// Logical tick length for the run loop (milliseconds)
pub const TICK_MS: u32 = 16;

/// Maximum dt handed to the engine per tick (seconds). The caller clamps to
/// this so a stall cannot trigger runaway multi-row gravity catch-up.
pub const MAX_FRAME_DT: f32 = 0.05;

/// Game timing constants (seconds)
pub const LOCK_DELAY_SECS: f32 = 0.5;
pub const SOFT_DROP_INTERVAL_SECS: f32 = 0.05;

/// DAS/ARR timing for the input handler (milliseconds)
pub const DAS_DELAY_MS: u32 = 150;
pub const DAS_INTERVAL_MS: u32 = 50;

/// Line clear scoring table, indexed by lines cleared (0-4)
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Combo scoring base
pub const COMBO_BASE: u32 = 50;

/// Hard drop awards 2 points per row dropped
pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;

/// Level advances every 10 cleared lines
pub const LINES_PER_LEVEL: u32 = 10;

/// Gravity formula clamps the level to this ceiling
pub const MAX_GRAVITY_LEVEL: u32 = 20;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All seven kinds, in a fixed order (one full bag before shuffling)
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Convert to a display letter
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// Rotation states (North = spawn orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Index into kick tables (North = 0, clockwise order)
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// Abstract input actions. Auto-repeat resolution lives in the input source;
/// the engine only sees per-tick triggered/active/held queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Hold,
    Pause,
    Quit,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::SoftDrop,
        Action::HardDrop,
        Action::RotateCw,
        Action::RotateCcw,
        Action::Hold,
        Action::Pause,
        Action::Quit,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Game lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Paused,
    GameOver,
}

/// Cell on the board (None = empty, Some = filled with piece kind)
pub type Cell = Option<PieceKind>;

/// 24-bit RGB color used for piece and terminal styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}
