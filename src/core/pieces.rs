//! Pieces module - tetromino shapes and SRS rotation system
//!
//! Implements Standard Rotation System (SRS) with wall kick tables.
//! Reference: https://tetris.wiki/SRS

use crate::types::{PieceKind, Rgb, Rotation, BOARD_COLS};

/// Offset of a single cell relative to the piece anchor
pub type CellOffset = (i8, i8);

/// Shape of a piece - 4 cell offsets from the piece anchor
pub type PieceShape = [CellOffset; 4];

/// Spawn anchor (col, row). Top-center; with the 4x4 SRS shape boxes every
/// kind's cells land inside the two hidden rows.
pub const SPAWN_POSITION: (i8, i8) = (BOARD_COLS as i8 / 2 - 2, 0);

/// Get the shape (cell offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => get_i_shape(rotation),
        PieceKind::O => get_o_shape(rotation),
        PieceKind::T => get_t_shape(rotation),
        PieceKind::S => get_s_shape(rotation),
        PieceKind::Z => get_z_shape(rotation),
        PieceKind::J => get_j_shape(rotation),
        PieceKind::L => get_l_shape(rotation),
    }
}

/// Fixed display color for a piece kind
pub fn get_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    }
}

/// I piece shapes
fn get_i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

/// O piece shapes (same for all rotations)
fn get_o_shape(_rotation: Rotation) -> PieceShape {
    [(1, 0), (2, 0), (1, 1), (2, 1)]
}

/// T piece shapes
fn get_t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// S piece shapes
fn get_s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// Z piece shapes
fn get_z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

/// J piece shapes
fn get_j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

/// L piece shapes
fn get_l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// SRS wall kick offsets, indexed by [source rotation][attempt].
/// Each transition tries 5 candidate (dx, dy) offsets in order.
pub type KickTable = [[(i8, i8); 5]; 4];

/// JLSTZ clockwise kicks (shared by J, L, S, T, Z)
const JLSTZ_KICKS_CW: KickTable = [
    // N->E
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // E->S
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // S->W
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // W->N
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// JLSTZ counter-clockwise kicks
const JLSTZ_KICKS_CCW: KickTable = [
    // N->W
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // E->N
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // S->E
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // W->S
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// I piece clockwise kicks (different from JLSTZ)
const I_KICKS_CW: KickTable = [
    // N->E
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // E->S
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // S->W
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // W->N
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
];

/// I piece counter-clockwise kicks
const I_KICKS_CCW: KickTable = [
    // N->W
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // E->N
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // S->E
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // W->S
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
];

/// Kick table for a piece kind and rotation direction.
/// The O piece never rotates and has no table; callers skip it entirely.
pub fn get_kick_table(kind: PieceKind, clockwise: bool) -> &'static KickTable {
    match (kind, clockwise) {
        (PieceKind::I, true) => &I_KICKS_CW,
        (PieceKind::I, false) => &I_KICKS_CCW,
        (_, true) => &JLSTZ_KICKS_CW,
        (_, false) => &JLSTZ_KICKS_CCW,
    }
}

/// Try to rotate a piece with SRS wall kicks.
///
/// Tries the 5 candidate offsets in table order and returns the first
/// `(new_rotation, (dx, dy))` that passes `is_free` for all four cells,
/// or None if every kick fails (rotation is then a silent no-op).
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    col: i8,
    row: i8,
    clockwise: bool,
    is_free: impl Fn(i8, i8) -> bool,
) -> Option<(Rotation, (i8, i8))> {
    let new_rotation = if clockwise {
        rotation.rotate_cw()
    } else {
        rotation.rotate_ccw()
    };

    let new_shape = get_shape(kind, new_rotation);
    let kicks = &get_kick_table(kind, clockwise)[rotation.index()];

    for &(dx, dy) in kicks.iter() {
        let new_col = col + dx;
        let new_row = row + dy;

        let valid = new_shape
            .iter()
            .all(|&(cx, cy)| is_free(new_col + cx, new_row + cy));

        if valid {
            return Some((new_rotation, (dx, dy)));
        }
    }

    None
}

/// Active falling piece: identity plus anchor position and rotation state.
/// Absolute cell occupancy is always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub col: i8,
    pub row: i8,
}

impl Tetromino {
    /// Create a new tetromino at the spawn anchor
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            col: SPAWN_POSITION.0,
            row: SPAWN_POSITION.1,
        }
    }

    /// Absolute (col, row) of all four cells at the current placement
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.cells_at(self.col, self.row, self.rotation)
    }

    /// Absolute (col, row) of all four cells at a hypothetical placement
    pub fn cells_at(&self, col: i8, row: i8, rotation: Rotation) -> [(i8, i8); 4] {
        let shape = get_shape(self.kind, rotation);
        [
            (col + shape[0].0, row + shape[0].1),
            (col + shape[1].0, row + shape[1].1),
            (col + shape[2].0, row + shape[2].1),
            (col + shape[3].0, row + shape[3].1),
        ]
    }

    /// Display color of this piece
    pub fn color(&self) -> Rgb {
        get_color(self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_has_four_cells_in_box() {
        for kind in PieceKind::ALL {
            for rotation in [
                Rotation::North,
                Rotation::East,
                Rotation::South,
                Rotation::West,
            ] {
                let shape = get_shape(kind, rotation);
                for &(dx, dy) in shape.iter() {
                    assert!((0..4).contains(&dx), "{:?} {:?} dx={}", kind, rotation, dx);
                    assert!((0..4).contains(&dy), "{:?} {:?} dy={}", kind, rotation, dy);
                }
            }
        }
    }

    #[test]
    fn test_o_shape_identical_for_all_rotations() {
        let north = get_shape(PieceKind::O, Rotation::North);
        for rotation in [Rotation::East, Rotation::South, Rotation::West] {
            assert_eq!(get_shape(PieceKind::O, rotation), north);
        }
    }

    #[test]
    fn test_first_kick_is_always_identity() {
        for kind in [PieceKind::I, PieceKind::T] {
            for clockwise in [true, false] {
                let table = get_kick_table(kind, clockwise);
                for from in table.iter() {
                    assert_eq!(from[0], (0, 0));
                }
            }
        }
    }

    #[test]
    fn test_try_rotate_open_space_uses_identity_kick() {
        let result = try_rotate(PieceKind::T, Rotation::North, 3, 5, true, |_, _| true);
        assert_eq!(result, Some((Rotation::East, (0, 0))));
    }

    #[test]
    fn test_try_rotate_all_kicks_blocked() {
        let result = try_rotate(PieceKind::T, Rotation::North, 3, 5, true, |_, _| false);
        assert_eq!(result, None);
    }

    #[test]
    fn test_tetromino_spawns_inside_hidden_rows() {
        for kind in PieceKind::ALL {
            let piece = Tetromino::new(kind);
            for (_, row) in piece.cells() {
                assert!(row < 2, "{:?} spawns into visible rows", kind);
            }
        }
    }

    #[test]
    fn test_tetromino_cells_track_anchor() {
        let mut piece = Tetromino::new(PieceKind::I);
        let before = piece.cells();
        piece.col += 2;
        piece.row += 3;
        let after = piece.cells();
        for i in 0..4 {
            assert_eq!(after[i].0, before[i].0 + 2);
            assert_eq!(after[i].1, before[i].1 + 3);
        }
    }
}
