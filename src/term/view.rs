//! GameView: draws a `GameSnapshot` onto the screen's back buffer.
//!
//! No terminal I/O happens here, so a full frame can be unit-tested by
//! reading the buffer back.

use crate::core::pieces::get_color;
use crate::core::GameSnapshot;
use crate::term::screen::{GlyphStyle, Screen};
use crate::types::{Phase, PieceKind, Rgb, BOARD_COLS, HIDDEN_ROWS, VISIBLE_ROWS};

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
}

/// Playfield, side panel, and overlay drawing.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self { cell_w, cell_h }
    }

    /// Draw a full frame for the snapshot. Only the 20 visible rows are
    /// drawn; the hidden spawn buffer is clipped.
    pub fn render(&self, snapshot: &GameSnapshot, viewport: Viewport, screen: &mut Screen) {
        screen.begin_frame(viewport.width, viewport.height);

        let board_px_w = (BOARD_COLS as u16) * self.cell_w;
        let board_px_h = (VISIBLE_ROWS as u16) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let bg = GlyphStyle {
            fg: Rgb::new(80, 80, 90),
            bg: Rgb::new(30, 30, 40),
            bold: false,
            dim: false,
        };
        let border = GlyphStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };

        // Background for play area.
        screen.fill_rect(start_x + 1, start_y + 1, board_px_w, board_px_h, ' ', bg);

        // Border.
        self.draw_border(screen, start_x, start_y, frame_w, frame_h, border);

        // Locked board cells.
        for vy in 0..VISIBLE_ROWS as u16 {
            for x in 0..BOARD_COLS as u16 {
                let row = (vy + HIDDEN_ROWS as u16) as usize;
                match snapshot.board[row][x as usize] {
                    Some(kind) => self.draw_board_cell(screen, start_x, start_y, x, vy, kind),
                    None => self.draw_empty_cell(screen, start_x, start_y, x, vy),
                }
            }
        }

        if snapshot.phase != Phase::GameOver {
            // Ghost piece at the hard-drop landing position.
            if snapshot.ghost_distance > 0 {
                let ghost_style = GlyphStyle {
                    fg: Rgb::new(140, 140, 140),
                    bg: Rgb::new(30, 30, 40),
                    bold: false,
                    dim: true,
                };
                let piece = &snapshot.current;
                let ghost_row = piece.row + snapshot.ghost_distance;
                for (col, row) in piece.cells_at(piece.col, ghost_row, piece.rotation) {
                    if let Some((x, vy)) = visible_cell(col, row) {
                        self.fill_cell_rect(screen, start_x, start_y, x, vy, '░', ghost_style);
                    }
                }
            }

            // Active piece.
            for (col, row) in snapshot.current.cells() {
                if let Some((x, vy)) = visible_cell(col, row) {
                    self.draw_board_cell(screen, start_x, start_y, x, vy, snapshot.current.kind);
                }
            }
        }

        // Side panel (score/level/lines/combo, hold, preview).
        self.draw_side_panel(screen, snapshot, viewport, start_x, start_y, frame_w);

        // Overlays.
        match snapshot.phase {
            Phase::Paused => {
                self.draw_overlay_text(screen, start_x, start_y, frame_w, frame_h, 0, "PAUSED");
            }
            Phase::GameOver => {
                self.draw_overlay_text(screen, start_x, start_y, frame_w, frame_h, 0, "GAME OVER");
                self.draw_overlay_text(
                    screen,
                    start_x,
                    start_y,
                    frame_w,
                    frame_h,
                    2,
                    "SPACE RESTARTS",
                );
            }
            Phase::Playing => {}
        }
    }

    fn draw_border(&self, screen: &mut Screen, x: u16, y: u16, w: u16, h: u16, style: GlyphStyle) {
        if w < 2 || h < 2 {
            return;
        }

        screen.put_char(x, y, '┌', style);
        screen.put_char(x + w - 1, y, '┐', style);
        screen.put_char(x, y + h - 1, '└', style);
        screen.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            screen.put_char(x + dx, y, '─', style);
            screen.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            screen.put_char(x, y + dy, '│', style);
            screen.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, screen: &mut Screen, start_x: u16, start_y: u16, x: u16, y: u16) {
        let style = GlyphStyle {
            fg: Rgb::new(90, 90, 100),
            bg: Rgb::new(30, 30, 40),
            bold: false,
            dim: true,
        };
        self.fill_cell_rect(screen, start_x, start_y, x, y, '·', style);
    }

    fn draw_board_cell(
        &self,
        screen: &mut Screen,
        start_x: u16,
        start_y: u16,
        x: u16,
        y: u16,
        kind: PieceKind,
    ) {
        let style = GlyphStyle {
            fg: get_color(kind),
            bg: Rgb::new(30, 30, 40),
            bold: true,
            dim: false,
        };
        self.fill_cell_rect(screen, start_x, start_y, x, y, '█', style);
    }

    fn fill_cell_rect(
        &self,
        screen: &mut Screen,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: GlyphStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        screen.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        screen: &mut Screen,
        snapshot: &GameSnapshot,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 8 {
            return;
        }

        let label = GlyphStyle {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        let value = GlyphStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };

        let mut y = start_y;
        let mut counter = |label_text: &str, value_text: String, y: &mut u16| {
            screen.put_str(panel_x, *y, label_text, label);
            *y = y.saturating_add(1);
            screen.put_str(panel_x, *y, &value_text, value);
            *y = y.saturating_add(2);
        };

        counter("SCORE", format!("{}", snapshot.score), &mut y);
        counter("LEVEL", format!("{}", snapshot.level), &mut y);
        counter("LINES", format!("{}", snapshot.lines), &mut y);
        counter("COMBO", format!("{}", snapshot.combo), &mut y);

        screen.put_str(panel_x, y, "HOLD", label);
        y = y.saturating_add(1);
        let hold_style = if snapshot.hold_used {
            GlyphStyle { dim: true, ..value }
        } else {
            value
        };
        screen.put_str(
            panel_x,
            y,
            snapshot.held.map(|k| k.as_str()).unwrap_or("-"),
            hold_style,
        );
        y = y.saturating_add(2);

        screen.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        for kind in snapshot.next {
            if y >= viewport.height {
                break;
            }
            screen.put_str(panel_x, y, kind.as_str(), value);
            y = y.saturating_add(1);
        }
    }

    fn draw_overlay_text(
        &self,
        screen: &mut Screen,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        dy: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2).saturating_add(dy);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = GlyphStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        screen.put_str(x, mid_y, text, style);
    }
}

/// Board (col, row) to visible viewport cell, clipping the hidden rows.
fn visible_cell(col: i8, row: i8) -> Option<(u16, u16)> {
    if col < 0 || col >= BOARD_COLS as i8 {
        return None;
    }
    let vy = row - HIDDEN_ROWS as i8;
    if vy < 0 || vy >= VISIBLE_ROWS as i8 {
        return None;
    }
    Some((col as u16, vy as u16))
}
