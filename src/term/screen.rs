//! Double-buffered terminal screen.
//!
//! Owns the raw-mode/alternate-screen lifecycle and a pair of glyph buffers
//! sized to the viewport. The view draws a frame into the back buffer;
//! `flush` diffs it against what the terminal is already showing and rewrites
//! only the spans that changed, one cursor move per span.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::types::Rgb;

/// Minimal per-glyph styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        }
    }
}

/// One terminal cell: a character plus its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub style: GlyphStyle,
}

impl Default for Glyph {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: GlyphStyle::default(),
        }
    }
}

/// A changed region within one row: (x, y, length in glyphs).
pub type Span = (u16, u16, u16);

pub struct Screen {
    stdout: io::Stdout,
    width: u16,
    height: u16,
    /// Frame being drawn
    back: Vec<Glyph>,
    /// What the terminal currently shows
    front: Vec<Glyph>,
    force_full: bool,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            width: 0,
            height: 0,
            back: Vec::new(),
            front: Vec::new(),
            force_full: true,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Force the next flush to repaint everything (on terminal resize).
    pub fn invalidate(&mut self) {
        self.force_full = true;
    }

    /// Start a frame: adopt the viewport size and blank the back buffer.
    /// A size change also invalidates the front buffer.
    pub fn begin_frame(&mut self, width: u16, height: u16) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            let len = (width as usize) * (height as usize);
            self.back = vec![Glyph::default(); len];
            self.front = vec![Glyph::default(); len];
            self.force_full = true;
        } else {
            self.back.fill(Glyph::default());
        }
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Read back what the current frame holds at (x, y).
    pub fn get(&self, x: u16, y: u16) -> Option<Glyph> {
        self.idx(x, y).map(|i| self.back[i])
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: GlyphStyle) {
        if let Some(i) = self.idx(x, y) {
            self.back[i] = Glyph { ch, style };
        }
    }

    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: GlyphStyle) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.put_char(cx, y, ch, style);
            cx += 1;
        }
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: GlyphStyle) {
        for dy in 0..h {
            for dx in 0..w {
                self.put_char(x.saturating_add(dx), y.saturating_add(dy), ch, style);
            }
        }
    }

    /// Spans where the drawn frame differs from what the terminal shows.
    pub fn changed_spans(&self) -> Vec<Span> {
        let w = self.width as usize;
        let mut spans = Vec::new();
        for y in 0..self.height as usize {
            let row = y * w;
            let mut x = 0;
            while x < w {
                if self.back[row + x] == self.front[row + x] {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < w && self.back[row + x] != self.front[row + x] {
                    x += 1;
                }
                spans.push((start as u16, y as u16, (x - start) as u16));
            }
        }
        spans
    }

    /// Write the frame out and promote it to the front buffer.
    pub fn flush(&mut self) -> Result<()> {
        let spans = if std::mem::take(&mut self.force_full) {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            (0..self.height).map(|y| (0, y, self.width)).collect()
        } else {
            self.changed_spans()
        };

        let w = self.width as usize;
        let mut current_style: Option<GlyphStyle> = None;
        for (x, y, len) in spans {
            self.stdout.queue(cursor::MoveTo(x, y))?;
            let start = (y as usize) * w + (x as usize);
            for glyph in &self.back[start..start + len as usize] {
                if current_style != Some(glyph.style) {
                    apply_style(&mut self.stdout, glyph.style)?;
                    current_style = Some(glyph.style);
                }
                self.stdout.queue(Print(glyph.ch))?;
            }
        }

        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.flush()?;

        self.front.copy_from_slice(&self.back);
        Ok(())
    }

    /// Promote the frame without terminal I/O (diff baseline for tests).
    #[cfg(test)]
    fn promote(&mut self) {
        self.front.copy_from_slice(&self.back);
        self.force_full = false;
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_style(stdout: &mut io::Stdout, style: GlyphStyle) -> Result<()> {
    stdout.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    stdout.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    stdout.queue(SetAttribute(Attribute::Reset))?;
    if style.bold {
        stdout.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        stdout.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
