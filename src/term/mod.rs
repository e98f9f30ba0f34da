//! Terminal rendering layer.
//!
//! `screen` owns the terminal session and a double-buffered glyph grid that
//! flushes as diffed spans. `view` stays pure so the whole presentation of a
//! snapshot can be unit-tested without a terminal.

pub mod screen;
pub mod view;

pub use screen::{Glyph, GlyphStyle, Screen};
pub use view::{GameView, Viewport};
