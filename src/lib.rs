//! Falling-block puzzle game: rules engine plus terminal front end.
//!
//! `core` holds the deterministic rules state machine and has no terminal
//! dependencies; `input` resolves raw key events into per-tick action
//! queries; `term` renders snapshots to the terminal.

pub mod core;
pub mod input;
pub mod term;
pub mod types;
