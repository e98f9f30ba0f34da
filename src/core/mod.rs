//! Core game logic, independent of any terminal or input backend

pub mod bag;
pub mod board;
pub mod game;
pub mod pieces;
pub mod snapshot;

pub use bag::PieceBag;
pub use board::Board;
pub use game::{Game, InputSource};
pub use pieces::Tetromino;
pub use snapshot::GameSnapshot;
