//! Bag module - 7-bag random piece generation with lookahead
//!
//! Keeps two concatenated shuffled bags (14 slots) buffered so the preview
//! can always peek several pieces ahead without forcing a refill. Standard
//! 7-bag fairness holds: at most 13 pieces separate two same-kind pieces.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::types::PieceKind;

/// Slots per bag; the buffer holds two bags
pub const BAG_SIZE: usize = 7;

/// 7-bag piece generator with a 14-slot lookahead buffer
#[derive(Debug, Clone)]
pub struct PieceBag {
    /// Two concatenated shuffled bags
    slots: [PieceKind; BAG_SIZE * 2],
    /// Read cursor into the first bag; always in 0..=BAG_SIZE
    cursor: usize,
    rng: StdRng,
}

impl PieceBag {
    /// Create a bag seeded from OS entropy
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Create a bag with a fixed seed (deterministic sequences for tests)
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(mut rng: StdRng) -> Self {
        let mut slots = [PieceKind::I; BAG_SIZE * 2];
        slots[..BAG_SIZE].copy_from_slice(&shuffled_bag(&mut rng));
        slots[BAG_SIZE..].copy_from_slice(&shuffled_bag(&mut rng));
        Self {
            slots,
            cursor: 0,
            rng,
        }
    }

    /// Draw the next piece, refilling when the first bag is exhausted
    pub fn draw(&mut self) -> PieceKind {
        if self.cursor >= BAG_SIZE {
            self.refill();
        }
        let kind = self.slots[self.cursor];
        self.cursor += 1;
        kind
    }

    /// Peek at the next `n` upcoming pieces without consuming them.
    ///
    /// Always defined for `n <= BAG_SIZE`: the buffer holds at least 7
    /// unconsumed entries between refills.
    pub fn peek(&self, n: usize) -> &[PieceKind] {
        debug_assert!(n <= BAG_SIZE);
        &self.slots[self.cursor..self.cursor + n]
    }

    /// Discard the buffered sequence and reshuffle both bags (for restarts)
    pub fn reshuffle(&mut self) {
        self.slots[..BAG_SIZE].copy_from_slice(&shuffled_bag(&mut self.rng));
        self.slots[BAG_SIZE..].copy_from_slice(&shuffled_bag(&mut self.rng));
        self.cursor = 0;
    }

    /// Shift the second bag into the first and shuffle a fresh second bag
    fn refill(&mut self) {
        self.slots.copy_within(BAG_SIZE.., 0);
        self.slots[BAG_SIZE..].copy_from_slice(&shuffled_bag(&mut self.rng));
        self.cursor = 0;
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}

/// One uniformly-random permutation of the 7 kinds (Fisher-Yates via rand)
fn shuffled_bag(rng: &mut StdRng) -> [PieceKind; BAG_SIZE] {
    let mut bag = PieceKind::ALL;
    bag.shuffle(rng);
    bag
}
