//! Game module - the rules state machine
//!
//! Ties together board, pieces, and bag: spawning, movement, rotation with
//! wall kicks, hold, drops, gravity, lock delay, scoring, and leveling.
//! Single-writer, cooperative step model: exactly one `update(input, dt)`
//! call per logical tick mutates state; snapshots are read between ticks.

use crate::core::pieces::{self, Tetromino};
use crate::core::snapshot::GameSnapshot;
use crate::core::{Board, PieceBag};
use crate::types::{
    Action, Phase, PieceKind, COMBO_BASE, HARD_DROP_POINTS_PER_ROW, LINES_PER_LEVEL, LINE_SCORES,
    LOCK_DELAY_SECS, MAX_GRAVITY_LEVEL, SOFT_DROP_INTERVAL_SECS,
};

/// Per-tick input queries the engine consumes. Auto-repeat (DAS/ARR) is
/// entirely the implementor's responsibility; the engine never sees raw
/// key events.
pub trait InputSource {
    /// True exactly on the tick the action transitioned to active
    fn just_triggered(&self, action: Action) -> bool;
    /// True if just triggered or firing an auto-repeat pulse this tick
    fn is_active(&self, action: Action) -> bool;
    /// Raw held state (used for the soft-drop interval override)
    fn is_held(&self, action: Action) -> bool;
}

/// Seconds per gravity row for a level. Pure function of level; the game
/// caches the result and recomputes only when the level changes.
pub fn gravity_interval(level: u32) -> f32 {
    let level = level.clamp(1, MAX_GRAVITY_LEVEL);
    // Guideline curve: (0.8 - (level-1)*0.007)^(level-1)
    let base = 0.8 - (level - 1) as f32 * 0.007;
    base.powi(level as i32 - 1)
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    current: Tetromino,
    held: Option<PieceKind>,
    hold_used: bool,
    bag: PieceBag,

    score: u32,
    level: u32,
    lines: u32,
    combo: u32,

    phase: Phase,

    gravity_accum: f32,
    gravity_interval: f32,
    lock_timer: f32,
    ghost_distance: i8,
}

impl Game {
    /// Create a new game seeded from OS entropy
    pub fn new() -> Self {
        Self::with_bag(PieceBag::new())
    }

    /// Create a new game with a deterministic piece sequence
    pub fn seeded(seed: u64) -> Self {
        Self::with_bag(PieceBag::seeded(seed))
    }

    fn with_bag(mut bag: PieceBag) -> Self {
        let first = bag.draw();
        let mut game = Self {
            board: Board::new(),
            current: Tetromino::new(first),
            held: None,
            hold_used: false,
            bag,
            score: 0,
            level: 1,
            lines: 0,
            combo: 0,
            phase: Phase::Playing,
            gravity_accum: 0.0,
            gravity_interval: gravity_interval(1),
            lock_timer: 0.0,
            ghost_distance: 0,
        };
        game.update_ghost();
        game
    }

    /// Full reset back to a fresh Playing state. The bag reshuffles from its
    /// live RNG, so restarts do not replay the previous sequence.
    pub fn reset(&mut self) {
        self.board.reset();
        self.held = None;
        self.hold_used = false;
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.combo = 0;
        self.phase = Phase::Playing;
        self.gravity_accum = 0.0;
        self.gravity_interval = gravity_interval(1);
        self.lock_timer = 0.0;
        self.bag.reshuffle();
        let first = self.bag.draw();
        self.spawn(first);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> &Tetromino {
        &self.current
    }

    /// Held piece kind, if any
    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    /// True while hold is locked out (until the next successful lock)
    pub fn hold_used(&self) -> bool {
        self.hold_used
    }

    /// Rows the current piece would fall under a hard drop
    pub fn ghost_distance(&self) -> i8 {
        self.ghost_distance
    }

    /// Next three upcoming piece kinds (non-consuming)
    pub fn next_pieces(&self) -> [PieceKind; 3] {
        let preview = self.bag.peek(3);
        [preview[0], preview[1], preview[2]]
    }

    /// Mutable board access for scenario setup in tests and benches
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Advance one logical tick. Returns false when the quit action
    /// requests the run to terminate.
    pub fn update(&mut self, input: &impl InputSource, dt: f32) -> bool {
        if input.just_triggered(Action::Quit) {
            return false;
        }

        if input.just_triggered(Action::Pause) {
            self.phase = match self.phase {
                Phase::Playing => Phase::Paused,
                Phase::Paused => Phase::Playing,
                Phase::GameOver => Phase::GameOver,
            };
        }

        if self.phase == Phase::GameOver {
            // Hard drop doubles as "restart" on the game-over screen.
            if input.just_triggered(Action::HardDrop) {
                self.reset();
            }
            return true;
        }

        if self.phase == Phase::Paused {
            return true;
        }

        if input.is_active(Action::MoveLeft) {
            self.try_move(-1, 0);
        }
        if input.is_active(Action::MoveRight) {
            self.try_move(1, 0);
        }
        if input.just_triggered(Action::RotateCw) {
            self.try_rotate(true);
        }
        if input.just_triggered(Action::RotateCcw) {
            self.try_rotate(false);
        }
        if input.just_triggered(Action::Hold) {
            self.activate_hold();
        }
        // A hold-triggered spawn can top out; the tick ends there and the
        // drop/gravity steps below never touch the overlapping piece.
        if self.phase == Phase::GameOver {
            return true;
        }
        if input.just_triggered(Action::HardDrop) {
            self.hard_drop();
            return true;
        }

        // Soft drop clamps the gravity interval and awards 1 point per tick
        // held, not per row actually advanced.
        let mut effective_interval = self.gravity_interval;
        if input.is_held(Action::SoftDrop) {
            effective_interval = effective_interval.min(SOFT_DROP_INTERVAL_SECS);
            self.score += 1;
        }

        // Gravity: may fire zero, one, or several rows depending on dt.
        self.gravity_accum += dt;
        while self.gravity_accum >= effective_interval {
            self.gravity_accum -= effective_interval;
            if self.board.is_valid_position(
                &self.current,
                self.current.col,
                self.current.row + 1,
                self.current.rotation,
            ) {
                self.current.row += 1;
                self.update_ghost();
            }
        }

        // Lock delay: the timer only accumulates while grounded.
        if self.is_grounded() {
            self.lock_timer += dt;
            if self.lock_timer >= LOCK_DELAY_SECS {
                self.lock_current();
            }
        } else {
            self.lock_timer = 0.0;
        }

        true
    }

    /// True when the row below the current placement is invalid
    pub fn is_grounded(&self) -> bool {
        !self.board.is_valid_position(
            &self.current,
            self.current.col,
            self.current.row + 1,
            self.current.rotation,
        )
    }

    /// Try to shift the current piece by (dx, dy)
    pub fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        let col = self.current.col + dx;
        let row = self.current.row + dy;
        if !self
            .board
            .is_valid_position(&self.current, col, row, self.current.rotation)
        {
            return false;
        }

        self.current.col = col;
        self.current.row = row;
        if dy == 0 {
            // Move reset: a lateral shift grants a fresh lock-delay window.
            self.lock_timer = 0.0;
        }
        self.update_ghost();
        true
    }

    /// Try to rotate the current piece with wall kicks
    pub fn try_rotate(&mut self, clockwise: bool) -> bool {
        // The square kind has no meaningful rotation and skips kick testing.
        if self.current.kind == PieceKind::O {
            return false;
        }

        let result = pieces::try_rotate(
            self.current.kind,
            self.current.rotation,
            self.current.col,
            self.current.row,
            clockwise,
            |col, row| self.board.is_free(col, row),
        );

        let Some((rotation, (dx, dy))) = result else {
            return false;
        };

        self.current.rotation = rotation;
        self.current.col += dx;
        self.current.row += dy;
        self.lock_timer = 0.0;
        self.update_ghost();
        true
    }

    /// Drop the current piece to its resting row and lock immediately,
    /// bypassing lock delay. Awards 2 points per row dropped.
    pub fn hard_drop(&mut self) {
        let dist = self.board.ghost_drop_distance(&self.current);
        self.current.row += dist;
        self.score += HARD_DROP_POINTS_PER_ROW * dist as u32;
        self.lock_current();
    }

    /// Stash or swap the current piece. Locked out until the next lock.
    pub fn activate_hold(&mut self) {
        if self.hold_used {
            return;
        }
        self.hold_used = true;

        let stashed = self.held.replace(self.current.kind);
        match stashed {
            Some(kind) => self.spawn(kind),
            None => {
                let next = self.bag.draw();
                self.spawn(next);
            }
        }
    }

    /// Lock the current piece, score any cleared lines, and spawn the next
    pub fn lock_current(&mut self) {
        let cleared = self.board.lock_piece(&self.current);
        self.apply_clear_score(cleared);
        self.hold_used = false;
        let next = self.bag.draw();
        self.spawn(next);
    }

    fn apply_clear_score(&mut self, lines: usize) {
        if (1..=4).contains(&lines) {
            self.score += LINE_SCORES[lines] * self.level;
            self.combo += 1;
            self.score += COMBO_BASE * self.combo * self.level;
        } else {
            self.combo = 0;
        }

        self.lines += lines as u32;
        let new_level = self.lines / LINES_PER_LEVEL + 1;
        if new_level > self.level {
            self.level = new_level;
            self.gravity_interval = gravity_interval(new_level);
        }
    }

    /// Place a fresh piece at the spawn anchor. A blocked spawn is the
    /// terminal condition: the phase flips to GameOver and the invalid
    /// placement is left in place for the presentation sink to draw.
    fn spawn(&mut self, kind: PieceKind) {
        self.current = Tetromino::new(kind);
        self.lock_timer = 0.0;

        if !self.board.is_valid_position(
            &self.current,
            self.current.col,
            self.current.row,
            self.current.rotation,
        ) {
            self.phase = Phase::GameOver;
        }

        self.update_ghost();
    }

    fn update_ghost(&mut self) {
        self.ghost_distance = self.board.ghost_drop_distance(&self.current);
    }

    /// Fill a caller-owned snapshot (allocation-free; reuse one per frame)
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.current = self.current;
        out.ghost_distance = self.ghost_distance;
        out.held = self.held;
        out.hold_used = self.hold_used;
        out.next = self.next_pieces();
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.combo = self.combo;
        out.phase = self.phase;
    }

    /// Convenience allocation of a fresh snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BOARD_COLS, BOARD_ROWS};

    /// Scripted input source for driving the state machine in tests
    #[derive(Debug, Clone, Copy, Default)]
    pub(crate) struct TestInput {
        triggered: [bool; Action::COUNT],
        active: [bool; Action::COUNT],
        held: [bool; Action::COUNT],
    }

    impl TestInput {
        pub fn trigger(action: Action) -> Self {
            let mut input = Self::default();
            input.triggered[action.index()] = true;
            input.active[action.index()] = true;
            input
        }

        pub fn active(action: Action) -> Self {
            let mut input = Self::default();
            input.active[action.index()] = true;
            input
        }

        pub fn held(action: Action) -> Self {
            let mut input = Self::default();
            input.held[action.index()] = true;
            input
        }

        pub fn and_trigger(mut self, action: Action) -> Self {
            self.triggered[action.index()] = true;
            self.active[action.index()] = true;
            self
        }

        pub fn and_held(mut self, action: Action) -> Self {
            self.held[action.index()] = true;
            self
        }
    }

    impl InputSource for TestInput {
        fn just_triggered(&self, action: Action) -> bool {
            self.triggered[action.index()]
        }

        fn is_active(&self, action: Action) -> bool {
            self.active[action.index()] || self.triggered[action.index()]
        }

        fn is_held(&self, action: Action) -> bool {
            self.held[action.index()]
        }
    }

    fn idle() -> TestInput {
        TestInput::default()
    }

    /// Find a seed whose first piece satisfies the predicate
    fn game_where(pred: impl Fn(PieceKind) -> bool) -> Game {
        for seed in 0..64 {
            let game = Game::seeded(seed);
            if pred(game.current().kind) {
                return game;
            }
        }
        unreachable!("no seed in 0..64 produced a matching first piece");
    }

    #[test]
    fn test_new_game_starts_playing() {
        let game = Game::seeded(1);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
        assert_eq!(game.lines(), 0);
        assert_eq!(game.combo(), 0);
        assert!(game.held().is_none());
        assert!(!game.hold_used());
    }

    #[test]
    fn test_gravity_interval_curve() {
        assert!((gravity_interval(1) - 1.0).abs() < 1e-6);
        // Level clamps to [1, 20].
        assert_eq!(gravity_interval(0), gravity_interval(1));
        assert_eq!(gravity_interval(25), gravity_interval(20));
        // Strictly faster at higher levels.
        assert!(gravity_interval(5) < gravity_interval(2));
    }

    #[test]
    fn test_lateral_move_and_wall() {
        let mut game = Game::seeded(1);
        let start = game.current().col;
        assert!(game.try_move(1, 0));
        assert_eq!(game.current().col, start + 1);
        assert!(game.try_move(-1, 0));
        assert_eq!(game.current().col, start);

        // Walk into the left wall; must stop without wrapping.
        let mut moves = 0;
        while game.try_move(-1, 0) {
            moves += 1;
            assert!(moves < BOARD_COLS);
        }
        assert!(!game.try_move(-1, 0));
    }

    #[test]
    fn test_move_up_is_rejected() {
        let mut game = Game::seeded(1);
        assert!(!game.try_move(0, -1));
    }

    #[test]
    fn test_rotation_round_trip() {
        let mut game = game_where(|kind| kind != PieceKind::O);
        // Rotating needs vertical room; drop a few rows out of the buffer.
        game.try_move(0, 2);

        let before = game.current().rotation;
        assert!(game.try_rotate(true));
        assert_eq!(game.current().rotation, before.rotate_cw());
        assert!(game.try_rotate(false));
        assert_eq!(game.current().rotation, before);
    }

    #[test]
    fn test_o_piece_never_rotates() {
        let mut game = game_where(|kind| kind == PieceKind::O);
        assert!(!game.try_rotate(true));
        assert!(!game.try_rotate(false));
    }

    #[test]
    fn test_failed_rotation_leaves_piece_untouched() {
        let mut game = game_where(|kind| kind != PieceKind::O);
        // Box the piece in completely so every kick candidate collides.
        let snapshot_piece = *game.current();
        for col in 0..BOARD_COLS as i8 {
            for row in 0..BOARD_ROWS as i8 {
                if !snapshot_piece.cells().contains(&(col, row)) {
                    game.board_mut().set(col, row, Some(PieceKind::I));
                }
            }
        }
        assert!(!game.try_rotate(true));
        assert_eq!(*game.current(), snapshot_piece);
    }

    #[test]
    fn test_hard_drop_locks_and_scores() {
        let mut game = Game::seeded(1);
        let dist = game.ghost_distance() as u32;
        assert!(dist > 0);
        game.hard_drop();
        assert_eq!(game.score(), 2 * dist);
        // A new piece spawned at the top.
        assert_eq!(game.current().row, 0);
    }

    #[test]
    fn test_hold_stash_then_lockout() {
        let mut game = Game::seeded(1);
        let first = game.current().kind;
        let next = game.next_pieces()[0];

        game.activate_hold();
        assert_eq!(game.held(), Some(first));
        assert_eq!(game.current().kind, next);
        assert!(game.hold_used());

        // Second hold before a lock is a no-op.
        let current = game.current().kind;
        game.activate_hold();
        assert_eq!(game.current().kind, current);
        assert_eq!(game.held(), Some(first));
    }

    #[test]
    fn test_hold_swap_after_lock() {
        let mut game = Game::seeded(1);
        let first = game.current().kind;
        game.activate_hold();
        game.hard_drop();
        assert!(!game.hold_used());

        let second = game.current().kind;
        game.activate_hold();
        assert_eq!(game.current().kind, first);
        assert_eq!(game.held(), Some(second));
    }

    #[test]
    fn test_clear_score_and_combo() {
        let mut game = Game::seeded(1);
        // Four full rows waiting under the piece would need piece placement;
        // drive scoring directly through lock accounting instead.
        game.apply_clear_score(4);
        assert_eq!(game.score(), 1200 + 50); // tetris at level 1, combo 1
        assert_eq!(game.combo(), 1);
        assert_eq!(game.lines(), 4);

        game.apply_clear_score(0);
        assert_eq!(game.combo(), 0);
        assert_eq!(game.score(), 1250);
    }

    #[test]
    fn test_level_up_at_ten_lines() {
        let mut game = Game::seeded(1);
        let slow = game.gravity_interval;
        game.apply_clear_score(4);
        game.apply_clear_score(4);
        assert_eq!(game.level(), 1);
        game.apply_clear_score(2);
        assert_eq!(game.lines(), 10);
        assert_eq!(game.level(), 2);
        assert!(game.gravity_interval < slow);
    }

    #[test]
    fn test_gravity_advances_piece() {
        let mut game = Game::seeded(1);
        let start_row = game.current().row;
        // Level 1 interval is 1.0s; 25 ticks of 50ms cross it once.
        for _ in 0..25 {
            game.update(&idle(), 0.05);
        }
        assert!(game.current().row > start_row);
    }

    #[test]
    fn test_soft_drop_held_accelerates_and_scores_per_tick() {
        let mut game = Game::seeded(1);
        let start_row = game.current().row;
        let input = TestInput::held(Action::SoftDrop);

        game.update(&input, 0.05);
        // One tick at the clamped 0.05s interval advances one row and
        // awards exactly one point.
        assert_eq!(game.current().row, start_row + 1);
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn test_lock_delay_expires_on_grounded_piece() {
        let mut game = Game::seeded(1);
        // Ground the piece.
        while game.try_move(0, 1) {}
        assert!(game.is_grounded());

        // Not locked before the delay elapses.
        game.update(&idle(), 0.3);
        assert!(game.is_grounded());

        // Crossing the threshold locks and spawns at the top.
        game.update(&idle(), 0.3);
        assert_eq!(game.current().row, 0);
        assert!(!game.is_grounded());
    }

    #[test]
    fn test_lateral_move_resets_lock_timer() {
        let mut game = Game::seeded(1);
        while game.try_move(0, 1) {}
        game.update(&idle(), 0.3);
        assert!(game.lock_timer > 0.0);

        if game.try_move(1, 0) || game.try_move(-1, 0) {
            assert_eq!(game.lock_timer, 0.0);
        }
    }

    #[test]
    fn test_pause_toggles_and_freezes() {
        let mut game = Game::seeded(1);
        game.update(&TestInput::trigger(Action::Pause), 0.016);
        assert_eq!(game.phase(), Phase::Paused);

        let row = game.current().row;
        for _ in 0..100 {
            game.update(&idle(), 0.05);
        }
        assert_eq!(game.current().row, row);

        game.update(&TestInput::trigger(Action::Pause), 0.016);
        assert_eq!(game.phase(), Phase::Playing);
    }

    /// Occupy the spawn columns in the hidden rows without completing any
    /// row, so the next spawn collides instead of clearing.
    fn block_spawn_area(game: &mut Game) {
        for col in 3..7 {
            game.board_mut().set(col, 0, Some(PieceKind::I));
            game.board_mut().set(col, 1, Some(PieceKind::I));
        }
    }

    #[test]
    fn test_spawn_blocked_is_game_over() {
        let mut game = Game::seeded(1);
        block_spawn_area(&mut game);
        game.lock_current();
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn test_topping_out_on_hold_ends_the_tick() {
        let mut game = Game::seeded(1);
        block_spawn_area(&mut game);
        let preview = game.next_pieces();

        // Hold tops out; the hard drop and held soft drop arriving on the
        // same tick must not be processed against the blocked piece.
        let input = TestInput::trigger(Action::Hold)
            .and_trigger(Action::HardDrop)
            .and_held(Action::SoftDrop);
        assert!(game.update(&input, 0.016));

        assert_eq!(game.phase(), Phase::GameOver);
        // The blocked spawn is the one piece drawn for the hold; a processed
        // hard drop would have locked it and drawn another.
        assert_eq!(game.current().kind, preview[0]);
        assert_eq!(game.next_pieces()[0], preview[1]);
        // No soft-drop or hard-drop points either.
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_game_over_ignores_normal_actions() {
        let mut game = Game::seeded(1);
        block_spawn_area(&mut game);
        game.lock_current();
        assert_eq!(game.phase(), Phase::GameOver);

        let col = game.current().col;
        game.update(&TestInput::active(Action::MoveLeft), 0.016);
        assert_eq!(game.current().col, col);
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn test_hard_drop_restarts_after_game_over() {
        let mut game = Game::seeded(1);
        game.apply_clear_score(4);
        game.activate_hold();
        block_spawn_area(&mut game);
        game.lock_current();
        assert_eq!(game.phase(), Phase::GameOver);

        game.update(&TestInput::trigger(Action::HardDrop), 0.016);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.lines(), 0);
        assert!(game.held().is_none());
        assert!(!game.hold_used());
        // Board is empty again.
        for col in 0..BOARD_COLS as i8 {
            assert!(game.board().is_free(col, 0));
        }
    }

    #[test]
    fn test_quit_returns_false_from_any_phase() {
        let mut game = Game::seeded(1);
        assert!(!game.update(&TestInput::trigger(Action::Quit), 0.016));

        game.update(&TestInput::trigger(Action::Pause), 0.016);
        assert!(!game.update(&TestInput::trigger(Action::Quit), 0.016));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let game = Game::seeded(1);
        let snapshot = game.snapshot();
        assert_eq!(snapshot.phase, Phase::Playing);
        assert_eq!(snapshot.current, *game.current());
        assert_eq!(snapshot.ghost_distance, game.ghost_distance());
        assert_eq!(snapshot.next, game.next_pieces());
        assert_eq!(snapshot.score, 0);
    }
}
