//! Terminal gameplay entrypoint.
//!
//! Fixed-tick loop: poll input with a timeout until the next tick, then
//! advance the DAS/ARR handler and the game by one tick and redraw.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use blockfall::core::{Game, GameSnapshot};
use blockfall::input::{self, InputHandler};
use blockfall::term::{GameView, Screen, Viewport};
use blockfall::types::{MAX_FRAME_DT, TICK_MS};

fn main() -> Result<()> {
    let mut screen = Screen::new();
    screen.enter()?;

    let result = run(&mut screen);

    // Always try to restore terminal state.
    let _ = screen.exit();
    result
}

fn run(screen: &mut Screen) -> Result<()> {
    let mut game = Game::new();
    let view = GameView::default();
    let mut input = InputHandler::new();

    let mut snapshot = GameSnapshot::default();

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game.snapshot_into(&mut snapshot);
        view.render(&snapshot, Viewport::new(w, h), screen);
        screen.flush()?;

        // Input with timeout until the next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if input::is_quit_combo(key) {
                            return Ok(());
                        }
                        if let Some(action) = input::map_key(key.code) {
                            input.key_press(action);
                        }
                    }
                    KeyEventKind::Repeat => {
                        // Terminal auto-repeat is ignored; DAS/ARR repeats
                        // are generated by the handler. Presses that carry
                        // the held state are refreshed on Press events.
                    }
                    KeyEventKind::Release => {
                        if let Some(action) = input::map_key(key.code) {
                            input.key_release(action);
                        }
                    }
                },
                Event::Resize(_, _) => {
                    screen.invalidate();
                }
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let dt = elapsed.as_secs_f32().min(MAX_FRAME_DT);

            input.tick(TICK_MS);
            if !game.update(&input, dt) {
                return Ok(());
            }
        }
    }
}
