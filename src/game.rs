use std::thread::sleep;
use std::time::{Duration, Instant};

use crate::config::{GRID_HEIGHT, GRID_WIDTH};
use crate::state::{Direction::{self, *}, GameState, Point};
use crate::term::TermManager;
use crate::TermInt;

use anyhow::{bail, Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const FRAME_INTERVAL_MS: u64 = 5;

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

/// Terminal front-end for the game. Polls the keyboard, drives the tick
/// clock, and paints `GameState` snapshots; the game rules all live in
/// `state`.
pub struct Game {
    term: TermManager,
    drawn_snake: Vec<Point>,
    drawn_food: Option<Point>,
}

impl Game {
    pub fn new() -> Result<Self> {
        let mut term = TermManager::new().context("could not access the terminal")?;

        let (need_w, need_h) = ((GRID_WIDTH + 2) as TermInt, (GRID_HEIGHT + 2) as TermInt);
        let (w, h) = term.size();
        if w < need_w || h < need_h {
            bail!(
                "terminal is {}x{} cells but the board needs at least {}x{}",
                w, h, need_w, need_h
            );
        }

        // A half-done setup (alt screen entered, raw mode failed) must not
        // leave the terminal unusable.
        if let Err(err) = term.setup() {
            let _ = term.restore();
            return Err(err).context("could not set up the terminal");
        }

        Ok(Game { term, drawn_snake: vec![], drawn_food: None })
    }

    pub fn run(&mut self) -> Result<()> {
        if !self.show_intro()? {
            return Ok(());
        }

        loop {
            if !self.play_round()? {
                return Ok(());
            }
        }
    }

    /// Best-effort teardown, also used on the error path.
    pub fn close(&mut self) {
        let _ = self.term.restore();
    }

    ///////////////////////////////////////////////////////////////////////////

    fn show_intro(&mut self) -> Result<bool> {
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "CTRL+C to quit",
            "",
            "Press any key to begin",
        ])?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(false);
        }

        self.term.hide_message()?;
        Ok(true)
    }

    /// Plays one round to its end. Returns false when the player quits
    /// instead of starting another round.
    fn play_round(&mut self) -> Result<bool> {
        self.term.clear()?;
        self.term
            .draw_border((GRID_WIDTH + 2) as TermInt, (GRID_HEIGHT + 2) as TermInt)?;

        let mut state = GameState::new();
        self.drawn_snake.clear();
        self.drawn_food = None;
        self.draw_board(&state)?;

        while !state.is_game_over() {
            sleep(Duration::from_millis(FRAME_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                match &key_ev {
                    ev if is_ctrl_c(ev) => return Ok(false),
                    KeyEvent { code, .. } => match code {
                        KeyCode::Char('w') | KeyCode::Up => state.set_direction(Up),
                        KeyCode::Char('a') | KeyCode::Left => state.set_direction(Left),
                        KeyCode::Char('s') | KeyCode::Down => state.set_direction(Down),
                        KeyCode::Char('d') | KeyCode::Right => state.set_direction(Right),
                        _ => {}
                    },
                }
            }

            state.tick(Instant::now());
            self.draw_board(&state)?;
        }

        self.show_game_over(&state)?;

        // Any key starts a new round, CTRL+C quits
        Ok(!is_ctrl_c(&self.term.read_key_blocking()?))
    }

    /// Repaints whatever changed since the last call. Food goes first so
    /// that a segment covers food spawned under the body until the body
    /// moves off it.
    fn draw_board(&mut self, state: &GameState) -> Result<()> {
        let snake = state.snake();
        let food = state.food();

        if self.drawn_snake.as_slice() == snake && self.drawn_food == Some(food) {
            return Ok(());
        }

        for p in &self.drawn_snake {
            if !snake.contains(p) {
                self.term.print_at(cell_coords(*p), ' ')?;
            }
        }

        self.term.print_at(cell_coords(food), FOOD_CHAR)?;

        for (i, p) in snake.iter().enumerate() {
            let ch = if i == 0 { head_char(state.direction()) } else { SNAKE_BODY_CHAR };
            self.term.print_at(cell_coords(*p), ch)?;
        }

        self.term.flush()?;

        self.drawn_snake = snake.to_vec();
        self.drawn_food = Some(food);
        Ok(())
    }

    fn show_game_over(&mut self, state: &GameState) -> Result<()> {
        for p in state.snake() {
            self.term.print_at(cell_coords(*p), DEAD_SNAKE_CHAR)?;
        }

        self.term.show_message(&[
            "Game over!",
            "",
            "Press any key to play again,",
            "or CTRL+C to quit.",
        ])
    }
}

/// Board cell to terminal coordinates; the border occupies row/column 0.
fn cell_coords(p: Point) -> (TermInt, TermInt) {
    ((p.x + 1) as TermInt, (p.y + 1) as TermInt)
}

fn head_char(direction: Direction) -> char {
    match direction {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
