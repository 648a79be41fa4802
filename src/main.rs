mod config;
mod game;
mod state;
mod term;

pub type TermInt = u16;
pub type Coords = (u16, u16);

use anyhow::Result;

fn main() -> Result<()> {
    // A startup failure (no terminal, or one too small for the board) is
    // reported on stderr and exits non-zero before any screen takeover.
    let mut game = game::Game::new()?;

    let outcome = game.run();
    game.close();
    outcome
}
