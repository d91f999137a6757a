use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use twenty48_core::engine::{Grid, Move};

#[derive(Debug, Parser)]
#[command(author, version, about = "Play 2048 in the terminal")]
struct Cli {
    /// Seed for a reproducible game (OS entropy if omitted)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
}

/// What the player asked for on one input line.
enum Command {
    Slide(Move),
    NewGame,
    Quit,
    /// Unrecognized input; prompt again.
    Ignored,
}

fn parse_command(line: &str) -> Command {
    match line.trim().chars().next() {
        Some('w') => Command::Slide(Move::Up),
        Some('a') => Command::Slide(Move::Left),
        Some('s') => Command::Slide(Move::Down),
        Some('d') => Command::Slide(Move::Right),
        Some('n') => Command::NewGame,
        Some('q') => Command::Quit,
        _ => Command::Ignored,
    }
}

fn render(grid: &Grid, frozen: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    // ANSI home + clear before each redraw.
    write!(stdout, "\x1b[H\x1b[2J")?;
    write!(stdout, "{grid}")?;
    if grid.is_won() {
        writeln!(stdout, "You win!")?;
    } else if grid.is_lost() {
        writeln!(stdout, "Game over!")?;
    }
    if frozen {
        write!(stdout, "n = new game, q = quit: ")?;
    } else {
        write!(stdout, "Move [wasd], n = new game, q = quit: ")?;
    }
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut rng = match cli.seed {
        Some(seed) => {
            info!("starting seeded game (seed {seed})");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let mut grid = Grid::new_game(&mut rng);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        // Win is checked before loss, so a full, stuck board that holds the
        // goal tile still ends as a win.
        let frozen = grid.is_won() || grid.is_lost();
        render(&grid, frozen)?;

        let line = match lines.next() {
            Some(line) => line.context("failed to read from stdin")?,
            None => break,
        };

        match parse_command(&line) {
            Command::Slide(direction) if !frozen => {
                let outcome = grid.slide(direction);
                if outcome.moved {
                    let (next, cell) = outcome.grid.with_random_tile(&mut rng);
                    debug!("moved {direction:?}, spawned at {cell}");
                    grid = next;
                } else {
                    // Illegal move: silently ignored, no spawn.
                    debug!("{direction:?} is a no-op");
                }
            }
            Command::Slide(_) => {}
            Command::NewGame => {
                info!("new game");
                grid = Grid::new_game(&mut rng);
            }
            Command::Quit => break,
            Command::Ignored => {}
        }
    }

    Ok(())
}
