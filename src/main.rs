//! Sliding Block Puzzle
//!
//! Generates boards of two-cell pieces and plays them in the terminal. Each
//! piece slides along its own axis when selected; clear every piece off the
//! board to advance to the next level.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use flexi_logger::{AdaptiveFormat, Logger};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use slideout::grid::format_board;
use slideout::{generate_level, persistence, Game, GameStatus, Resolution};

/// Plays a sliding block puzzle in the terminal.
#[derive(Parser)]
#[command(name = "slideout")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter, e.g. `debug` or `slideout=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Where the current level is stored.
    #[arg(long, global = true, default_value = persistence::PROGRESS_BIN)]
    progress_file: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a board and print it.
    Generate {
        /// Level to generate; defaults to the saved level.
        #[arg(short, long)]
        level: Option<u32>,
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Play interactively, reading commands from stdin.
    Play {
        /// Level to start from; defaults to the saved level.
        #[arg(short, long)]
        level: Option<u32>,
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Show the saved level.
    Progress,
    /// Reset the saved level to 1.
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = Logger::try_with_env_or_str(cli.log_level.as_deref().unwrap_or("info"))?
        .log_to_stderr()
        .adaptive_format_for_stderr(match cfg!(debug_assertions) {
            true => AdaptiveFormat::WithThread,
            _ => AdaptiveFormat::Default,
        })
        .start()?;

    match cli.command {
        Some(Command::Generate { level, seed }) => {
            run_generate(level.unwrap_or_else(|| saved_level(&cli.progress_file)), seed)
        }
        Some(Command::Play { level, seed }) => run_play(&cli.progress_file, level, seed),
        Some(Command::Progress) => {
            println!("level {}", saved_level(&cli.progress_file));
            Ok(())
        }
        Some(Command::Reset) => persistence::save_level(&cli.progress_file, 1)
            .with_context(|| format!("writing {}", cli.progress_file.display())),
        None => run_play(&cli.progress_file, None, None),
    }
}

fn saved_level(path: &Path) -> u32 {
    persistence::load_level(path).unwrap_or(1)
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    log::debug!("using seed {seed}");
    StdRng::seed_from_u64(seed)
}

/// Generates one board and prints it.
fn run_generate(level: u32, seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let data = generate_level(level, &mut rng)?;

    println!(
        "Level {} ({}x{}, {} pieces)",
        data.level,
        data.grid_size,
        data.grid_size,
        data.pieces.len()
    );
    if let Some(message) = data.unlock_message {
        println!("{message}");
    }
    print!("{}", format_board(&data.pieces, data.grid_size));
    Ok(())
}

/// A line of input during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayCommand {
    /// Select the piece covering `(x, y)`.
    Select(i32, i32),
    Shuffle,
    Flip,
    Hint,
    /// Advance the bomb clock by this many seconds.
    Tick(u32),
    Pause,
    Quit,
}

impl FromStr for PlayCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let args: Vec<&str> = s.split_whitespace().collect();
        let command = match args.as_slice() {
            ["shuffle"] => PlayCommand::Shuffle,
            ["flip"] => PlayCommand::Flip,
            ["hint"] => PlayCommand::Hint,
            ["tick"] => PlayCommand::Tick(1),
            ["tick", seconds] => PlayCommand::Tick(seconds.parse()?),
            ["pause"] => PlayCommand::Pause,
            ["quit"] | ["q"] => PlayCommand::Quit,
            [x, y] | ["move", x, y] => PlayCommand::Select(x.parse()?, y.parse()?),
            _ => return Err(anyhow!("unrecognized command '{}'", s.trim())),
        };
        Ok(command)
    }
}

fn print_game(game: &Game) {
    println!(
        "Level {} | {} pieces left | {} moves{}",
        game.level,
        game.active_count(),
        game.interactions,
        if game.paused { " | paused" } else { "" }
    );
    print!("{}", format_board(&game.pieces, game.grid_size));
}

/// Starts `level`, or reports why it could not be generated.
fn start_level(level: u32, rng: &mut StdRng) -> Option<Game> {
    match Game::start(level, rng) {
        Ok(game) => {
            if let Some(message) = game.unlock_message {
                println!("{message}");
            }
            print_game(&game);
            Some(game)
        }
        Err(e) => {
            log::error!("could not start level {level}: {e}");
            None
        }
    }
}

/// Interactive loop: one command per line until `quit` or end of input.
fn run_play(progress_file: &Path, level: Option<u32>, seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let level = level.unwrap_or_else(|| saved_level(progress_file));
    let Some(mut game) = start_level(level, &mut rng) else {
        return Ok(());
    };
    println!("Commands: <x> <y> | shuffle | flip | hint | tick [n] | pause | quit");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<PlayCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            PlayCommand::Quit => break,
            PlayCommand::Select(x, y) => match game.piece_at((x, y)) {
                Some(id) => {
                    if game.dispatch(id) == Resolution::Stay {
                        println!("piece {id} cannot move");
                    }
                    game.settle();
                }
                None => println!("no piece at ({x}, {y})"),
            },
            PlayCommand::Shuffle => {
                game.shuffle(&mut rng);
            }
            PlayCommand::Flip => {
                game.flip();
            }
            PlayCommand::Hint => {
                let hinted = game
                    .hint()
                    .and_then(|id| game.pieces.iter().find(|piece| piece.id == id));
                match hinted {
                    Some(piece) => println!("try the piece at {:?}", piece.head),
                    None => println!("no piece can leave right now"),
                }
            }
            PlayCommand::Tick(seconds) => {
                for _ in 0..seconds {
                    // without an active bomb further ticks cannot change anything
                    if !game.has_active_bombs() || game.tick() != &GameStatus::Playing {
                        break;
                    }
                }
            }
            PlayCommand::Pause => {
                game.toggle_pause();
            }
        }

        match game.status.clone() {
            GameStatus::Playing => print_game(&game),
            GameStatus::Cleared => {
                let next = game.level + 1;
                println!("Level {} cleared!", game.level);
                persistence::save_level(progress_file, next)
                    .with_context(|| format!("writing {}", progress_file.display()))?;
                let Some(next_game) = start_level(next, &mut rng) else {
                    return Ok(());
                };
                game = next_game;
            }
            GameStatus::Failed { bomb } => {
                println!("Bomb {bomb} went off! Restarting level {}.", game.level);
                let Some(retry) = start_level(game.level, &mut rng) else {
                    return Ok(());
                };
                game = retry;
            }
        }
        std::io::stdout().flush()?;
    }

    Ok(())
}
