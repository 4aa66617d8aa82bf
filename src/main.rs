use anyhow::{Context, Result, anyhow};
use clap::Parser;
use freecell::{Board, MoveError, Session, action::parse_actions, format_action};
use log::{LevelFilter, Metadata, Record, debug};
use std::{
    io::{BufRead, stdin},
    path::PathBuf,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Numbered deal to play (e.g. 11982)
    #[arg(short, long, value_name = "NUM", conflicts_with = "random")]
    game: Option<u32>,
    /// Deal a random numbered game
    #[arg(long)]
    random: bool,
    /// Path to a board file to load instead of dealing
    #[arg(conflicts_with_all = ["game", "random"])]
    file: Option<PathBuf>,
    /// Log to stderr; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logger(verbose: u8) -> Result<()> {
    log::set_logger(&LOGGER).map_err(|err| anyhow!("Failed to install logger; {err}"))?;
    log::set_max_level(match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose)?;

    let mut session = match cli.file {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read '{}'", path.display()))?;
            let board = Board::parse_full(&content).context("Failed to load board")?;
            Session::new(board)
        }
        None => {
            let game = cli
                .game
                .filter(|_| !cli.random)
                .unwrap_or_else(|| rand::random_range(1..=1_000_000));
            println!("Game #{game}");
            Session::from_game(game)
        }
    };

    println!("{}", session.board().pretty_print());
    'game: for line in stdin().lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let actions = match parse_actions(&line) {
            Ok(actions) => actions,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };
        for action in actions {
            match session.apply(action) {
                Ok(()) => {}
                Err(MoveError::EmptyHistory) => {
                    println!("Nothing to undo");
                    break;
                }
                Err(err) => {
                    debug!("{err}");
                    println!("Illegal move: {}", format_action(&action));
                    break;
                }
            }
            if session.is_quit() {
                break 'game;
            }
        }
        println!("\n{}", session.board().pretty_print());
        if session.tick() {
            println!("You won!");
            break;
        }
    }

    println!("\n{}/52 cards home", session.board().foundation_score());
    if !session.history().is_empty() {
        println!("Moves:\n{}", session.transcript());
    }
    Ok(())
}
