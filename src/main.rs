use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, LevelFilter};
use rand::{rngs::StdRng, thread_rng, RngCore, SeedableRng};
use thiserror::Error;

use npuzzle::{generate, scramble, solve_all, Board, BoardError, Solver};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Solve sliding-tile puzzles with A* search", long_about = None)]
struct Args {
    /// Puzzle files: the dimension n followed by n*n tiles in row-major order, 0 is the blank
    files: Vec<PathBuf>,

    /// Solve a random solvable board of this dimension instead of reading files
    #[clap(long, value_name = "DIM", conflicts_with = "files")]
    generate: Option<usize>,

    /// Build the random board by sliding this many tiles away from the goal
    #[clap(long, value_name = "MOVES", requires = "generate")]
    scramble: Option<usize>,

    /// Seed for the random board
    #[clap(long, requires = "generate")]
    seed: Option<u64>,

    /// Only print the number of moves, not the boards
    #[clap(short, long)]
    quiet: bool,

    /// More log output, repeat for even more
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Failed to read {file}: {source}", file = .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid board in {file}: {source}", file = .path.display())]
    InvalidBoard { path: PathBuf, source: BoardError },

    #[error("Can't generate board: {0}")]
    Generate(#[from] BoardError),

    #[error("Nothing to solve, pass puzzle files or --generate")]
    NoInput,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn level_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

// `-v` overrides the global level from RUST_LOG, so it can't switch errors off
fn init_logging(verbose: u8) {
    env_logger::Builder::new()
        .parse_default_env()
        .filter_level(level_filter(verbose))
        .init();
}

fn run(args: &Args) -> Result<(), CliError> {
    let boards = match args.generate {
        Some(dimension) => vec![random_board(dimension, args)?],
        None if args.files.is_empty() => return Err(CliError::NoInput),
        None => args
            .files
            .iter()
            .map(|path| read_board(path))
            .collect::<Result<Vec<_>, _>>()?,
    };

    info!("Solving {} board(s)", boards.len());
    for solver in solve_all(boards) {
        print_solution(&solver, args.quiet);
    }
    Ok(())
}

fn read_board(path: &Path) -> Result<Board, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let board = content
        .parse::<Board>()
        .map_err(|source| CliError::InvalidBoard {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Loaded {}x{} board from {}", board.dimension(), board.dimension(), path.display());
    Ok(board)
}

fn random_board(dimension: usize, args: &Args) -> Result<Board, BoardError> {
    let mut rng: Box<dyn RngCore> = match args.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(thread_rng()),
    };
    let board = match args.scramble {
        Some(moves) => scramble(dimension, moves, &mut rng)?,
        None => generate(dimension, &mut rng)?,
    };
    info!("Generated board:\n{board}");
    Ok(board)
}

fn print_solution(solver: &Solver, quiet: bool) {
    match solver.solution() {
        None => println!("No solution possible"),
        Some(boards) => {
            println!("Minimum number of moves = {}", solver.moves());
            if !quiet {
                for board in boards {
                    println!("{board}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_always_logged() {
        for verbose in 0..=5 {
            assert!(level_filter(verbose) >= LevelFilter::Error);
        }
        assert_eq!(LevelFilter::Warn, level_filter(0));
        assert_eq!(LevelFilter::Trace, level_filter(3));
    }

    #[test]
    fn args_parse() {
        let args =
            Args::try_parse_from(["npuzzle", "-vv", "--generate", "3", "--seed", "1"]).unwrap();
        assert_eq!(2, args.verbose);
        assert_eq!(Some(3), args.generate);
        assert_eq!(Some(1), args.seed);
        assert!(Args::try_parse_from(["npuzzle", "--seed", "1"]).is_err());
    }
}
