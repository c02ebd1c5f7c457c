mod board;
mod generator;
pub mod parity;
mod solver;

pub use board::{Board, BoardError, Slide, MAX_DIMENSION};
pub use generator::{generate, scramble};
pub use solver::{solve_all, SearchStats, Solver, SolverError, SolverStats};
