use log::debug;
use rayon::prelude::*;
use thiserror::Error;

use super::board::Board;

mod search;
pub use search::SearchStats;
use search::Search;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolverError {
    #[error("No initial board was given")]
    MissingInitialBoard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Original,
    Twin,
}

/// Counters for both sides of a solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub original: SearchStats,
    pub twin: SearchStats,
}

/// Finds a shortest solution for a board, or proves that there is none.
///
/// Two A* searches run in lockstep, one from the initial board and one from its twin.
/// Exactly one of the two is solvable, so one of them will reach the goal. If the twin
/// gets there first, the initial board is unsolvable.
///
/// The whole search runs in [Solver::new].
#[derive(Debug)]
pub struct Solver {
    // From the initial board to the goal, both included. `None` if unsolvable.
    solution: Option<Vec<Board>>,
    stats: SolverStats,
}

impl Solver {
    pub fn new(initial: Board) -> Self {
        let twin = initial.twin().clone();
        let mut searches = [
            (Side::Original, Search::new(initial)),
            (Side::Twin, Search::new(twin)),
        ];

        let winner = 'search: loop {
            for (side, search) in searches.iter_mut() {
                let Some(node) = search.pop() else {
                    // Unreachable for valid boards: some neighbor is never the predecessor
                    debug!("{side:?} queue ran empty");
                    break 'search None;
                };
                if search.board(node).is_goal() {
                    break 'search Some((*side, node));
                }
                search.expand(node);
            }
        };

        let [(_, original), (_, twin)] = searches;
        let stats = SolverStats {
            original: original.stats(),
            twin: twin.stats(),
        };
        let solution = match winner {
            Some((Side::Original, node)) => {
                debug!(
                    "Solved in {} moves, popped {} nodes",
                    original.moves(node),
                    stats.original.popped + stats.twin.popped
                );
                Some(original.path_to(node))
            }
            Some((Side::Twin, node)) => {
                debug!(
                    "Twin solved in {} moves, the board is unsolvable. Popped {} nodes",
                    twin.moves(node),
                    stats.original.popped + stats.twin.popped
                );
                None
            }
            None => None,
        };

        Self { solution, stats }
    }

    pub fn is_solvable(&self) -> bool {
        self.solution.is_some()
    }

    /// Minimum number of slides to reach the goal, `-1` if the board is unsolvable.
    pub fn moves(&self) -> i32 {
        match &self.solution {
            Some(boards) => i32::try_from(boards.len() - 1).unwrap_or(i32::MAX),
            None => -1,
        }
    }

    /// The boards of a shortest solution, from the initial board to the goal.
    pub fn solution(&self) -> Option<&[Board]> {
        self.solution.as_deref()
    }

    pub fn stats(&self) -> SolverStats {
        self.stats
    }
}

impl TryFrom<Option<Board>> for Solver {
    type Error = SolverError;

    fn try_from(initial: Option<Board>) -> Result<Self, Self::Error> {
        initial
            .map(Solver::new)
            .ok_or(SolverError::MissingInitialBoard)
    }
}

/// Solves every board on the rayon thread pool. The result has the same order as `boards`.
pub fn solve_all(boards: Vec<Board>) -> Vec<Solver> {
    boards.into_par_iter().map(Solver::new).collect()
}
