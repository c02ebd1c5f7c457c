use log::trace;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;

use super::board::{Board, BoardError, Slide};
use super::parity;

/// Generates a uniformly random solvable board by shuffling all tiles until the parity works out.
pub fn generate<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Result<Board, BoardError> {
    let goal = Board::goal(dimension)?;
    let mut values: Vec<u32> = goal.tiles().iter().map(|&tile| u32::from(tile)).collect();
    let mut attempts = 0;
    loop {
        attempts += 1;
        values.shuffle(rng);
        let rows: Vec<&[u32]> = values.chunks(dimension).collect();
        let board = Board::new(&rows)?;
        if parity::is_solvable(&board) {
            trace!("Generated solvable {dimension}x{dimension} board after {attempts} shuffles");
            return Ok(board);
        }
    }
}

/// Generates a board by taking `moves` random slides away from the goal.
/// A slide never undoes the previous one. The result is solvable in at most `moves` slides.
pub fn scramble<R: Rng + ?Sized>(
    dimension: usize,
    moves: usize,
    rng: &mut R,
) -> Result<Board, BoardError> {
    let mut board = Board::goal(dimension)?;
    let mut previous: Option<Slide> = None;
    for _ in 0..moves {
        let next = Slide::ALL
            .into_iter()
            .filter(|slide| previous != Some(slide.opposite()))
            .filter_map(|slide| board.slide(slide).map(|next| (slide, next)))
            .choose(rng);
        // A blank in a corner always has a slide left that isn't the reverse of the previous one
        let Some((slide, next)) = next else {
            break;
        };
        previous = Some(slide);
        board = next;
    }
    Ok(board)
}
