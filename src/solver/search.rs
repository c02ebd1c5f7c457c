use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;

use crate::board::Board;

/// Counters for one side of a solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes taken off the priority queue.
    pub popped: usize,
    /// Nodes put on the priority queue, the seed included.
    pub enqueued: usize,
}

struct SearchNode {
    board: Board,
    moves: usize,
    // Index into [Search::nodes], `None` for the seed
    predecessor: Option<usize>,
}

#[derive(PartialEq, Eq)]
struct QueueEntry {
    priority: usize,
    node: usize,
}

// [BinaryHeap] is a max-heap. Reverse both keys so the lowest priority comes out first and,
// among equal priorities, the node that was enqueued first.
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One A* search, ordered by `moves + manhattan`.
///
/// Every node ever enqueued stays in `nodes` so that predecessor links stay valid until the
/// search is dropped. Only the immediate predecessor's board is excluded on expansion; there is
/// no closed set, so the same board can be enqueued many times over different paths.
pub struct Search {
    nodes: Vec<SearchNode>,
    queue: BinaryHeap<QueueEntry>,
    stats: SearchStats,
}

impl Search {
    pub fn new(seed: Board) -> Self {
        let mut res = Self {
            nodes: vec![],
            queue: BinaryHeap::new(),
            stats: SearchStats::default(),
        };
        res.push(seed, 0, None);
        res
    }

    fn push(&mut self, board: Board, moves: usize, predecessor: Option<usize>) {
        let priority = moves + board.manhattan();
        let node = self.nodes.len();
        self.nodes.push(SearchNode {
            board,
            moves,
            predecessor,
        });
        self.queue.push(QueueEntry { priority, node });
        self.stats.enqueued += 1;
    }

    /// Removes the node with the lowest priority from the queue and returns its index.
    pub fn pop(&mut self) -> Option<usize> {
        let entry = self.queue.pop()?;
        self.stats.popped += 1;
        trace!(
            "Popped node {} with priority {} after {} moves",
            entry.node,
            entry.priority,
            self.nodes[entry.node].moves
        );
        Some(entry.node)
    }

    pub fn board(&self, node: usize) -> &Board {
        &self.nodes[node].board
    }

    pub fn moves(&self, node: usize) -> usize {
        self.nodes[node].moves
    }

    /// Enqueues every neighbor of the node's board except its predecessor's board.
    pub fn expand(&mut self, node: usize) {
        let SearchNode {
            board,
            moves,
            predecessor,
        } = &self.nodes[node];
        let predecessor = predecessor.map(|predecessor| &self.nodes[predecessor].board);
        let moves = *moves + 1;
        let children: Vec<Board> = board
            .neighbors()
            .filter(|neighbor| Some(neighbor) != predecessor)
            .collect();
        for child in children {
            self.push(child, moves, Some(node));
        }
    }

    /// The boards from the seed to the given node, both included.
    pub fn path_to(&self, node: usize) -> Vec<Board> {
        let mut path = Vec::with_capacity(self.nodes[node].moves + 1);
        let mut current = Some(node);
        while let Some(index) = current {
            let node = &self.nodes[index];
            path.push(node.board.clone());
            current = node.predecessor;
        }
        path.reverse();
        path
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed() {
        let board = Board::goal(3).unwrap();
        let mut search = Search::new(board.clone());
        assert_eq!(
            SearchStats {
                popped: 0,
                enqueued: 1
            },
            search.stats()
        );
        let node = search.pop().unwrap();
        assert_eq!(&board, search.board(node));
        assert_eq!(0, search.moves(node));
        assert_eq!(None, search.pop());
        assert_eq!(vec![board], search.path_to(node));
    }

    #[test]
    fn expand_skips_predecessor() {
        let board = Board::new(&[[1, 2, 3], [4, 0, 5], [6, 7, 8]]).unwrap();
        let mut search = Search::new(board.clone());
        let seed = search.pop().unwrap();
        search.expand(seed);
        assert_eq!(5, search.stats().enqueued);

        let child = search.pop().unwrap();
        assert_eq!(1, search.moves(child));
        let before = search.stats().enqueued;
        search.expand(child);
        // The child has the blank on an edge: 3 neighbors, one of them is the seed board
        assert_eq!(before + 2, search.stats().enqueued);
        assert!(search.nodes[before..]
            .iter()
            .all(|node| node.board != board && node.moves == 2));
    }

    #[test]
    fn pops_lowest_priority_first() {
        let board = Board::new(&[[1, 2, 3], [4, 0, 5], [7, 8, 6]]).unwrap();
        let mut search = Search::new(board);
        let seed = search.pop().unwrap();
        search.expand(seed);

        let mut priorities = vec![];
        while let Some(node) = search.pop() {
            priorities.push(search.moves(node) + search.board(node).manhattan());
        }
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(sorted, priorities);
    }

    #[test]
    fn ties_are_popped_in_insertion_order() {
        let mut search = Search::new(Board::goal(3).unwrap());
        let seed = search.pop().unwrap();
        search.expand(seed);
        // Both neighbors of the goal are one slide away with one tile off by one
        let first = search.pop().unwrap();
        let second = search.pop().unwrap();
        assert!(first < second);
        assert_eq!(
            search.moves(first) + search.board(first).manhattan(),
            search.moves(second) + search.board(second).manhattan()
        );
    }

    #[test]
    fn path_to_follows_predecessors() {
        let board = Board::goal(3).unwrap();
        let mut search = Search::new(board.clone());
        let mut node = search.pop().unwrap();
        for _ in 0..5 {
            search.expand(node);
            node = search.pop().unwrap();
        }
        let path = search.path_to(node);
        assert_eq!(search.moves(node) + 1, path.len());
        assert_eq!(board, path[0]);
        assert_eq!(search.board(node), path.last().unwrap());
    }

    #[test]
    fn revisits_boards_without_closed_set() {
        // A 2x2 puzzle has 12 reachable boards, each with exactly two neighbors.
        // After the seed every expansion enqueues one child, so 12 expansions enqueue 14 nodes
        // and some board must have been enqueued twice.
        let mut search = Search::new(Board::goal(2).unwrap());
        for _ in 0..12 {
            let node = search.pop().unwrap();
            search.expand(node);
        }
        assert_eq!(14, search.nodes.len());
        let distinct: HashSet<&Board> = search.nodes.iter().map(|node| &node.board).collect();
        assert!(distinct.len() < search.nodes.len());
    }
}
