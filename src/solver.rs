use crate::board::Board;

use anyhow::{Result, bail};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

/// Node-expansion budget used by [`Solver::new`].
pub const DEFAULT_MAX_NODES: usize = 50_000_000;

const NO_PARENT: u32 = u32::MAX;

struct SearchNode {
    board: Board,
    moves: u32,
    parent: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct NodeIndex {
    index: u32,
    priority: u32,
}

impl Ord for NodeIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the minimum priority first; equal
        // priorities fall back to insertion order.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for NodeIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One best-first search: an open heap of node indexes ordered by
/// moves + Manhattan distance, an arena of nodes holding parent links for
/// path reconstruction, and the set of already-expanded boards.
struct Frontier {
    open: BinaryHeap<NodeIndex>,
    nodes: Vec<SearchNode>,
    closed: FxHashSet<Board>,
}

impl Frontier {
    fn seed(board: Board) -> Self {
        let mut frontier = Self {
            open: BinaryHeap::new(),
            nodes: Vec::new(),
            closed: FxHashSet::default(),
        };
        frontier.push(board, 0, NO_PARENT);
        frontier
    }

    fn push(&mut self, board: Board, moves: u32, parent: u32) {
        let priority = moves + board.manhattan();
        let index = self.nodes.len() as u32;
        self.nodes.push(SearchNode {
            board,
            moves,
            parent,
        });
        self.open.push(NodeIndex { index, priority });
    }

    // Index of the best unexpanded node; None once the reachable component
    // is exhausted. Stale heap entries for already-expanded boards are
    // discarded here.
    fn pop(&mut self) -> Option<u32> {
        while let Some(entry) = self.open.pop() {
            if !self.closed.contains(&self.nodes[entry.index as usize].board) {
                return Some(entry.index);
            }
        }
        None
    }

    fn expand(&mut self, index: u32) {
        let (board, moves, parent) = {
            let node = &self.nodes[index as usize];
            (node.board.clone(), node.moves, node.parent)
        };
        self.closed.insert(board.clone());
        for neighbor in board.neighbors() {
            // never step straight back onto the board we just came from
            if parent != NO_PARENT && neighbor == self.nodes[parent as usize].board {
                continue;
            }
            if self.closed.contains(&neighbor) {
                continue;
            }
            self.push(neighbor, moves + 1, index);
        }
    }

    fn path(&self, index: u32) -> Vec<Board> {
        let mut boards = Vec::new();
        let mut current = index;
        loop {
            let node = &self.nodes[current as usize];
            boards.push(node.board.clone());
            if node.parent == NO_PARENT {
                break;
            }
            current = node.parent;
        }
        boards.reverse();
        boards
    }
}

/// Outcome of solving one sliding-tile board.
///
/// The search runs to completion inside the constructor. Two searches are
/// driven in lock-step, one from the initial board and one from its twin;
/// whichever reaches the goal first settles solvability, since exactly one
/// of the two starting boards can be solvable.
#[derive(Debug, Clone)]
pub struct Solver {
    solution: Option<Vec<Board>>,
    states: usize,
    elapsed: Duration,
}

impl Solver {
    /// Solves `initial`, or proves it unsolvable.
    pub fn new(initial: Board) -> Result<Self> {
        Self::with_limit(initial, DEFAULT_MAX_NODES)
    }

    /// Like [`new`](Self::new), with an explicit bound on node expansions.
    /// The bound is checked once per iteration; exceeding it aborts the
    /// search with an error rather than reporting unsolvable.
    pub fn with_limit(initial: Board, max_nodes: usize) -> Result<Self> {
        if !initial.is_valid() {
            bail!("Invalid initial board state.");
        }
        let timer = Instant::now();
        let twin = initial.twin();
        let mut primary = Frontier::seed(initial);
        let mut secondary = Frontier::seed(twin);
        let mut states = 0;

        // Lock-step: each iteration advances both searches by at most one
        // pop/expand cycle, so twin progress can never mask a simultaneous
        // solution of the initial board.
        loop {
            if states >= max_nodes {
                bail!("Unable to solve the puzzle; reached max nodes {max_nodes}.");
            }

            let best_primary = primary.pop();
            let best_secondary = secondary.pop();

            let Some(primary_index) = best_primary else {
                // The initial board's entire reachable component was expanded
                // without finding the goal.
                log::debug!("primary frontier exhausted after {states} expansions");
                return Ok(Self {
                    solution: None,
                    states,
                    elapsed: timer.elapsed(),
                });
            };

            let primary_node = &primary.nodes[primary_index as usize];
            if primary_node.board.is_goal() {
                log::debug!(
                    "solved in {} moves after {states} expansions",
                    primary_node.moves
                );
                return Ok(Self {
                    solution: Some(primary.path(primary_index)),
                    states,
                    elapsed: timer.elapsed(),
                });
            }

            if let Some(secondary_index) = best_secondary {
                if secondary.nodes[secondary_index as usize].board.is_goal() {
                    log::debug!("twin reached the goal after {states} expansions");
                    return Ok(Self {
                        solution: None,
                        states,
                        elapsed: timer.elapsed(),
                    });
                }
            }

            primary.expand(primary_index);
            states += 1;
            if let Some(secondary_index) = best_secondary {
                secondary.expand(secondary_index);
                states += 1;
            }
        }
    }

    #[inline]
    pub fn is_solvable(&self) -> bool {
        self.solution.is_some()
    }

    /// Number of moves in a shortest solution, or -1 if unsolvable.
    pub fn moves(&self) -> i32 {
        match &self.solution {
            Some(boards) => boards.len() as i32 - 1,
            None => -1,
        }
    }

    /// The boards from the initial arrangement to the goal, inclusive, or
    /// None if unsolvable.
    pub fn solution(&self) -> Option<&[Board]> {
        self.solution.as_deref()
    }

    /// Total nodes expanded across both searches.
    #[inline]
    pub fn states(&self) -> usize {
        self.states
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
