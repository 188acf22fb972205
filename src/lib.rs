//! This crate provides a solver for sliding-tile puzzles (the 8-puzzle and
//! its larger n×n relatives) using the A* search algorithm.
//!
//! Solvability is decided without an explicit parity computation: the solver
//! runs two searches in lock-step, one over the initial board and one over
//! its [`twin`](Board::twin), and exactly one of the two can ever reach the
//! goal.

mod board;
mod solver;

pub use crate::board::{Board, MAX_DIMENSION};
pub use crate::solver::{DEFAULT_MAX_NODES, Solver};
