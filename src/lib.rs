//! Number Sort Solver
//!
//! Optimal solver, verifier and level generator for the Number Sort
//! tube-merge puzzle: stacks of power-of-two pieces that merge in chain
//! reactions when equal values touch.
//!
//! # Quick Start
//!
//! ```rust
//! use number_sort_solver::core::Puzzle;
//! use number_sort_solver::solver::{SolveOptions, solve, verify};
//!
//! let puzzle: Puzzle = "2 | 4:2,4 4:4,2 4:".parse().unwrap();
//! let result = solve(&puzzle, &SolveOptions::default());
//!
//! assert_eq!(result.optimal_moves, Some(2));
//! assert!(verify(&puzzle, &result.path).is_ok());
//! ```

// Core domain types
pub mod core;

// Search engine, heuristic and verifier
pub mod solver;

// Debounced, cancellable solving for interactive hosts
pub mod live;

// Level files and the embedded pack
pub mod levels;

// Batch level generation
pub mod generator;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;

// Interactive TUI interface
pub mod interactive;
