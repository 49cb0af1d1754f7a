//! CLI module for safeinteract
//!
//! Handles command-line argument parsing.

pub mod args;

pub use args::{Args, Commands, Verbosity};
