//! `stockline` command-line front end.
//!
//! Reads batches and order lines from JSON files, runs the allocation service
//! and prints a JSON report on stdout.

pub mod commands;
pub mod dto;
pub mod input;

pub use commands::Cli;
