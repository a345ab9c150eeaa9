//! Command-line front end for the Emio tic-tac-toe engine
//!
//! Subcommands expose the board engine without a robot: ask the strategy
//! engine for a move, locate a table position, replay a recorded game, or
//! print the default configuration.

pub mod commands;
pub mod output;
