//! artsetup command-line front end.
//!
//! Argument definitions live in [`cli`]; [`commands`] maps each
//! subcommand onto the `artsetup-gradle` resolvers and returns the line to
//! print, so everything except process setup can be tested in-process.

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::Cli;
pub use commands::run;
