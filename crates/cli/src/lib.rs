//! MAISYS CLI application: serve the proxy, manage the local session,
//! chat with client care, and query the staff directory.

pub use cmd::{Cli, Command};

pub mod cmd;
pub mod config;
pub mod repl;
