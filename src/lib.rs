//! Simple to use cli for tracking a fixed daily routine. The schedule is compiled in;
//! completions are checked off per day, roll over at local midnight, and every past day
//! stays queryable from the terminal.
//!

pub mod catalog;
pub mod cli;
pub mod focus;
pub mod store;
pub mod utils;
pub mod watch;
