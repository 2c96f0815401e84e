//! Small cli for keeping track of what you are doing and for how long.
//! Tasks are kept in plain text files, one log per day, so they are easy to read and fix by hand.
//!

pub mod cli;
pub mod fs;
pub mod query;
pub mod storage;
pub mod utils;
