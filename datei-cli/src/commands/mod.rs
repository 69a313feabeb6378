//! CLI command implementations.

pub mod cat;
pub mod common;
pub mod config;
pub mod ls;
pub mod stat;
pub mod watch;
