//! CLI library components for the ONS mortality corpus.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
