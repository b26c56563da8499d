//! CLI command implementations.

pub mod batch;
pub mod config;
pub mod input;
pub mod output;
pub mod parse;
