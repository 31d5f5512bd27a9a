//! CLI subcommand implementations

pub mod db;
pub mod serve;
