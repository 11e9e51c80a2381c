//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod convert;
pub mod generate;
pub mod inspect;
