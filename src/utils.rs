//! Utilities that are used across the `biowrap` modules and subcommands.

pub mod args;
pub mod pathbuf;
