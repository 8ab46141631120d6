//! Command implementations behind the `feedq` binary.

pub mod commands;
