//! futlink CLI Library
//!
//! Command handlers and on-disk state for the `futlink` binary.

pub mod account_cmd;
pub mod config;
