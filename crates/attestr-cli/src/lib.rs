//! # attestr-cli library
//!
//! Subcommand implementations for the `attestr` operator binary.

pub mod demo;
pub mod serve;
