//! Command module for the `evcmp` CLI.
//!
//! `compare` is the only command: it takes the parsed arguments and returns
//! `Ok(())` on success or a [`crate::error::CliError`] on failure.

pub mod compare;
