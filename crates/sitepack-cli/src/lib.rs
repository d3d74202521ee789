//! Sitepack CLI - Command-line interface for building packed site bundles
//!
//! This crate provides the CLI application on top of `sitepack-core`.

pub mod config;

pub use config::{BuildArgs, Command, Config};
