//! Subcommand implementations
//!
//! - `serve` - JSON-lines command loop
//! - `demo` - scripted noise/cleanup walkthrough

pub mod demo;
pub mod serve;
