#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

//! Front-end analysis for Chic primary constructors and null-conditional chains.
//!
//! A run parses a compilation unit, decides which primary constructor
//! parameters become captured fields ([`capture`]), builds the declaration
//! table, and then types every member body ([`typeck`]). Null-conditional
//! chains are classified while typing and rewritten into single-evaluation
//! form by [`lowering`]. [`driver::CompilerDriver`] strings the phases
//! together; the `chic-resolve` binary wraps it in a small CLI.

pub mod capture;
pub mod cli;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod frontend;
pub mod logging;
pub mod lowering;
pub mod syntax;
pub mod typeck;

pub use driver::{CheckOptions, CheckReport, CompilerDriver};
pub use error::{Error, Result};
