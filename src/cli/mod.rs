//! CLI module
//!
//! Command-line interface for running a search.
//!
//! ```text
//! epmc-harvest <QUERY> [csv|json|excel] [--start-year Y --end-year Y]
//!     [--article-type T] [--open-access Y|N] [--lang L] [--include-extra]
//! ```

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::Runner;
