//! # git-helper-utils
//!
//! Small command-line helpers for everyday git chores.
//!
//! ## Usage
//!
//! ```bash
//! create-git-branch [--desc "text"] [--type feature] [--issue-id ID] [--source-branch development]
//! create-git-commit-file [--commit-type fix] [--scope core] [--comment "text"] [--issue-id ID]
//! ```
//!
//! ## Modules
//!
//! - `branch` - Branch name building and the `create-git-branch` workflow
//! - `cli` - Argument structures and binary entry points
//! - `commit` - Conventional commit messages and the `create-git-commit-file` workflow
//! - `config` - Defaults, config file and environment overrides
//! - `console` - Terminal output with a per-run verbosity flag
//! - `executor` - Synchronous single-command execution with capture files
//! - `logging` - Per-run log file subscriber with scoped teardown
//! - `prompt` - Bounded prompting over an injectable input source
//! - `subprocess` - Process runner abstraction with a mock for tests
pub mod branch;
pub mod cli;
pub mod commit;
pub mod config;
pub mod console;
pub mod executor;
pub mod logging;
pub mod prompt;
pub mod subprocess;

pub use executor::{CommandExecutor, ExecuteError, ExecutionRequest};
