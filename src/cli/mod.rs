//! Entry points shared by the two binaries
//!
//! Each binary parses its arguments and calls the matching `run_*` function,
//! which wires the workflow to the real terminal, config, and process runner.

pub mod args;

pub use args::{BranchArgs, CommitFileArgs};

use anyhow::Result;
use chrono::Local;

use crate::branch::BranchWorkflow;
use crate::commit::CommitFileWorkflow;
use crate::config::{format_timestamp, Config};
use crate::prompt::LinePrompter;
use crate::subprocess::SubprocessManager;

pub async fn run_create_branch(args: BranchArgs) -> Result<()> {
    let config = Config::load()?;
    let prompter = LinePrompter::stdio();

    let workflow = BranchWorkflow {
        config: &config,
        prompter: &prompter,
        subprocess: SubprocessManager::production(),
        timestamp: format_timestamp(&Local::now()),
    };
    workflow.run(args).await?;
    Ok(())
}

pub async fn run_create_commit_file(args: CommitFileArgs) -> Result<()> {
    let config = Config::load()?;
    let prompter = LinePrompter::stdio();

    let workflow = CommitFileWorkflow {
        config: &config,
        prompter: &prompter,
        timestamp: format_timestamp(&Local::now()),
    };
    workflow.run(args).await?;
    Ok(())
}
