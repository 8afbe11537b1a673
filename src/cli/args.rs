//! CLI argument structures
//!
//! Every option may be omitted; the helpers prompt for whatever is missing.

use clap::Parser;
use std::path::PathBuf;

use crate::branch::BranchType;
use crate::commit::CommitType;

/// Create a git branch with a descriptive, timestamped name
#[derive(Parser, Debug, Default)]
#[command(name = "create-git-branch")]
#[command(version)]
pub struct BranchArgs {
    /// A description to apply during the creation of the branch
    #[arg(long)]
    pub desc: Option<String>,

    /// The issue (e.g. Jira ticket) identifier
    #[arg(long = "issue-id", visible_alias = "jira-id", alias = "jira_id")]
    pub issue_id: Option<String>,

    /// The type of branch to establish
    #[arg(long = "type", value_enum)]
    pub branch_type: Option<BranchType>,

    /// The source branch to establish the new branch from
    #[arg(long = "source-branch", alias = "source_branch")]
    pub source_branch: Option<String>,

    /// The output directory for logs and captured command output
    #[arg(long)]
    pub outdir: Option<PathBuf>,

    /// The log file
    #[arg(long)]
    pub logfile: Option<PathBuf>,

    /// Print more info to STDOUT
    #[arg(short, long)]
    pub verbose: bool,
}

/// Create a conventional commit message file
#[derive(Parser, Debug, Default)]
#[command(name = "create-git-commit-file")]
#[command(version)]
pub struct CommitFileArgs {
    /// A one line comment
    #[arg(long)]
    pub comment: Option<String>,

    /// The issue identifier
    #[arg(long = "issue-id", alias = "issue_id")]
    pub issue_id: Option<String>,

    /// The log file
    #[arg(long)]
    pub logfile: Option<PathBuf>,

    /// The output directory
    #[arg(long)]
    pub outdir: Option<PathBuf>,

    /// The output commit comment file
    #[arg(long)]
    pub outfile: Option<PathBuf>,

    /// The module, component, or section of the project affected by the commit
    #[arg(long)]
    pub scope: Option<String>,

    /// The purpose of the commit
    #[arg(long = "commit-type", alias = "commit_type", value_enum)]
    pub commit_type: Option<CommitType>,

    /// Extended description; skips the interactive details prompt
    #[arg(long)]
    pub body: Option<String>,

    /// Print more info to STDOUT
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        BranchArgs::command().debug_assert();
        CommitFileArgs::command().debug_assert();
    }

    #[test]
    fn test_branch_args_accept_legacy_spellings() {
        let args = BranchArgs::try_parse_from([
            "create-git-branch",
            "--desc",
            "Add cache",
            "--jira_id",
            "JIRA-1",
            "--source_branch",
            "main",
            "--type",
            "hotfix",
        ])
        .unwrap();

        assert_eq!(args.desc.as_deref(), Some("Add cache"));
        assert_eq!(args.issue_id.as_deref(), Some("JIRA-1"));
        assert_eq!(args.source_branch.as_deref(), Some("main"));
        assert_eq!(args.branch_type, Some(BranchType::Hotfix));
        assert!(!args.verbose);
    }

    #[test]
    fn test_branch_args_reject_unknown_type() {
        let result = BranchArgs::try_parse_from(["create-git-branch", "--type", "epic"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_commit_args_feature_alias() {
        let args = CommitFileArgs::try_parse_from([
            "create-git-commit-file",
            "--commit_type",
            "feature",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.commit_type, Some(CommitType::Feat));
        assert!(args.verbose);
    }
}
