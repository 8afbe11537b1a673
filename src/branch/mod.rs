//! Branch creation
//!
//! Branch names follow
//! `{type}/[{issue_id}-]from-{source}-on-{timestamp}-for-{slug}`, built by the
//! pure [`branch_name`] function. Every user-supplied component is reduced to
//! a ref-safe character set first, so the name is always a single argument.
//! [`BranchWorkflow`] gathers the inputs from flags or prompts and hands
//! `git checkout -b <name>` to the executor.

use anyhow::{bail, Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use crate::cli::BranchArgs;
use crate::config::Config;
use crate::console::Console;
use crate::executor::{CommandExecutor, ExecutionRequest};
use crate::logging::init_logging;
use crate::prompt::{prompt_optional, prompt_until_valid, UserPrompter};
use crate::subprocess::SubprocessManager;

pub const SCRIPT_NAME: &str = "create_git_branch";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BranchType {
    Feature,
    Bugfix,
    Hotfix,
    Custom,
}

impl BranchType {
    pub const ALL: [BranchType; 4] = [
        BranchType::Feature,
        BranchType::Bugfix,
        BranchType::Hotfix,
        BranchType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BranchType::Feature => "feature",
            BranchType::Bugfix => "bugfix",
            BranchType::Hotfix => "hotfix",
            BranchType::Custom => "custom",
        }
    }
}

impl fmt::Display for BranchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BranchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown branch type '{}'", s.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRequest {
    pub description: String,
    pub issue_id: Option<String>,
    pub branch_type: BranchType,
    pub source_branch: String,
}

/// Lowercase, hyphen-separated form of `text` restricted to `[a-z0-9._-]`.
pub fn slugify(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    kept.split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Case-preserving ref component restricted to `[A-Za-z0-9._/-]`.
///
/// Whitespace becomes `-`, repeated separators collapse, and separators are
/// stripped from both ends so the result can never be read as an option.
pub fn ref_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.trim().chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '-')) {
            continue;
        }
        if matches!(c, '.' | '/' | '-') && out.ends_with(c) {
            continue;
        }
        out.push(c);
    }
    out.trim_matches(['-', '.', '/']).to_string()
}

pub fn branch_name(request: &BranchRequest, timestamp: &str) -> String {
    let issue = request
        .issue_id
        .as_deref()
        .map(ref_component)
        .filter(|id| !id.is_empty())
        .map(|id| format!("{id}-"))
        .unwrap_or_default();

    format!(
        "{}/{}from-{}-on-{}-for-{}",
        request.branch_type,
        issue,
        ref_component(&request.source_branch),
        timestamp,
        slugify(&request.description)
    )
}

pub struct BranchWorkflow<'a> {
    pub config: &'a Config,
    pub prompter: &'a dyn UserPrompter,
    pub subprocess: SubprocessManager,
    pub timestamp: String,
}

impl BranchWorkflow<'_> {
    /// Collect inputs, create the branch, and return its name.
    pub async fn run(&self, args: BranchArgs) -> Result<String> {
        let console = Console::new(args.verbose);

        let description = match args.desc {
            Some(desc) => desc,
            None => {
                self.prompter
                    .prompt_text("Please enter a description for the branch", None)
                    .await?
            }
        };
        if description.trim().is_empty() {
            console.error("--desc was not specified");
            bail!("Required command-line arguments were not provided: --desc");
        }

        let branch_type = match args.branch_type {
            Some(branch_type) => branch_type,
            None => {
                let choices: Vec<&str> = BranchType::ALL.iter().map(|t| t.as_str()).collect();
                prompt_until_valid(
                    self.prompter,
                    &format!(
                        "Please enter the type of branch to establish (valid options: {})",
                        choices.join(", ")
                    ),
                    self.config.max_prompt_attempts,
                    |answer| answer.parse().ok(),
                )
                .await?
            }
        };

        let source_branch = match args.source_branch {
            Some(branch) => branch.trim().to_string(),
            None => {
                let default = self.config.default_source_branch.as_str();
                self.prompter
                    .prompt_text("Please provide the source branch", Some(default))
                    .await?
            }
        };

        let issue_id = match args.issue_id {
            Some(id) => Some(id.trim().to_string()).filter(|id| !id.is_empty()),
            None => {
                prompt_optional(
                    self.prompter,
                    "Please enter the issue identifier or press ENTER to skip",
                )
                .await?
            }
        };

        if ref_component(&source_branch).is_empty() {
            console.error("--source-branch is not a usable branch name");
            bail!(
                "Source branch '{}' has no characters usable in a branch name",
                source_branch
            );
        }

        let outdir = self.prepare_outdir(args.outdir, &console)?;
        let logfile = args.logfile.unwrap_or_else(|| {
            let logfile = outdir.join(format!("{SCRIPT_NAME}.log"));
            console.notice(&format!(
                "--logfile was not specified and therefore was set to '{}'",
                logfile.display()
            ));
            logfile
        });
        let _logging = init_logging(&logfile, &self.config.log_level)?;

        let request = BranchRequest {
            description,
            issue_id,
            branch_type,
            source_branch,
        };
        let name = branch_name(&request, &self.timestamp);
        info!("Derived branch name '{}' from {:?}", name, request);
        console.line(&format!("New branch: {name}"));

        let executor = CommandExecutor::new(self.subprocess.runner(), console);
        let command = shell_words::join(["git", "checkout", "-b", name.as_str()]);
        executor
            .execute(
                ExecutionRequest::new(command)
                    .output_dir(&outdir)
                    .verbose(args.verbose),
            )
            .await
            .with_context(|| format!("Failed to create branch '{name}'"))?;

        console.detail(&format!("The log file is '{}'", logfile.display()));
        if console.is_verbose() {
            console.success(&format!("Execution of '{SCRIPT_NAME}' completed"));
        }

        Ok(name)
    }

    fn prepare_outdir(&self, outdir: Option<PathBuf>, console: &Console) -> Result<PathBuf> {
        let outdir = outdir.unwrap_or_else(|| {
            let outdir = self.config.default_outdir(SCRIPT_NAME, &self.timestamp);
            console.notice(&format!(
                "--outdir was not specified and therefore was set to '{}'",
                outdir.display()
            ));
            outdir
        });

        if !outdir.exists() {
            std::fs::create_dir_all(&outdir).with_context(|| {
                format!("Failed to create output directory {}", outdir.display())
            })?;
            console.notice(&format!("Created output directory '{}'", outdir.display()));
        }

        Ok(outdir)
    }
}
