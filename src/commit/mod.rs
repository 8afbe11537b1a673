//! Conventional commit message files
//!
//! See <https://www.conventionalcommits.org/en/v1.0.0/>. The message layout is
//! a `type(scope): summary` header, then the optional body and the optional
//! issue identifier, each separated by a blank line.

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use crate::cli::CommitFileArgs;
use crate::config::Config;
use crate::console::Console;
use crate::logging::init_logging;
use crate::prompt::{prompt_optional, prompt_until_valid, UserPrompter};

pub const SCRIPT_NAME: &str = "create_git_commit_file";

/// Line that ends multi-line body input
pub const BODY_TERMINATOR: &str = "done";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CommitType {
    #[value(alias = "feature")]
    Feat,
    Fix,
    Chore,
    Docs,
    Style,
    Refactor,
    Test,
    Ci,
}

impl CommitType {
    pub const ALL: [CommitType; 8] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Chore,
        CommitType::Docs,
        CommitType::Style,
        CommitType::Refactor,
        CommitType::Test,
        CommitType::Ci,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Chore => "chore",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Test => "test",
            CommitType::Ci => "ci",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CommitType::Feat => "A new feature for the user.",
            CommitType::Fix => "A bug fix.",
            CommitType::Chore => "Routine tasks, maintenance, and other non-user-facing changes.",
            CommitType::Docs => "Documentation changes.",
            CommitType::Style => "Code style changes (formatting, indentation).",
            CommitType::Refactor => "Code refactoring.",
            CommitType::Test => "Adding or modifying tests.",
            CommitType::Ci => "Changes to the project's CI/CD configuration.",
        }
    }

    /// One `type - description` line per commit type
    pub fn menu() -> String {
        Self::ALL
            .iter()
            .map(|t| format!("{} - {}", t.as_str(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        if wanted == "feature" {
            return Ok(CommitType::Feat);
        }
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown commit type '{}'", s.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    pub commit_type: CommitType,
    pub scope: Option<String>,
    pub summary: String,
    pub body: Option<String>,
    pub issue_id: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl CommitMessage {
    pub fn header(&self) -> String {
        match non_blank(&self.scope) {
            Some(scope) => format!("{}({}): {}", self.commit_type, scope.trim(), self.summary),
            None => format!("{}: {}", self.commit_type, self.summary),
        }
    }

    pub fn render(&self) -> String {
        let mut message = format!("{}\n\n", self.header());
        if let Some(body) = non_blank(&self.body) {
            message.push_str(body);
            message.push_str("\n\n");
        }
        if let Some(issue_id) = non_blank(&self.issue_id) {
            message.push_str(issue_id.trim());
            message.push('\n');
        }
        message
    }
}

pub struct CommitFileWorkflow<'a> {
    pub config: &'a Config,
    pub prompter: &'a dyn UserPrompter,
    pub timestamp: String,
}

impl CommitFileWorkflow<'_> {
    /// Collect inputs, write the message file, and return its path.
    pub async fn run(&self, args: CommitFileArgs) -> Result<PathBuf> {
        let console = Console::new(args.verbose);

        let outdir = args.outdir.unwrap_or_else(|| {
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

        let logfile = args.logfile.unwrap_or_else(|| {
            let logfile = outdir.join(format!("{SCRIPT_NAME}.log"));
            console.notice(&format!(
                "--logfile was not specified and therefore was set to '{}'",
                logfile.display()
            ));
            logfile
        });

        let outfile = args.outfile.unwrap_or_else(|| {
            let outfile = outdir.join(format!("{SCRIPT_NAME}.txt"));
            console.notice(&format!(
                "--outfile was not specified and therefore was set to '{}'",
                outfile.display()
            ));
            outfile
        });

        let _logging = init_logging(&logfile, &self.config.log_level)?;

        let commit_type = match args.commit_type {
            Some(commit_type) => commit_type,
            None => {
                prompt_until_valid(
                    self.prompter,
                    &format!("\n{}\nPlease enter the type of commit", CommitType::menu()),
                    self.config.max_prompt_attempts,
                    |answer| answer.parse().ok(),
                )
                .await?
            }
        };

        let scope = match args.scope.filter(|s| !s.trim().is_empty()) {
            Some(scope) => Some(scope),
            None => {
                prompt_optional(
                    self.prompter,
                    "Please enter the scope of the commit [just press Enter if none]",
                )
                .await?
            }
        };

        let summary = match args.comment.filter(|c| !c.trim().is_empty()) {
            Some(comment) => comment.trim().to_string(),
            None => {
                prompt_until_valid(
                    self.prompter,
                    "Please enter a one-line comment",
                    self.config.max_prompt_attempts,
                    |answer| (!answer.is_empty()).then(|| answer.to_string()),
                )
                .await?
            }
        };

        let issue_id = match args.issue_id {
            Some(id) => Some(id.trim().to_string()).filter(|id| !id.is_empty()),
            None => {
                prompt_optional(
                    self.prompter,
                    "Please enter the issue identifier [Enter if none]",
                )
                .await?
            }
        };

        let body = match args.body {
            Some(body) => Some(body),
            None => self.prompt_body().await?,
        };

        let message = CommitMessage {
            commit_type,
            scope,
            summary,
            body,
            issue_id,
        };

        std::fs::write(&outfile, message.render())
            .with_context(|| format!("Failed to write commit file {}", outfile.display()))?;
        info!("Wrote commit comment file '{}'", outfile.display());

        console.detail(&format!("\nWrote commit comment file '{}'", outfile.display()));
        console.detail(&format!("\nThe log file is '{}'", logfile.display()));
        if console.is_verbose() {
            console.success(&format!("Execution of '{SCRIPT_NAME}' completed"));
        }

        Ok(outfile)
    }

    async fn prompt_body(&self) -> Result<Option<String>> {
        if !self
            .prompter
            .prompt_yes_no("Do you want to provide more details?")
            .await?
        {
            return Ok(None);
        }

        let lines = self
            .prompter
            .prompt_lines(
                &format!(
                    "Please provide a description for the commit (type '{BODY_TERMINATOR}' when finished)"
                ),
                BODY_TERMINATOR,
            )
            .await?;

        let body = lines.join("\n");
        Ok((!body.trim().is_empty()).then_some(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::tests::canned;
    use tempfile::TempDir;

    fn message() -> CommitMessage {
        CommitMessage {
            commit_type: CommitType::Feat,
            scope: Some("parser".to_string()),
            summary: "add X".to_string(),
            body: None,
            issue_id: None,
        }
    }

    #[test]
    fn test_render_header_only() {
        assert_eq!(message().render(), "feat(parser): add X\n\n");
    }

    #[test]
    fn test_render_without_scope() {
        let msg = CommitMessage {
            scope: Some("  ".to_string()),
            ..message()
        };
        assert_eq!(msg.render(), "feat: add X\n\n");
    }

    #[test]
    fn test_render_full_layout() {
        let msg = CommitMessage {
            commit_type: CommitType::Fix,
            body: Some("First line.\nSecond line.".to_string()),
            issue_id: Some(" GH-12 ".to_string()),
            ..message()
        };
        assert_eq!(
            msg.render(),
            "fix(parser): add X\n\nFirst line.\nSecond line.\n\nGH-12\n"
        );
    }

    #[test]
    fn test_render_issue_without_body() {
        let msg = CommitMessage {
            issue_id: Some("GH-1".to_string()),
            ..message()
        };
        assert_eq!(msg.render(), "feat(parser): add X\n\nGH-1\n");
    }

    #[test]
    fn test_commit_type_parsing() {
        assert_eq!("feat".parse::<CommitType>(), Ok(CommitType::Feat));
        assert_eq!("Feature".parse::<CommitType>(), Ok(CommitType::Feat));
        assert_eq!(" CI ".parse::<CommitType>(), Ok(CommitType::Ci));
        assert!("bugfix".parse::<CommitType>().is_err());
    }

    #[test]
    fn test_menu_lists_every_type() {
        let menu = CommitType::menu();
        assert_eq!(menu.lines().count(), CommitType::ALL.len());
        assert!(menu.starts_with("feat - A new feature for the user."));
        assert!(menu.ends_with("ci - Changes to the project's CI/CD configuration."));
    }

    fn test_config(root: &TempDir) -> Config {
        Config {
            output_root: root.path().to_path_buf(),
            max_prompt_attempts: 3,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_workflow_interactive() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        // type (bad, good), scope, comment (empty, good), issue, more details?, body
        let prompter = canned(
            "oops\nfix\ncore\n\nhandle empty input\nGH-7\ny\nGuard the reader.\nAdd a test.\ndone\n",
        );

        let workflow = CommitFileWorkflow {
            config: &config,
            prompter: &prompter,
            timestamp: "2024-03-05-091500".to_string(),
        };

        let outfile = workflow.run(CommitFileArgs::default()).await.unwrap();

        assert_eq!(
            outfile,
            config
                .default_outdir(SCRIPT_NAME, "2024-03-05-091500")
                .join("create_git_commit_file.txt")
        );
        assert_eq!(
            std::fs::read_to_string(&outfile).unwrap(),
            "fix(core): handle empty input\n\nGuard the reader.\nAdd a test.\n\nGH-7\n"
        );
    }

    #[tokio::test]
    async fn test_workflow_flags_only() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let prompter = canned("");

        let workflow = CommitFileWorkflow {
            config: &config,
            prompter: &prompter,
            timestamp: "ts".to_string(),
        };

        let args = CommitFileArgs {
            comment: Some("bump toolchain".to_string()),
            issue_id: Some(String::new()),
            outdir: Some(temp_dir.path().to_path_buf()),
            outfile: Some(temp_dir.path().join("msg.txt")),
            scope: Some("build".to_string()),
            commit_type: Some(CommitType::Chore),
            body: Some(String::new()),
            ..CommitFileArgs::default()
        };

        let outfile = workflow.run(args).await.unwrap();

        assert_eq!(outfile, temp_dir.path().join("msg.txt"));
        assert_eq!(
            std::fs::read_to_string(&outfile).unwrap(),
            "chore(build): bump toolchain\n\n"
        );
        let log =
            std::fs::read_to_string(temp_dir.path().join("create_git_commit_file.log")).unwrap();
        assert!(log.contains("Wrote commit comment file"));
    }

    #[tokio::test]
    async fn test_workflow_declines_details() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let prompter = canned("n\n");

        let workflow = CommitFileWorkflow {
            config: &config,
            prompter: &prompter,
            timestamp: "ts".to_string(),
        };

        let args = CommitFileArgs {
            comment: Some("tidy imports".to_string()),
            issue_id: Some("ABC-3".to_string()),
            outdir: Some(temp_dir.path().to_path_buf()),
            scope: Some("cli".to_string()),
            commit_type: Some(CommitType::Style),
            ..CommitFileArgs::default()
        };

        let outfile = workflow.run(args).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(outfile).unwrap(),
            "style(cli): tidy imports\n\nABC-3\n"
        );
    }

    #[tokio::test]
    async fn test_workflow_fails_when_input_runs_out() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let prompter = canned("fix\n");

        let workflow = CommitFileWorkflow {
            config: &config,
            prompter: &prompter,
            timestamp: "ts".to_string(),
        };

        let args = CommitFileArgs {
            outdir: Some(temp_dir.path().to_path_buf()),
            ..CommitFileArgs::default()
        };

        let err = workflow.run(args).await.unwrap_err();
        assert!(err.to_string().contains("Input ended"));
        assert!(!temp_dir.path().join("create_git_commit_file.txt").exists());
    }
}
