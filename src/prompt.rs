//! User prompting
//!
//! Prompts read from an injectable line source so the helpers behave the same
//! under a terminal, a pipe, or a test. Validation loops are bounded: running
//! out of attempts or out of input is an error rather than a hang.

use async_trait::async_trait;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Input ended while waiting for: {0}")]
    EndOfInput(String),

    #[error("No valid answer to '{prompt}' after {attempts} attempts")]
    AttemptsExhausted { prompt: String, attempts: u32 },

    #[error("IO error while prompting: {0}")]
    Io(#[from] io::Error),
}

/// Trait for user prompting
#[async_trait]
pub trait UserPrompter: Send + Sync {
    /// Prompt for one line of text; empty input yields `default` when given
    async fn prompt_text(&self, message: &str, default: Option<&str>) -> Result<String, PromptError>;

    /// Prompt for yes/no confirmation, where empty input means yes
    async fn prompt_yes_no(&self, message: &str) -> Result<bool, PromptError>;

    /// Collect lines until one equals `terminator` or input ends
    async fn prompt_lines(&self, message: &str, terminator: &str)
        -> Result<Vec<String>, PromptError>;
}

/// Prompter over any line-oriented reader and writer
pub struct LinePrompter<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl LinePrompter<BufReader<io::Stdin>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> LinePrompter<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    fn write_prompt(&self, text: &str) -> Result<(), PromptError> {
        let mut output = self.output.lock().unwrap_or_else(|e| e.into_inner());
        write!(output, "{text}")?;
        output.flush()?;
        Ok(())
    }

    /// Read one line with the trailing newline removed; `None` at end of input
    fn read_line(&self) -> Result<Option<String>, PromptError> {
        let mut input = self.input.lock().unwrap_or_else(|e| e.into_inner());
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

#[async_trait]
impl<R, W> UserPrompter for LinePrompter<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    async fn prompt_text(&self, message: &str, default: Option<&str>) -> Result<String, PromptError> {
        match default {
            Some(default_value) => self.write_prompt(&format!("{message} [{default_value}]: "))?,
            None => self.write_prompt(&format!("{message}: "))?,
        }

        let input = self
            .read_line()?
            .ok_or_else(|| PromptError::EndOfInput(message.to_string()))?;
        let input = input.trim();

        match (input.is_empty(), default) {
            (true, Some(def)) => Ok(def.to_string()),
            _ => Ok(input.to_string()),
        }
    }

    async fn prompt_yes_no(&self, message: &str) -> Result<bool, PromptError> {
        self.write_prompt(&format!("{message} [Y/n]: "))?;

        let input = self
            .read_line()?
            .ok_or_else(|| PromptError::EndOfInput(message.to_string()))?;
        let input = input.trim().to_lowercase();

        Ok(input.is_empty() || input == "y" || input == "yes")
    }

    async fn prompt_lines(
        &self,
        message: &str,
        terminator: &str,
    ) -> Result<Vec<String>, PromptError> {
        self.write_prompt(&format!("{message}\n"))?;

        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.trim() == terminator {
                break;
            }
            lines.push(line);
        }
        Ok(lines)
    }
}

/// Ask until `parse` accepts the answer, giving up after `max_attempts`.
pub async fn prompt_until_valid<T, F>(
    prompter: &dyn UserPrompter,
    message: &str,
    max_attempts: u32,
    mut parse: F,
) -> Result<T, PromptError>
where
    F: FnMut(&str) -> Option<T>,
{
    for attempt in 1..=max_attempts {
        let answer = prompter.prompt_text(message, None).await?;
        if let Some(value) = parse(&answer) {
            return Ok(value);
        }
        tracing::info!(
            "Rejected answer '{}' to '{}' (attempt {} of {})",
            answer,
            message,
            attempt,
            max_attempts
        );
    }

    Err(PromptError::AttemptsExhausted {
        prompt: message.to_string(),
        attempts: max_attempts,
    })
}

/// Ask for an optional value; pressing Enter skips it.
pub async fn prompt_optional(
    prompter: &dyn UserPrompter,
    message: &str,
) -> Result<Option<String>, PromptError> {
    let answer = prompter.prompt_text(message, None).await?;
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) fn canned(input: &str) -> LinePrompter<Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[tokio::test]
    async fn test_prompt_text_trims_and_uses_default() {
        let prompter = canned("  custom  \n\n");

        assert_eq!(
            prompter.prompt_text("Enter text", None).await.unwrap(),
            "custom"
        );
        assert_eq!(
            prompter
                .prompt_text("Enter text", Some("development"))
                .await
                .unwrap(),
            "development"
        );
    }

    #[tokio::test]
    async fn test_prompt_text_writes_prompt() {
        let prompter = canned("x\n");
        prompter.prompt_text("Source", Some("main")).await.unwrap();

        let output = prompter.output.lock().unwrap();
        assert_eq!(String::from_utf8_lossy(&output), "Source [main]: ");
    }

    #[tokio::test]
    async fn test_prompt_text_end_of_input() {
        let prompter = canned("");
        let result = prompter.prompt_text("Description", None).await;
        assert!(matches!(result, Err(PromptError::EndOfInput(ref m)) if m == "Description"));
    }

    #[tokio::test]
    async fn test_prompt_yes_no() {
        let prompter = canned("\nY\nyes\nn\nnope\n");

        assert!(prompter.prompt_yes_no("More?").await.unwrap());
        assert!(prompter.prompt_yes_no("More?").await.unwrap());
        assert!(prompter.prompt_yes_no("More?").await.unwrap());
        assert!(!prompter.prompt_yes_no("More?").await.unwrap());
        assert!(!prompter.prompt_yes_no("More?").await.unwrap());
    }

    #[tokio::test]
    async fn test_prompt_lines_stops_at_terminator() {
        let prompter = canned("first line\n  indented\ndone\nleftover\n");

        let lines = prompter.prompt_lines("Details", "done").await.unwrap();
        assert_eq!(lines, vec!["first line", "  indented"]);
        assert_eq!(
            prompter.prompt_text("next", None).await.unwrap(),
            "leftover"
        );
    }

    #[tokio::test]
    async fn test_prompt_lines_stops_at_end_of_input() {
        let prompter = canned("only line");
        let lines = prompter.prompt_lines("Details", "done").await.unwrap();
        assert_eq!(lines, vec!["only line"]);
    }

    #[tokio::test]
    async fn test_prompt_until_valid_retries() {
        let prompter = canned("nope\nFEATURE\n");

        let value = prompt_until_valid(&prompter, "Type", 3, |answer| {
            (answer.to_lowercase() == "feature").then(|| answer.to_lowercase())
        })
        .await
        .unwrap();

        assert_eq!(value, "feature");
    }

    #[tokio::test]
    async fn test_prompt_until_valid_is_bounded() {
        let prompter = canned("a\nb\nc\nfeature\n");

        let result = prompt_until_valid(&prompter, "Type", 2, |answer| {
            (answer == "feature").then_some(())
        })
        .await;

        assert!(matches!(
            result,
            Err(PromptError::AttemptsExhausted { attempts: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_prompt_until_valid_end_of_input() {
        let prompter = canned("bad\n");

        let result = prompt_until_valid(&prompter, "Type", 5, |_| None::<()>).await;
        assert!(matches!(result, Err(PromptError::EndOfInput(_))));
    }

    #[tokio::test]
    async fn test_prompt_optional() {
        let prompter = canned("\n ABC-12 \n");

        assert_eq!(prompt_optional(&prompter, "Issue").await.unwrap(), None);
        assert_eq!(
            prompt_optional(&prompter, "Issue").await.unwrap(),
            Some("ABC-12".to_string())
        );
    }
}
