//! Terminal output for the interactive helpers
//!
//! A [`Console`] is created once per run and handed to whatever needs to talk
//! to the user. Notices about defaulted options are always shown; detail lines
//! are only shown when the run is verbose.

use colored::Colorize;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    verbose: bool,
}

impl Console {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// A copy of this console that is verbose if either side asks for it
    pub fn with_verbose(self, verbose: bool) -> Self {
        Self {
            verbose: self.verbose || verbose,
        }
    }

    pub fn line(&self, message: &str) {
        println!("{message}");
    }

    /// Shown only for verbose runs
    pub fn detail(&self, message: &str) {
        if self.verbose {
            println!("{message}");
        }
    }

    pub fn notice(&self, message: &str) {
        println!("{}", message.yellow());
    }

    pub fn success(&self, message: &str) {
        println!("{}", message.green());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", message.red().bold());
    }

    /// Relay a child's captured output to our own streams
    pub fn relay(&self, stdout: &[u8], stderr: &[u8]) {
        if !stdout.is_empty() {
            let mut out = std::io::stdout().lock();
            let _ = out.write_all(stdout).and_then(|_| out.flush());
        }
        if !stderr.is_empty() {
            let _ = std::io::stderr().lock().write_all(stderr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_verbose_is_sticky() {
        assert!(!Console::new(false).is_verbose());
        assert!(Console::new(false).with_verbose(true).is_verbose());
        assert!(Console::new(true).with_verbose(false).is_verbose());
    }
}
