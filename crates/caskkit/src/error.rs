//! Error types for cask operations.
//!
//! Only two outcomes matter to a host: the operation worked or it did not.
//! The variants exist so the failure message says what went wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during cask operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Cask token contains characters that are not allowed
    #[error("invalid cask name {name:?}: {reason}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The external command could not be started
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The external command exited unsuccessfully
    #[error("command failed ({}): {command}{}", describe_code(.code), describe_output(.output))]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Combined stdout and stderr
        output: String,
    },

    /// The ask-pass helper script could not be written
    #[error("failed to create ask-pass script in {}: {source}", .dir.display())]
    Askpass {
        /// Directory the script was written to
        dir: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The operating user could not be resolved to a uid
    #[error("unknown user: {0}")]
    UnknownUser(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

fn describe_output(output: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}

/// Result type for cask operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_message_includes_output() {
        let err = Error::CommandFailed {
            command: "brew uninstall --force firefox".into(),
            code: Some(1),
            output: "Error: Cask 'firefox' is not installed.\n".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit status 1"));
        assert!(msg.contains("brew uninstall --force firefox"));
        assert!(msg.ends_with("Error: Cask 'firefox' is not installed."));
    }

    #[test]
    fn test_command_failed_without_output() {
        let err = Error::CommandFailed {
            command: "brew install homebrew/cask/foo".into(),
            code: None,
            output: "   \n".into(),
        };
        assert_eq!(
            err.to_string(),
            "command failed (terminated by signal): brew install homebrew/cask/foo"
        );
    }
}
