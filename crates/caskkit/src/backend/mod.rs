//! Backend abstraction for running external commands.
//!
//! The [`Backend`] trait is the only place the provider touches processes,
//! allowing for different implementations (real processes, recording mocks
//! for testing).

pub mod process;

use crate::error::Result;
use crate::user::UserIdentity;
use std::collections::BTreeMap;
use std::fmt;

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path
    pub program: String,
    /// Arguments, passed through verbatim
    pub args: Vec<String>,
    /// The complete child environment; nothing is inherited
    pub env: BTreeMap<String, String>,
    /// Account to run as, if different from the current one
    pub run_as: Option<UserIdentity>,
}

impl Invocation {
    /// Start describing a command for `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            run_as: None,
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Replace the child environment
    pub fn env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Run as another account
    pub fn run_as(mut self, identity: Option<UserIdentity>) -> Self {
        self.run_as = identity;
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Output of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    /// Whether the command exited successfully
    pub success: bool,
    /// Stdout followed by stderr
    pub output: String,
}

impl CommandOutput {
    /// A successful run with the given output
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            success: true,
            output: output.into(),
        }
    }

    /// A failed run with the given exit code and output
    pub fn failed(code: i32, output: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            success: false,
            output: output.into(),
        }
    }
}

/// Backend trait for command execution.
///
/// Implementations block until the command finishes. A non-zero exit is
/// reported through [`CommandOutput::success`], not as an `Err`; `Err` means
/// the command could not be run at all.
pub trait Backend: Send + Sync {
    /// Run the command to completion
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Get the default backend (real processes).
pub fn default_backend() -> process::ProcessBackend {
    process::ProcessBackend
}
