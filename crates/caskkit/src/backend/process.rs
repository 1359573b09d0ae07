//! Backend that spawns real processes with `std::process::Command`.

use crate::backend::{Backend, CommandOutput, Invocation};
use crate::error::{Error, Result};
use std::process::{Command, Stdio};

/// Runs invocations as child processes, waiting for each to finish.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessBackend;

impl ProcessBackend {
    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .env_clear()
            .envs(&invocation.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            if let Some(identity) = &invocation.run_as {
                cmd.gid(identity.gid).uid(identity.uid);
            }
        }

        cmd
    }
}

impl Backend for ProcessBackend {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        log::debug!("Running: {invocation}");
        if let Some(identity) = &invocation.run_as {
            log::debug!("  as user {} (uid {})", identity.name, identity.uid);
        }

        let output = Self::command(invocation)
            .output()
            .map_err(|source| Error::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        log::trace!("Output of {}:\n{combined}", invocation.program);

        Ok(CommandOutput {
            code: output.status.code(),
            success: output.status.success(),
            output: combined,
        })
    }
}
