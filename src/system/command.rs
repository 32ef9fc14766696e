//! Abstraction over external helper invocation (`ps`, `sysctl`).
//!
//! Sources receive a `CommandRunner` at construction so tests can swap in
//! [`StaticRunner`](super::mock::StaticRunner) instead of spawning processes.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use crate::context::ReadContext;

/// Locates and runs external commands, returning captured stdout.
///
/// Implementations hold no per-call state and may be shared across threads.
pub trait CommandRunner: Send + Sync {
    /// Resolves `tool` against `PATH`. Paths containing a separator are
    /// checked directly.
    fn locate(&self, tool: &str) -> Result<PathBuf, which::Error> {
        which::which(tool)
    }

    /// Runs `program` to completion. A non-zero exit is an error.
    fn run(&self, program: &Path, args: &[&str]) -> io::Result<String>;

    /// Like [`run`](Self::run), but gives up when `ctx` is cancelled or
    /// expires, killing the child.
    fn run_with_context(
        &self,
        ctx: &ReadContext,
        program: &Path,
        args: &[&str],
    ) -> impl Future<Output = io::Result<String>> + Send;
}

/// Spawns real processes with `LC_ALL=C` so numeric output is not localized.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str]) -> io::Result<String> {
        let output = std::process::Command::new(program)
            .args(args)
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .output()?;
        stdout_of(output)
    }

    async fn run_with_context(
        &self,
        ctx: &ReadContext,
        program: &Path,
        args: &[&str],
    ) -> io::Result<String> {
        // tokio spawns as soon as `output()` is called, so build the command
        // inside the raced future; a cancelled context then never spawns.
        let output = ctx
            .run(async {
                let mut command = tokio::process::Command::new(program);
                command
                    .args(args)
                    .env("LC_ALL", "C")
                    .stdin(Stdio::null())
                    .kill_on_drop(true);
                command.output().await
            })
            .await?;
        stdout_of(output)
    }
}

fn stdout_of(output: Output) -> io::Result<String> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(io::Error::other(format!(
            "{}: {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
