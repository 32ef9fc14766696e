//! Scripted [`CommandRunner`] for exercising sources without real helpers.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::context::ReadContext;

use super::command::CommandRunner;

#[derive(Debug, Clone)]
enum Reply {
    Stdout(String),
    Fail(String),
}

/// Runner that answers from canned output keyed by tool name.
///
/// Tools resolve to `/mock/bin/<name>`; the last path component picks the
/// reply, so `/usr/sbin/sysctl` and `sysctl` share one entry.
#[derive(Debug, Clone, Default)]
pub struct StaticRunner {
    replies: HashMap<String, Reply>,
    missing: HashSet<String>,
    hang: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StaticRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// `tool` exits successfully printing `stdout`.
    pub fn with_output(mut self, tool: &str, stdout: impl Into<String>) -> Self {
        self.replies
            .insert(tool_name(Path::new(tool)), Reply::Stdout(stdout.into()));
        self
    }

    /// `tool` is found but exits unsuccessfully.
    pub fn with_failure(mut self, tool: &str, message: impl Into<String>) -> Self {
        self.replies
            .insert(tool_name(Path::new(tool)), Reply::Fail(message.into()));
        self
    }

    /// `tool` is absent from the search path.
    pub fn without_tool(mut self, tool: &str) -> Self {
        self.missing.insert(tool_name(Path::new(tool)));
        self
    }

    /// Context-aware runs never finish on their own.
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Every invocation so far, as `"<tool> <args...>"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, program: &Path, args: &[&str]) {
        if let Ok(mut calls) = self.calls.lock() {
            let mut line = tool_name(program);
            for arg in args {
                line.push(' ');
                line.push_str(arg);
            }
            calls.push(line);
        }
    }
}

fn tool_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl CommandRunner for StaticRunner {
    fn locate(&self, tool: &str) -> Result<PathBuf, which::Error> {
        let name = tool_name(Path::new(tool));
        if self.missing.contains(&name) {
            return Err(which::Error::CannotFindBinaryPath);
        }
        Ok(Path::new("/mock/bin").join(name))
    }

    fn run(&self, program: &Path, args: &[&str]) -> io::Result<String> {
        self.record(program, args);
        match self.replies.get(&tool_name(program)) {
            Some(Reply::Stdout(out)) => Ok(out.clone()),
            Some(Reply::Fail(msg)) => Err(io::Error::other(msg.clone())),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no scripted output for {:?}", program),
            )),
        }
    }

    async fn run_with_context(
        &self,
        ctx: &ReadContext,
        program: &Path,
        args: &[&str],
    ) -> io::Result<String> {
        if self.hang {
            self.record(program, args);
            return ctx.run(std::future::pending::<io::Result<String>>()).await;
        }
        ctx.run(async { self.run(program, args) }).await
    }
}
