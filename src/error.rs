use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::context::ReadAborted;

/// A required numeric token was missing or malformed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// A kernel pseudo-file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An external helper could not be spawned, exited unsuccessfully, or the
    /// control interface it fronts is unavailable.
    #[error("failed to run {}: {source}", .program.display())]
    Command {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The process-listing utility is not on the search path.
    #[error("`{tool}` not found on PATH")]
    ToolNotFound {
        tool: String,
        #[source]
        source: which::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The config file exists but is not valid TOML for [`Config`].
    ///
    /// [`Config`]: crate::Config
    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Neither a forced platform nor the host OS has a load source.
    #[error("no load source for `{os}`")]
    Unsupported { os: String },
}

impl Error {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn command(program: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Command {
            program: program.into(),
            source,
        }
    }

    /// True for read and command failures, including cancellation.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Read { .. } | Error::Command { .. })
    }

    /// True when the read was aborted by a cancelled or expired [`ReadContext`].
    ///
    /// [`ReadContext`]: crate::ReadContext
    pub fn is_cancelled(&self) -> bool {
        match self {
            Error::Read { source, .. } | Error::Command { source, .. } => {
                ReadAborted::is_cause_of(source)
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
