use std::future::Future;
use std::path::PathBuf;

use crate::config::Config;
use crate::context::ReadContext;
use crate::error::{Error, Result};
use crate::system::command::CommandRunner;
use crate::system::snapshot::{LoadAverage, ProcessStateCounts};

mod linux;
mod macos;

pub use linux::LinuxSource;
pub use macos::DarwinSource;

/// Arguments asking `ps` for one header-less state column per process.
pub const PS_STATE_ARGS: &[&str] = &["axo", "state="];

pub trait LoadAverageSource {
    fn load_average(&self) -> Result<LoadAverage>;

    fn load_average_with_context(
        &self,
        ctx: &ReadContext,
    ) -> impl Future<Output = Result<LoadAverage>> + Send;
}

pub trait ProcessStateSource {
    fn process_state_counts(&self) -> Result<ProcessStateCounts>;

    fn process_state_counts_with_context(
        &self,
        ctx: &ReadContext,
    ) -> impl Future<Output = Result<ProcessStateCounts>> + Send;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Darwin,
}

impl Platform {
    /// The platform this process is running on, if supported.
    pub fn current() -> Option<Self> {
        Self::from_name(std::env::consts::OS)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "linux" | "android" => Some(Platform::Linux),
            "macos" | "darwin" => Some(Platform::Darwin),
            _ => None,
        }
    }

    /// Honors a forced platform from config, otherwise detects the host.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::from_name(&config.general.platform)
            .or_else(Self::current)
            .ok_or_else(|| Error::Unsupported {
                os: std::env::consts::OS.to_string(),
            })
    }
}

/// Resolves `tool`, failing with [`Error::ToolNotFound`].
pub(crate) fn locate_tool<R: CommandRunner>(runner: &R, tool: &str) -> Result<PathBuf> {
    runner.locate(tool).map_err(|source| Error::ToolNotFound {
        tool: tool.to_string(),
        source,
    })
}

/// The source for the platform chosen at startup.
#[derive(Debug)]
pub enum HostSource<R> {
    Linux(LinuxSource<R>),
    Darwin(DarwinSource<R>),
}

impl<R: CommandRunner> HostSource<R> {
    pub fn new(platform: Platform, config: &Config, runner: R) -> Self {
        match platform {
            Platform::Linux => HostSource::Linux(LinuxSource::from_config(config, runner)),
            Platform::Darwin => HostSource::Darwin(DarwinSource::from_config(config, runner)),
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            HostSource::Linux(_) => Platform::Linux,
            HostSource::Darwin(_) => Platform::Darwin,
        }
    }
}

impl<R: CommandRunner> LoadAverageSource for HostSource<R> {
    fn load_average(&self) -> Result<LoadAverage> {
        match self {
            HostSource::Linux(source) => source.load_average(),
            HostSource::Darwin(source) => source.load_average(),
        }
    }

    async fn load_average_with_context(&self, ctx: &ReadContext) -> Result<LoadAverage> {
        match self {
            HostSource::Linux(source) => source.load_average_with_context(ctx).await,
            HostSource::Darwin(source) => source.load_average_with_context(ctx).await,
        }
    }
}

impl<R: CommandRunner> ProcessStateSource for HostSource<R> {
    fn process_state_counts(&self) -> Result<ProcessStateCounts> {
        match self {
            HostSource::Linux(source) => source.process_state_counts(),
            HostSource::Darwin(source) => source.process_state_counts(),
        }
    }

    async fn process_state_counts_with_context(
        &self,
        ctx: &ReadContext,
    ) -> Result<ProcessStateCounts> {
        match self {
            HostSource::Linux(source) => source.process_state_counts_with_context(ctx).await,
            HostSource::Darwin(source) => source.process_state_counts_with_context(ctx).await,
        }
    }
}
