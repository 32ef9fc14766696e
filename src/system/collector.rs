use crate::config::Config;
use crate::context::ReadContext;
use crate::error::Result;

use super::command::{CommandRunner, SystemRunner};
use super::platform::{HostSource, LoadAverageSource, Platform, ProcessStateSource};
use super::snapshot::{LoadAverage, ProcessStateCounts};

#[cfg(feature = "perf-tracing")]
use tracing::Instrument;

/// Entry point for the four host reads.
///
/// Holds no state between calls; every read goes back to the kernel.
#[derive(Debug)]
pub struct Collector<R = SystemRunner> {
    source: HostSource<R>,
}

impl Collector<SystemRunner> {
    /// Uses the user's config file (see [`config_path`]) and `HOST_PROC`,
    /// detecting the platform unless one is forced.
    ///
    /// [`config_path`]: crate::config::config_path
    pub fn new() -> Result<Self> {
        Self::from_config(&Config::load()?)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_runner(config, SystemRunner::new())
    }
}

impl<R: CommandRunner> Collector<R> {
    pub fn with_runner(config: &Config, runner: R) -> Result<Self> {
        let platform = Platform::from_config(config)?;
        Ok(Self::for_platform(platform, config, runner))
    }

    pub fn for_platform(platform: Platform, config: &Config, runner: R) -> Self {
        Collector {
            source: HostSource::new(platform, config, runner),
        }
    }

    pub fn platform(&self) -> Platform {
        self.source.platform()
    }

    pub fn load_average(&self) -> Result<LoadAverage> {
        #[cfg(feature = "perf-tracing")]
        let _span = tracing::debug_span!("collector.load_average").entered();

        self.source.load_average()
    }

    pub async fn load_average_with_context(&self, ctx: &ReadContext) -> Result<LoadAverage> {
        let read = self.source.load_average_with_context(ctx);
        #[cfg(feature = "perf-tracing")]
        let read = read.instrument(tracing::debug_span!("collector.load_average"));
        read.await
    }

    pub fn process_state_counts(&self) -> Result<ProcessStateCounts> {
        #[cfg(feature = "perf-tracing")]
        let _span = tracing::debug_span!("collector.process_state_counts").entered();

        self.source.process_state_counts()
    }

    pub async fn process_state_counts_with_context(
        &self,
        ctx: &ReadContext,
    ) -> Result<ProcessStateCounts> {
        let read = self.source.process_state_counts_with_context(ctx);
        #[cfg(feature = "perf-tracing")]
        let read = read.instrument(tracing::debug_span!("collector.process_state_counts"));
        read.await
    }
}
