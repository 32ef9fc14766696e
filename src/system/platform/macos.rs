use std::io;
use std::path::PathBuf;

use super::{LoadAverageSource, PS_STATE_ARGS, ProcessStateSource, locate_tool};
use crate::config::Config;
use crate::context::ReadContext;
use crate::error::{Error, Result};
use crate::system::command::CommandRunner;
use crate::system::parse::parse_sysctl_loadavg;
use crate::system::process::{StateRules, tally_states};
use crate::system::snapshot::{LoadAverage, ProcessStateCounts};

const LOADAVG_ARGS: &[&str] = &["-n", "vm.loadavg"];

/// macOS has no procfs: load comes from `sysctl vm.loadavg`, states from `ps`.
///
/// `ctxt` and `idle` are never populated here.
#[derive(Debug)]
pub struct DarwinSource<R> {
    sysctl: String,
    ps: String,
    runner: R,
}

impl<R: CommandRunner> DarwinSource<R> {
    pub fn new(runner: R) -> Self {
        Self {
            sysctl: "/usr/sbin/sysctl".to_string(),
            ps: "ps".to_string(),
            runner,
        }
    }

    pub fn from_config(config: &Config, runner: R) -> Self {
        Self::new(runner)
            .with_sysctl(&config.tools.sysctl)
            .with_ps(&config.tools.ps)
    }

    pub fn with_sysctl(mut self, sysctl: impl Into<String>) -> Self {
        self.sysctl = sysctl.into();
        self
    }

    pub fn with_ps(mut self, ps: impl Into<String>) -> Self {
        self.ps = ps.into();
        self
    }

    /// A missing `sysctl` means the control interface is unavailable, which
    /// is reported as an I/O failure rather than a missing tool.
    fn locate_sysctl(&self) -> Result<PathBuf> {
        self.runner.locate(&self.sysctl).map_err(|e| {
            Error::command(
                &self.sysctl,
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("control interface unavailable: {e}"),
                ),
            )
        })
    }
}

impl<R: CommandRunner> LoadAverageSource for DarwinSource<R> {
    fn load_average(&self) -> Result<LoadAverage> {
        let sysctl = self.locate_sysctl()?;
        let out = self
            .runner
            .run(&sysctl, LOADAVG_ARGS)
            .map_err(|e| Error::command(&sysctl, e))?;
        Ok(parse_sysctl_loadavg(&out)?)
    }

    async fn load_average_with_context(&self, ctx: &ReadContext) -> Result<LoadAverage> {
        let sysctl = self.locate_sysctl()?;
        let out = self
            .runner
            .run_with_context(ctx, &sysctl, LOADAVG_ARGS)
            .await
            .map_err(|e| Error::command(&sysctl, e))?;
        Ok(parse_sysctl_loadavg(&out)?)
    }
}

impl<R: CommandRunner> ProcessStateSource for DarwinSource<R> {
    fn process_state_counts(&self) -> Result<ProcessStateCounts> {
        let ps = locate_tool(&self.runner, &self.ps)?;
        let listing = self
            .runner
            .run(&ps, PS_STATE_ARGS)
            .map_err(|e| Error::command(&ps, e))?;
        Ok(tally_states(&listing, StateRules::Darwin))
    }

    async fn process_state_counts_with_context(
        &self,
        ctx: &ReadContext,
    ) -> Result<ProcessStateCounts> {
        let ps = locate_tool(&self.runner, &self.ps)?;
        let listing = self
            .runner
            .run_with_context(ctx, &ps, PS_STATE_ARGS)
            .await
            .map_err(|e| Error::command(&ps, e))?;
        Ok(tally_states(&listing, StateRules::Darwin))
    }
}
