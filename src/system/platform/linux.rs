use std::path::PathBuf;

use super::{LoadAverageSource, PS_STATE_ARGS, ProcessStateSource, locate_tool};
use crate::config::Config;
use crate::context::ReadContext;
use crate::error::{Error, Result};
use crate::system::command::CommandRunner;
use crate::system::parse::{SchedStat, parse_loadavg, parse_sched_stat};
use crate::system::process::{StateRules, tally_states};
use crate::system::snapshot::{LoadAverage, ProcessStateCounts};

/// Reads `<proc_root>/loadavg` and `<proc_root>/stat`, plus `ps` for the
/// states `/proc/stat` doesn't break out.
#[derive(Debug)]
pub struct LinuxSource<R> {
    proc_root: PathBuf,
    ps: String,
    runner: R,
}

impl<R: CommandRunner> LinuxSource<R> {
    pub fn new(proc_root: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            proc_root: proc_root.into(),
            ps: "ps".to_string(),
            runner,
        }
    }

    pub fn from_config(config: &Config, runner: R) -> Self {
        Self::new(&config.general.proc_root, runner).with_ps(&config.tools.ps)
    }

    pub fn with_ps(mut self, ps: impl Into<String>) -> Self {
        self.ps = ps.into();
        self
    }

    fn proc_path(&self, name: &str) -> PathBuf {
        self.proc_root.join(name)
    }
}

/// `/proc/stat` owns running, blocked and ctxt; `ps` owns everything else.
fn merge(sched: SchedStat, listing: &str) -> ProcessStateCounts {
    ProcessStateCounts {
        running: sched.procs_running,
        blocked: sched.procs_blocked,
        ctxt: sched.ctxt,
        ..tally_states(listing, StateRules::Linux)
    }
}

impl<R: CommandRunner> LoadAverageSource for LinuxSource<R> {
    fn load_average(&self) -> Result<LoadAverage> {
        let path = self.proc_path("loadavg");
        let content = std::fs::read_to_string(&path).map_err(|e| Error::read(&path, e))?;
        Ok(parse_loadavg(&content)?)
    }

    async fn load_average_with_context(&self, ctx: &ReadContext) -> Result<LoadAverage> {
        let path = self.proc_path("loadavg");
        let content = ctx
            .run(tokio::fs::read_to_string(&path))
            .await
            .map_err(|e| Error::read(&path, e))?;
        Ok(parse_loadavg(&content)?)
    }
}

impl<R: CommandRunner> ProcessStateSource for LinuxSource<R> {
    fn process_state_counts(&self) -> Result<ProcessStateCounts> {
        let path = self.proc_path("stat");
        let content = std::fs::read_to_string(&path).map_err(|e| Error::read(&path, e))?;
        let sched = parse_sched_stat(&content);

        let ps = locate_tool(&self.runner, &self.ps)?;
        let listing = self
            .runner
            .run(&ps, PS_STATE_ARGS)
            .map_err(|e| Error::command(&ps, e))?;

        Ok(merge(sched, &listing))
    }

    async fn process_state_counts_with_context(
        &self,
        ctx: &ReadContext,
    ) -> Result<ProcessStateCounts> {
        let path = self.proc_path("stat");
        let content = ctx
            .run(tokio::fs::read_to_string(&path))
            .await
            .map_err(|e| Error::read(&path, e))?;
        let sched = parse_sched_stat(&content);

        let ps = locate_tool(&self.runner, &self.ps)?;
        let listing = self
            .runner
            .run_with_context(ctx, &ps, PS_STATE_ARGS)
            .await
            .map_err(|e| Error::command(&ps, e))?;

        Ok(merge(sched, &listing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mock::StaticRunner;

    #[test]
    fn merge_keeps_proc_stat_running_and_blocked() {
        let sched = SchedStat {
            procs_running: 7,
            procs_blocked: 2,
            ctxt: 12345,
        };
        // `R` and `D` in the listing must not leak into running/blocked.
        let counts = merge(sched, "R\nR\nD\nS\nZ\nT\n");
        assert_eq!(counts.running, 7);
        assert_eq!(counts.blocked, 2);
        assert_eq!(counts.ctxt, 12345);
        assert_eq!(counts.total, 6);
        assert_eq!(counts.sleeping, 1);
        assert_eq!(counts.zombie, 1);
        assert_eq!(counts.stopped, 1);
    }

    #[test]
    fn missing_proc_root_is_a_read_error() {
        let source = LinuxSource::new("/nonexistent/hostload/proc", StaticRunner::new());
        let err = source.load_average().unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
        assert!(err.is_io());
    }

    #[test]
    fn missing_ps_is_tool_not_found() {
        let root = std::env::temp_dir().join(format!("hostload_linux_ps_{}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("stat"), "procs_running 1\n").unwrap();

        let source = LinuxSource::new(&root, StaticRunner::new().without_tool("ps"));
        let err = source.process_state_counts().unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { ref tool, .. } if tool == "ps"));

        let _ = std::fs::remove_dir_all(&root);
    }
}
