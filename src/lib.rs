//! Host-wide scheduler statistics: load averages and process-state counters.
//!
//! Linux reads `/proc/loadavg` and `/proc/stat` and supplements them with
//! `ps`; macOS asks `sysctl vm.loadavg` and `ps`. The platform is picked at
//! startup (see [`Platform`]) and every read is a fresh, uncached snapshot.
//!
//! ```no_run
//! let load = hostload::load_average()?;
//! println!("{load}");
//! # Ok::<(), hostload::Error>(())
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod system;

pub use config::Config;
pub use context::{ReadAborted, ReadContext};
pub use error::{Error, ParseError, Result};
pub use system::collector::Collector;
pub use system::command::{CommandRunner, SystemRunner};
pub use system::platform::{LoadAverageSource, Platform, ProcessStateSource};
pub use system::snapshot::{LoadAverage, ProcessStateCounts};

/// Reads the host load averages.
pub fn load_average() -> Result<LoadAverage> {
    Collector::new()?.load_average()
}

/// Reads the host load averages, aborting when `ctx` is cancelled or expires.
pub async fn load_average_with_context(ctx: &ReadContext) -> Result<LoadAverage> {
    Collector::new()?.load_average_with_context(ctx).await
}

/// Counts host processes by scheduling state.
pub fn process_state_counts() -> Result<ProcessStateCounts> {
    Collector::new()?.process_state_counts()
}

/// Counts host processes by scheduling state, aborting when `ctx` is
/// cancelled or expires.
pub async fn process_state_counts_with_context(ctx: &ReadContext) -> Result<ProcessStateCounts> {
    Collector::new()?.process_state_counts_with_context(ctx).await
}
