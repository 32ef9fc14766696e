//! Parsers for kernel-exposed text.
//!
//! Pure functions over already-read content; no I/O happens here.

use crate::error::ParseError;

use super::snapshot::LoadAverage;

/// The `/proc/stat` counters this crate reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedStat {
    pub procs_running: u64,
    pub procs_blocked: u64,
    pub ctxt: u64,
}

fn parse_load_tokens<'a>(
    mut tokens: impl Iterator<Item = &'a str>,
) -> Result<LoadAverage, ParseError> {
    let mut next = |name: &str| -> Result<f64, ParseError> {
        let token = tokens
            .next()
            .ok_or_else(|| ParseError::new(format!("missing {name}")))?;
        // Load is a finite, non-negative average; `nan`, `inf` and `-1` parse
        // as f64 but are not load values.
        token
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or_else(|| ParseError::new(format!("invalid {name}: {token:?}")))
    };

    Ok(LoadAverage {
        load1: next("load1")?,
        load5: next("load5")?,
        load15: next("load15")?,
    })
}

/// Parses `/proc/loadavg`, e.g. `0.15 0.10 0.05 1/150 12345`.
///
/// Only the first three fields are read.
pub fn parse_loadavg(content: &str) -> Result<LoadAverage, ParseError> {
    parse_load_tokens(content.split_whitespace())
}

/// Parses `sysctl -n vm.loadavg` output, e.g. `{ 1.80 1.79 1.73 }`.
pub fn parse_sysctl_loadavg(content: &str) -> Result<LoadAverage, ParseError> {
    let inner = content.replacen("{ ", "", 1).replacen(" }", "", 1);
    parse_load_tokens(inner.split_whitespace())
}

/// Parses the scheduler counters out of `/proc/stat`.
///
/// Lines that aren't exactly `key value`, unknown keys, and recognized keys
/// with a non-integer value are all skipped. Missing keys stay at zero.
pub fn parse_sched_stat(content: &str) -> SchedStat {
    let mut stat = SchedStat::default();

    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let (Some(key), Some(value), None) = (fields.next(), fields.next(), fields.next()) else {
            continue;
        };
        let Ok(value) = value.parse::<u64>() else {
            continue;
        };
        match key {
            "procs_running" => stat.procs_running = value,
            "procs_blocked" => stat.procs_blocked = value,
            "ctxt" => stat.ctxt = value,
            _ => {}
        }
    }

    stat
}
