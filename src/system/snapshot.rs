use std::fmt;

use serde::{Deserialize, Serialize};

/// Load averages over the trailing 1, 5 and 15 minutes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadAverage {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
}

/// Host-wide process counts by scheduling state.
///
/// `total` is reported as-is by whichever source produced it and is never
/// reconciled with the per-state fields; see [`ProcessStateCounts::is_consistent`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStateCounts {
    #[serde(rename = "procsTotal")]
    pub total: u64,
    #[serde(rename = "procsRunning")]
    pub running: u64,
    #[serde(rename = "procsBlocked")]
    pub blocked: u64,
    #[serde(rename = "procsStopped")]
    pub stopped: u64,
    #[serde(rename = "procsSleeping")]
    pub sleeping: u64,
    #[serde(rename = "procsIdle")]
    pub idle: u64,
    #[serde(rename = "procsZombie")]
    pub zombie: u64,
    /// Context switches since boot.
    pub ctxt: u64,
}

impl ProcessStateCounts {
    /// Sum of every per-state counter.
    pub fn classified_total(&self) -> u64 {
        self.running + self.blocked + self.stopped + self.sleeping + self.idle + self.zombie
    }

    /// Whether `total` agrees with [`classified_total`](Self::classified_total).
    ///
    /// Rarely true on real hosts: on Linux `running`/`blocked` come from
    /// `/proc/stat` while `total` comes from `ps`, and on macOS a `U` process
    /// is counted as both blocked and stopped.
    pub fn is_consistent(&self) -> bool {
        self.total == self.classified_total()
    }
}

fn write_json<T: Serialize>(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let json = serde_json::to_string(value).map_err(|_| fmt::Error)?;
    f.write_str(&json)
}

impl fmt::Display for LoadAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(self, f)
    }
}

impl fmt::Display for ProcessStateCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classified_total_sums_states() {
        let counts = ProcessStateCounts {
            total: 10,
            running: 1,
            blocked: 2,
            stopped: 3,
            sleeping: 2,
            idle: 1,
            zombie: 1,
            ctxt: 999,
        };
        assert_eq!(counts.classified_total(), 10);
        assert!(counts.is_consistent());

        let drifted = ProcessStateCounts { total: 12, ..counts };
        assert!(!drifted.is_consistent());
    }

    #[test]
    fn display_round_trips_through_json() {
        let counts = ProcessStateCounts {
            total: 5,
            sleeping: 2,
            zombie: 1,
            stopped: 1,
            ctxt: 42,
            ..Default::default()
        };
        let back: ProcessStateCounts = serde_json::from_str(&counts.to_string()).unwrap();
        assert_eq!(back, counts);
    }
}
