use super::snapshot::ProcessStateCounts;

/// Run state taken from the first character of a `ps` state column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Sleeping,
    Stopped,
    Zombie,
    /// `U` on macOS, `D` on Linux.
    Uninterruptible,
    /// Classified so `from_code` is total over the codes `ps` prints, but no
    /// rule set tallies it: `procs_idle` stays zero on both platforms.
    Idle,
    /// Any other code, kept for callers inspecting unrecognized states.
    /// Such lines still count towards `total`.
    Other(char),
}

impl ProcessState {
    pub fn from_code(code: char) -> Self {
        match code {
            'R' => ProcessState::Running,
            'S' => ProcessState::Sleeping,
            'T' | 't' => ProcessState::Stopped,
            'Z' => ProcessState::Zombie,
            'U' | 'D' => ProcessState::Uninterruptible,
            'I' => ProcessState::Idle,
            other => ProcessState::Other(other),
        }
    }
}

/// How a platform maps `ps` states onto [`ProcessStateCounts`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateRules {
    /// Only sleeping, stopped and zombie are taken from `ps`; running and
    /// blocked are owned by `/proc/stat`.
    Linux,
    /// Everything comes from `ps`. Uninterruptible wait counts as both
    /// blocked and stopped.
    Darwin,
}

impl StateRules {
    fn apply(self, code: char, counts: &mut ProcessStateCounts) {
        match (self, ProcessState::from_code(code)) {
            (_, ProcessState::Sleeping) => counts.sleeping += 1,
            (_, ProcessState::Stopped) => counts.stopped += 1,
            (_, ProcessState::Zombie) => counts.zombie += 1,
            (StateRules::Darwin, ProcessState::Running) => counts.running += 1,
            // Linux reports `D` here too, but blocked comes from /proc/stat.
            (StateRules::Darwin, ProcessState::Uninterruptible) if code == 'U' => {
                counts.blocked += 1;
                counts.stopped += 1;
            }
            _ => {}
        }
    }
}

/// Tallies one `ps axo state=` listing.
///
/// Every non-blank line is a process and bumps `total`; its leading character
/// is classified under `rules`. Fields the rules don't own stay at zero.
pub fn tally_states(listing: &str, rules: StateRules) -> ProcessStateCounts {
    let mut counts = ProcessStateCounts::default();
    for line in listing.lines() {
        let line = line.trim();
        let Some(code) = line.chars().next() else {
            continue;
        };
        counts.total += 1;
        rules.apply(code, &mut counts);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "R\nS\nS\nZ\nT\n";

    #[test]
    fn linux_rules_leave_running_to_proc_stat() {
        let counts = tally_states(LISTING, StateRules::Linux);
        assert_eq!(counts.total, 5);
        assert_eq!(counts.sleeping, 2);
        assert_eq!(counts.zombie, 1);
        assert_eq!(counts.stopped, 1);
        assert_eq!(counts.running, 0);
        assert_eq!(counts.blocked, 0);
    }

    #[test]
    fn darwin_rules_count_running() {
        let counts = tally_states(LISTING, StateRules::Darwin);
        assert_eq!(counts.total, 5);
        assert_eq!(counts.running, 1);
        assert_eq!(counts.sleeping, 2);
        assert_eq!(counts.zombie, 1);
        assert_eq!(counts.stopped, 1);
    }

    #[test]
    fn darwin_uninterruptible_is_blocked_and_stopped() {
        let counts = tally_states("U\nUs\nR+\n", StateRules::Darwin);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.blocked, 2);
        assert_eq!(counts.stopped, 2);
        assert_eq!(counts.running, 1);
    }

    #[test]
    fn linux_ignores_disk_sleep_and_idle() {
        let counts = tally_states("D\nI<\nt\nSs+\n", StateRules::Linux);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.blocked, 0);
        assert_eq!(counts.idle, 0);
        assert_eq!(counts.stopped, 1);
        assert_eq!(counts.sleeping, 1);
    }

    #[test]
    fn blank_lines_and_padding_are_skipped() {
        let counts = tally_states("\n  Ss  \n\n   \nZ\n", StateRules::Darwin);
        assert_eq!(counts.total, 2);
        assert_eq!(counts.sleeping, 1);
        assert_eq!(counts.zombie, 1);
    }

    #[test]
    fn idle_and_unknown_codes_only_bump_total() {
        for rules in [StateRules::Linux, StateRules::Darwin] {
            let counts = tally_states("I\nX\n?\n", rules);
            assert_eq!(counts.total, 3);
            assert_eq!(counts.classified_total(), 0);
        }
    }

    #[test]
    fn state_codes_map() {
        assert_eq!(ProcessState::from_code('t'), ProcessState::Stopped);
        assert_eq!(ProcessState::from_code('D'), ProcessState::Uninterruptible);
        assert_eq!(ProcessState::from_code('X'), ProcessState::Other('X'));
    }
}
