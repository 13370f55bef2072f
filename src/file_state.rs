//! The per-file state machine: decides health and next state from (current
//! state, transition, observed stat). This is the central TOCTTOU-detection
//! algorithm, ported from `original_source/usrDaemon/td_filestate.c`.

use crate::bounded_name::FileName;
use crate::stat::FileStat;

/// Position in the per-file three-state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    /// Baseline: meta-data snapshot is current.
    Update,
    /// The file is in use; snapshot must match future observations.
    Enforce,
    /// The file has been closed; snapshot may be stale.
    Retire,
}

/// Monotone severity classifier for a file record. `Ord` gives us
/// `max(health, x)` via `std::cmp::max` directly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Health {
    Ok,
    Unchecked,
    Bad,
}

/// The abstract action induced by a syscall that drives the state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The program is checking the file (`access`, `stat`).
    Test,
    /// The program is using the file (`open`, `creat`).
    Use,
    /// The program closes the file.
    Close,
}

/// A single file's observed history within one thread group's file table.
#[derive(Clone, Debug)]
pub struct FileRecord {
    pub name: FileName,
    pub state: State,
    pub health: Health,
    pub nropen: u64,
    pub fderr: i32,
    pub stat: FileStat,
    /// Reserved for future path/directory verification (TODO, deferred per
    /// spec §1); never populated today.
    pub dir: Option<()>,
}

impl FileRecord {
    /// Creates the record for the first observation of `name` in a table,
    /// per the first-observation rules in §4.4.
    pub fn first_observation(name: FileName, transition: Transition, stat: FileStat) -> FileRecord {
        let (state, health) = match transition {
            Transition::Test => (State::Update, Health::Ok),
            // Open Questions: the canonical mapping is USE -> Enforce,
            // CLOSE -> Retire, not the reference's literal state=transition
            // assignment (a documented latent bug in the original).
            Transition::Use => (State::Enforce, Health::Unchecked),
            Transition::Close => (State::Retire, Health::Unchecked),
        };
        FileRecord {
            name,
            state,
            health,
            nropen: 0,
            fderr: 0,
            stat,
            dir: None,
        }
    }

    /// Applies a subsequent observation per the §4.4 transition table.
    /// `nropen` is not touched here; the dispatcher increments it on
    /// `OPEN`/`CREAT`.
    pub fn observe(&mut self, transition: Transition, observed: FileStat) {
        use State::*;
        use Transition::*;

        let matches = self.stat.same(&observed);
        let (overwrite, next) = match (self.state, transition) {
            (Update, Test) => (true, Update),
            (Update, Use) => (false, Enforce),
            (Update, Close) => (false, Retire),
            (Enforce, Test) => (false, Enforce),
            (Enforce, Use) => (false, Enforce),
            (Enforce, Close) => (false, Retire),
            (Retire, Test) => (true, Update),
            (Retire, Use) => (false, Enforce),
            (Retire, Close) => (true, Retire),
        };

        let health_bump = match transition {
            // TEST in UPDATE and CLOSE/TEST in RETIRE overwrite the
            // snapshot and only ever raise health to at least OK.
            _ if overwrite => Health::Ok,
            _ => {
                if matches {
                    Health::Ok
                } else {
                    Health::Bad
                }
            }
        };

        // Health is monotonic non-decreasing: OK < UNCHECKED < BAD.
        self.health = std::cmp::max(self.health, health_bump);
        self.state = next;
        if overwrite {
            self.stat = observed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    fn name(s: &str) -> FileName {
        FileName::try_from(s).unwrap()
    }

    fn stat0() -> FileStat {
        FileStat::new(1, 0, 0o100644, 0, 0)
    }

    fn stat_other_ino() -> FileStat {
        FileStat::new(1, 5, 0o100644, 0, 0)
    }

    #[test]
    fn first_observation_test_is_ok() {
        let r = FileRecord::first_observation(name("foo"), Transition::Test, stat0());
        assert_eq!(r.state, State::Update);
        assert_eq!(r.health, Health::Ok);
    }

    #[test]
    fn first_observation_use_is_unchecked_and_enforce() {
        let r = FileRecord::first_observation(name("foo"), Transition::Use, stat0());
        assert_eq!(r.state, State::Enforce);
        assert_eq!(r.health, Health::Unchecked);
    }

    #[test]
    fn first_observation_close_is_unchecked_and_retire() {
        let r = FileRecord::first_observation(name("foo"), Transition::Close, stat0());
        assert_eq!(r.state, State::Retire);
        assert_eq!(r.health, Health::Unchecked);
    }

    #[test]
    fn update_test_idempotent_on_unchanged_stat() {
        let mut r = FileRecord::first_observation(name("foo"), Transition::Test, stat0());
        r.observe(Transition::Test, stat0());
        assert_eq!(r.state, State::Update);
        assert_eq!(r.health, Health::Ok);
        assert_eq!(r.stat, stat0());
    }

    #[test]
    fn update_use_matching_stat_passes_and_enforces() {
        let mut r = FileRecord::first_observation(name("foo"), Transition::Test, stat0());
        r.observe(Transition::Use, stat0());
        assert_eq!(r.state, State::Enforce);
        assert_eq!(r.health, Health::Ok);
    }

    #[test]
    fn update_use_mismatching_stat_is_race() {
        let mut r = FileRecord::first_observation(name("foo"), Transition::Test, stat0());
        r.observe(Transition::Use, stat_other_ino());
        assert_eq!(r.state, State::Enforce);
        assert_eq!(r.health, Health::Bad);
    }

    #[test]
    fn health_stays_bad_once_set_even_on_matching_close() {
        let mut r = FileRecord::first_observation(name("foo"), Transition::Test, stat0());
        r.observe(Transition::Use, stat_other_ino());
        assert_eq!(r.health, Health::Bad);
        r.observe(Transition::Close, stat_other_ino());
        assert_eq!(r.health, Health::Bad);
    }

    #[test]
    fn retire_close_twice_is_idempotent() {
        let mut r = FileRecord::first_observation(name("foo"), Transition::Test, stat0());
        r.observe(Transition::Close, stat0());
        assert_eq!(r.state, State::Retire);
        r.observe(Transition::Close, stat0());
        assert_eq!(r.state, State::Retire);
        assert_eq!(r.health, Health::Ok);
    }

    #[test]
    fn retire_test_returns_to_update_and_overwrites() {
        let mut r = FileRecord::first_observation(name("foo"), Transition::Close, stat0());
        r.observe(Transition::Test, stat_other_ino());
        assert_eq!(r.state, State::Update);
        assert_eq!(r.stat, stat_other_ino());
    }
}
