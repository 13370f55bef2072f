//! Kernel-verified metadata snapshot compared across check/use syscalls.

use libc::{dev_t, gid_t, ino_t, mode_t, uid_t};
use serde::{Deserialize, Serialize};

/// A stat()-shaped snapshot, restricted to the fields the filestate machine
/// actually compares. Time fields are deliberately absent: the spec defines
/// them as ignored, so there's nothing to store or compare.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStat {
    pub dev: dev_t,
    pub ino: ino_t,
    pub mode: mode_t,
    pub uid: uid_t,
    pub gid: gid_t,
}

impl FileStat {
    pub fn new(dev: dev_t, ino: ino_t, mode: mode_t, uid: uid_t, gid: gid_t) -> FileStat {
        FileStat {
            dev,
            ino,
            mode,
            uid,
            gid,
        }
    }

    /// Equality excluding time fields, i.e. the only equality the state
    /// machine ever asks for.
    pub fn same(&self, other: &FileStat) -> bool {
        self == other
    }
}
