//! Syscall dispatcher: translates a syscall event into a transition and
//! applies it to the issuing thread's file table, per spec §4.5.

use crate::bounded_name::FileName;
use crate::file_state::{Health, Transition};
use crate::log::LogLevel::{LogError, LogWarn};
use crate::registry::{Tid, ThreadRegistry};
use crate::stat::FileStat;
use std::convert::TryFrom;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SyscallCode {
    Access,
    Stat,
    Creat,
    Open,
    Close,
    /// Anything outside {ACCESS, STAT, CREAT, OPEN, CLOSE}. The reference
    /// leaves its result pointer unwritten for these; this crate instead
    /// returns `DispatchResult::Pass` explicitly (spec §9 Open Questions).
    Other,
}

impl SyscallCode {
    fn transition(self) -> Option<Transition> {
        match self {
            SyscallCode::Access | SyscallCode::Stat => Some(Transition::Test),
            SyscallCode::Open | SyscallCode::Creat => Some(Transition::Use),
            SyscallCode::Close => Some(Transition::Close),
            SyscallCode::Other => None,
        }
    }

    fn counts_as_open(self) -> bool {
        matches!(self, SyscallCode::Open | SyscallCode::Creat)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DispatchResult {
    Pass,
    Unchecked,
    Race,
    PidErr,
}

/// Entry point: `handle_syscall(tid, syscall_code, filename, path, stat)`.
/// `path` is reserved for directory verification (TODO, deferred) and
/// currently only used in the `Unchecked`/`Race` diagnostic text.
pub fn handle_syscall(
    registry: &mut ThreadRegistry,
    tid: Tid,
    syscall: SyscallCode,
    filename: &str,
    path: &str,
    stat: FileStat,
) -> DispatchResult {
    let thread = match registry.find_process(tid) {
        Some(t) => t,
        None => return DispatchResult::PidErr,
    };

    let transition = match syscall.transition() {
        Some(t) => t,
        None => return DispatchResult::Pass,
    };

    let name = match FileName::try_from(filename) {
        Ok(n) => n,
        Err(e) => ed_fatal!("{}", e),
    };

    let files = thread.borrow().files();
    let health = {
        let mut table = files.borrow_mut();
        table.observe(name.clone(), transition, stat);
        if syscall.counts_as_open() {
            table.bump_nropen(&name);
        }
        table
            .find(&name)
            .unwrap_or_else(|| ed_fatal!("file record for '{}' vanished mid-dispatch", filename))
            .health
    };

    match health {
        Health::Ok => DispatchResult::Pass,
        Health::Unchecked => {
            log!(LogWarn, "unchecked use of '{}' at '{}'", filename, path);
            DispatchResult::Unchecked
        }
        Health::Bad => {
            log!(LogError, "TOCTTOU race detected on '{}' at '{}'", filename, path);
            DispatchResult::Race
        }
    }
}
