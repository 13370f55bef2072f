//! The ambient stand-in for the out-of-scope syscall interception mechanism
//! (§1). `EventSource` is the pluggable contract a real interceptor
//! (ptrace, seccomp-notify, an LSM, a kernel hook) would implement; this
//! crate ships only `JsonlEventSource`, a replay harness analogous to the
//! reference's `foo.c` AVL demo, for `main.rs`'s demo binary.

use crate::dispatcher::SyscallCode;
use crate::registry::{Pid, Tid};
use crate::stat::FileStat;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Create { pid: i32, tid: i32, ppid: i32 },
    Destroy { tid: i32 },
    Syscall {
        tid: i32,
        syscall: WireSyscallCode,
        filename: String,
        path: String,
        stat: FileStat,
    },
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireSyscallCode {
    Access,
    Stat,
    Creat,
    Open,
    Close,
    Other,
}

impl From<WireSyscallCode> for SyscallCode {
    fn from(w: WireSyscallCode) -> SyscallCode {
        match w {
            WireSyscallCode::Access => SyscallCode::Access,
            WireSyscallCode::Stat => SyscallCode::Stat,
            WireSyscallCode::Creat => SyscallCode::Creat,
            WireSyscallCode::Open => SyscallCode::Open,
            WireSyscallCode::Close => SyscallCode::Close,
            WireSyscallCode::Other => SyscallCode::Other,
        }
    }
}

/// What the interceptor hands the core, lifecycle calls included.
pub trait EventSource {
    fn next(&mut self) -> Option<Record>;
}

/// Reads newline-delimited JSON records from any `BufRead`. Malformed lines
/// are fatal: a demo harness that can't parse its own input is a
/// programming error, not a recoverable one.
pub struct JsonlEventSource<R: BufRead> {
    lines: std::io::Lines<R>,
}

impl<R: BufRead> JsonlEventSource<R> {
    pub fn new(reader: R) -> JsonlEventSource<R> {
        JsonlEventSource {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> EventSource for JsonlEventSource<R> {
    fn next(&mut self) -> Option<Record> {
        loop {
            let line = self
                .lines
                .next()?
                .unwrap_or_else(|e| ed_fatal!("failed to read event line: {}", e));
            if line.trim().is_empty() {
                continue;
            }
            return Some(
                serde_json::from_str(&line)
                    .unwrap_or_else(|e| ed_fatal!("malformed event line '{}': {}", line, e)),
            );
        }
    }
}

pub fn record_pid(pid: i32) -> Pid {
    Pid(pid)
}

pub fn record_tid(tid: i32) -> Tid {
    Tid(tid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_create_syscall_destroy() {
        let input = r#"
            {"kind":"create","pid":1,"tid":1,"ppid":0}
            {"kind":"syscall","tid":1,"syscall":"stat","filename":"foo","path":"/","stat":{"dev":1,"ino":0,"mode":33188,"uid":0,"gid":0}}
            {"kind":"destroy","tid":1}
        "#;
        let mut src = JsonlEventSource::new(Cursor::new(input.trim()));
        assert!(matches!(src.next(), Some(Record::Create { .. })));
        assert!(matches!(src.next(), Some(Record::Syscall { .. })));
        assert!(matches!(src.next(), Some(Record::Destroy { .. })));
        assert!(src.next().is_none());
    }
}
