//! Core of a user-space daemon that detects TOCTTOU (time-of-check-to-
//! time-of-use) file-access races by observing the syscalls issued by
//! monitored processes. See `SPEC_FULL.md` for the full design.
//!
//! The system-call interception mechanism, path canonicalization, and
//! command-line framing are external collaborators (spec §1); this crate
//! is the filestate subsystem and the thread registry that feeds it.

#[macro_use]
extern crate lazy_static;

#[macro_use]
pub mod log;

pub mod bounded_name;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod file_state;
pub mod file_table;
pub mod registry;
pub mod stat;
