//! Per-thread-group file table: filename -> file record. "Any balanced
//! ordered map suffices" per spec §1/§4.1, so this wraps `BTreeMap` rather
//! than a bespoke AVL tree.

use crate::bounded_name::FileName;
use crate::file_state::{FileRecord, Transition};
use crate::stat::FileStat;
use std::collections::BTreeMap;

#[derive(Default)]
pub struct FileTable {
    files: BTreeMap<FileName, FileRecord>,
}

impl FileTable {
    pub fn new() -> FileTable {
        FileTable {
            files: BTreeMap::new(),
        }
    }

    pub fn find(&self, name: &FileName) -> Option<&FileRecord> {
        self.files.get(name)
    }

    /// Applies `transition` to the record for `name`, creating it on first
    /// observation, and returns the (now up to date) record.
    pub fn observe(
        &mut self,
        name: FileName,
        transition: Transition,
        stat: FileStat,
    ) -> &FileRecord {
        self.files
            .entry(name.clone())
            .and_modify(|r| r.observe(transition, stat))
            .or_insert_with(|| FileRecord::first_observation(name, transition, stat))
    }

    /// Increments `nropen` for an existing record. Called by the dispatcher
    /// on `OPEN`/`CREAT`, never by the state machine itself (spec §4.4).
    pub fn bump_nropen(&mut self, name: &FileName) {
        if let Some(record) = self.files.get_mut(name) {
            record.nropen += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Visits every file record in key order and applies `visitor`, the
    /// AVL `destroy(visitor)` analog from spec §4.1. Called once, when the
    /// table's owning thread group has no threads left.
    pub fn dispose_all(&self, mut visitor: impl FnMut(&FileRecord)) {
        for record in self.files.values() {
            visitor(record);
        }
    }
}
