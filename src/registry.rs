//! Thread registry: by-tid and by-pid indexes plus the per-group intrusive
//! sibling list, owning thread records and (transitively, through the
//! group head) file tables. Mirrors the teacher's
//! `Rc<RefCell<ThreadGroup>>` sharing pattern in `thread_group.rs`, adapted
//! from a task-set owner to a sibling-linked-list owner per spec §4.2.

use crate::file_table::FileTable;
use crate::log::LogLevel::LogDebug;
use libc::pid_t;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tid(pub pid_t);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(pub pid_t);

pub struct ThreadRecordInner {
    pub tid: Tid,
    pub pid: Pid,
    pub ppid: Pid,
    next: Option<ThreadHandle>,
    files: Rc<RefCell<FileTable>>,
}

pub type ThreadHandle = Rc<RefCell<ThreadRecordInner>>;

impl ThreadRecordInner {
    pub fn files(&self) -> Rc<RefCell<FileTable>> {
        self.files.clone()
    }
}

/// Returned by `process_destroy` when the given `tid` isn't registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

#[derive(Default)]
pub struct ThreadRegistry {
    by_tid: HashMap<Tid, ThreadHandle>,
    /// Value is the current head of the group's sibling list.
    by_pid: HashMap<Pid, ThreadHandle>,
}

impl ThreadRegistry {
    pub fn new() -> ThreadRegistry {
        ThreadRegistry {
            by_tid: HashMap::new(),
            by_pid: HashMap::new(),
        }
    }

    /// Announces a new thread. Shares the group's existing file table if one
    /// exists, otherwise allocates a fresh one. Allocation failure is fatal
    /// (`Rc`/`Box` allocation failure aborts the process by default in
    /// Rust, which already matches the spec's "resource errors abort"
    /// policy without extra code).
    pub fn process_create(&mut self, pid: Pid, tid: Tid, ppid: Pid) -> ThreadHandle {
        let head = self.by_pid.get(&pid).cloned();
        let files = match &head {
            Some(h) => h.borrow().files.clone(),
            None => Rc::new(RefCell::new(FileTable::new())),
        };

        let record: ThreadHandle = Rc::new(RefCell::new(ThreadRecordInner {
            tid,
            pid,
            ppid,
            next: None,
            files,
        }));

        match head {
            Some(h) => {
                // Insert right after the head, per the reference's
                // after-head insertion convention; the by-pid index still
                // points at the unchanged head.
                let old_next = h.borrow().next.clone();
                record.borrow_mut().next = old_next;
                h.borrow_mut().next = Some(record.clone());
            }
            None => {
                self.by_pid.insert(pid, record.clone());
            }
        }

        self.by_tid.insert(tid, record.clone());
        log!(
            LogDebug,
            "process_create tid={} pid={} ppid={}",
            tid.0,
            pid.0,
            ppid.0
        );
        record
    }

    pub fn find_process(&self, tid: Tid) -> Option<ThreadHandle> {
        self.by_tid.get(&tid).cloned()
    }

    pub fn find_process_pid(&self, pid: Pid) -> Option<ThreadHandle> {
        self.by_pid.get(&pid).cloned()
    }

    /// Destroys a thread. If it's the sole member of its group, the shared
    /// file table is destroyed too, visiting every file record with a
    /// disposal callback first (the AVL `destroy(visitor)` analog from
    /// spec §4.1).
    pub fn process_destroy(&mut self, tid: Tid) -> Result<(), NotFound> {
        let record = match self.by_tid.remove(&tid) {
            Some(r) => r,
            None => return Err(NotFound),
        };

        let pid = record.borrow().pid;
        let head = self
            .by_pid
            .get(&pid)
            .cloned()
            .unwrap_or_else(|| ed_fatal!("by-pid index missing for live pid {}", pid.0));

        let deleted_is_head = Rc::ptr_eq(&head, &record);
        let next = record.borrow().next.clone();

        if deleted_is_head && next.is_none() {
            // Sole member of the group: tear down the file table.
            self.by_pid.remove(&pid);
            let files = record.borrow().files.clone();
            drop(record);
            files.borrow().dispose_all(|f| {
                log!(LogDebug, "disposing file record '{}' on group exit", f.name);
            });
        } else if deleted_is_head {
            self.by_pid.insert(pid, next.unwrap());
        } else {
            let mut cur = head;
            loop {
                let cur_next = cur.borrow().next.clone();
                match cur_next {
                    Some(n) if Rc::ptr_eq(&n, &record) => {
                        let grandchild = record.borrow().next.clone();
                        cur.borrow_mut().next = grandchild;
                        break;
                    }
                    Some(n) => cur = n,
                    None => ed_fatal!("sibling chain broken looking for tid {}", tid.0),
                }
            }
        }

        log!(LogDebug, "process_destroy tid={}", tid.0);
        Ok(())
    }
}
