//! Demo CLI: replays a JSON-lines event log through the core and prints the
//! verdict for every syscall event. Stands in for the out-of-scope
//! interception mechanism (spec §1) the way the reference's `foo.c`
//! stands in for a real caller of the AVL tree.

#[macro_use]
extern crate toctoud;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::exit;
use structopt::StructOpt;
use toctoud::dispatcher::{handle_syscall, DispatchResult};
use toctoud::event::{record_pid, record_tid, EventSource, JsonlEventSource, Record};
use toctoud::registry::ThreadRegistry;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "toctoud",
    about = "Replays a JSON-lines syscall event log through the TOCTTOU filestate core."
)]
struct Options {
    /// Path to a newline-delimited JSON event log. Reads stdin if omitted.
    #[structopt(parse(from_os_str))]
    trace_file: Option<PathBuf>,

    /// Exit with a non-zero status if any RACE verdict is produced.
    #[structopt(short, long)]
    fail_on_race: bool,
}

fn run_source(mut source: impl EventSource, fail_on_race: bool) -> bool {
    let mut registry = ThreadRegistry::new();
    let mut saw_race = false;

    while let Some(record) = source.next() {
        match record {
            Record::Create { pid, tid, ppid } => {
                registry.process_create(record_pid(pid), record_tid(tid), record_pid(ppid));
            }
            Record::Destroy { tid } => {
                if registry.process_destroy(record_tid(tid)).is_err() {
                    log!(
                        toctoud::log::LogLevel::LogWarn,
                        "destroy of unknown tid {}",
                        tid
                    );
                }
            }
            Record::Syscall {
                tid,
                syscall,
                filename,
                path,
                stat,
            } => {
                let result = handle_syscall(
                    &mut registry,
                    record_tid(tid),
                    syscall.into(),
                    &filename,
                    &path,
                    stat,
                );
                if result == DispatchResult::Race {
                    saw_race = true;
                }
                println!("{} {} {:?}", tid, filename, result);
            }
        }
    }

    !(fail_on_race && saw_race)
}

fn main() {
    let options = Options::from_args();

    let ok = match options.trace_file {
        Some(path) => {
            let file = File::open(&path).unwrap_or_else(|e| {
                eprintln!("toctoud: cannot open {}: {}", path.display(), e);
                exit(2);
            });
            run_source(JsonlEventSource::new(BufReader::new(file)), options.fail_on_race)
        }
        None => {
            let stdin = io::stdin();
            run_source(JsonlEventSource::new(stdin.lock()), options.fail_on_race)
        }
    };

    if !ok {
        exit(1);
    }
}
