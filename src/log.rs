//! Process-wide logging, mirroring the `log!`/`ed_assert!` macros used
//! throughout the teacher (`replay_syscall.rs`, `thread_group.rs`) rather
//! than reaching for the `log`/`env_logger` crates, which the teacher's
//! dependency table never pulls in.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    LogDebug = 0,
    LogInfo = 1,
    LogWarn = 2,
    LogError = 3,
}

lazy_static! {
    static ref VERBOSITY: AtomicUsize = AtomicUsize::new(init_verbosity() as usize);
}

fn init_verbosity() -> LogLevel {
    match env::var("TOCTOUD_LOG").as_deref() {
        Ok("debug") => LogLevel::LogDebug,
        Ok("info") => LogLevel::LogInfo,
        Ok("error") => LogLevel::LogError,
        _ => LogLevel::LogWarn,
    }
}

pub fn enabled(level: LogLevel) -> bool {
    level as usize >= VERBOSITY.load(Ordering::Relaxed)
}

/// Logs a message at the given level if the process verbosity allows it.
/// Call sites follow the teacher's `log!(LogDebug, "...", args)` shape.
/// `#[macro_export]` so both the library's own modules and the `main.rs`
/// binary can use it, the same as the `log` crate's own `log!`/`warn!`.
#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)*) => {
        if $crate::log::enabled($level) {
            eprintln!("[{:?}] {}", $level, format!($($arg)*));
        }
    };
}

/// Fatal assertion: logs at `LogError` and aborts the process. Used for the
/// programming/resource errors the spec classifies as fatal (an unknown
/// state machine state, allocation failure), matching the teacher's
/// `ed_assert!` convention and the reference C's `abort()` on malloc
/// failure.
#[macro_export]
macro_rules! ed_assert {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::log::fatal(format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! ed_fatal {
    ($($arg:tt)*) => {
        $crate::log::fatal(format!($($arg)*))
    };
}

/// Logs the message at `LogError`, dumps a backtrace, and aborts. Never
/// returns.
pub fn fatal(message: String) -> ! {
    eprintln!("[LogError] {}", message);
    let bt = backtrace::Backtrace::new();
    eprintln!("{:?}", bt);
    std::process::abort();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_is_enabled_by_default() {
        assert!(enabled(LogLevel::LogWarn));
        assert!(enabled(LogLevel::LogError));
    }
}
