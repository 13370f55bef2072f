//! Runtime configuration surface. No on-disk config file — the spec is
//! explicit there is none — but the teacher's `lazy_static!`-backed `Flags`
//! singleton (`src/flags.rs`) is still the right shape for the handful of
//! process-wide knobs this daemon exposes.

use crate::bounded_name::MAX_FILE_LEN;
use static_assertions::const_assert;

const_assert!(MAX_FILE_LEN == 255);

#[derive(Clone, Debug)]
pub struct Flags {
    /// Mirrors `TOCTOUD_LOG`, surfaced here for callers that want to read
    /// configuration through one struct instead of the environment.
    pub verbose: bool,
    /// Compile-time bound per spec §6; not independently configurable, kept
    /// as a field so callers can assert against it without reaching into
    /// `bounded_name` directly.
    pub max_filename_len: usize,
}

lazy_static! {
    static ref FLAGS: Flags = init_flags();
}

impl Flags {
    pub fn get() -> &'static Flags {
        &*FLAGS
    }
}

fn init_flags() -> Flags {
    let verbose = std::env::var("TOCTOUD_LOG")
        .map(|v| v == "debug" || v == "info")
        .unwrap_or(false);
    Flags {
        verbose,
        max_filename_len: MAX_FILE_LEN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_filename_len_matches_spec_bound() {
        assert_eq!(Flags::get().max_filename_len, 255);
    }
}
