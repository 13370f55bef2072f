//! Bounded filename type, ≤ `MAX_FILE_LEN` bytes, the primary key of a
//! [`crate::file_table::FileTable`].

use crate::error::{DaemonError, Result};
use serde::{Deserialize, Serialize};
use static_assertions::const_assert;
use std::convert::TryFrom;
use std::fmt;

/// `MAX_FILE_LEN` in the reference `td_filestate.h`.
pub const MAX_FILE_LEN: usize = 255;

const_assert!(MAX_FILE_LEN > 0);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileName(String);

impl FileName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FileName {
    type Error = DaemonError;

    fn try_from(s: String) -> Result<FileName> {
        if s.len() > MAX_FILE_LEN {
            return Err(DaemonError::FilenameTooLong {
                len: s.len(),
                max: MAX_FILE_LEN,
            });
        }
        Ok(FileName(s))
    }
}

impl TryFrom<&str> for FileName {
    type Error = DaemonError;

    fn try_from(s: &str) -> Result<FileName> {
        FileName::try_from(s.to_owned())
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exactly_max_len() {
        let name = "a".repeat(MAX_FILE_LEN);
        assert!(FileName::try_from(name).is_ok());
    }

    #[test]
    fn rejects_over_max_len() {
        let name = "a".repeat(MAX_FILE_LEN + 1);
        let err = FileName::try_from(name).unwrap_err();
        assert_eq!(
            err,
            DaemonError::FilenameTooLong {
                len: MAX_FILE_LEN + 1,
                max: MAX_FILE_LEN,
            }
        );
    }
}
