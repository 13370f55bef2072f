//! Error taxonomy per the input/programming/resource split: only the input
//! error (`FilenameTooLong`) is a `Result`; programming and resource errors
//! go through `log.rs`'s `ed_fatal!` and abort instead of growing this enum.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonError {
    FilenameTooLong { len: usize, max: usize },
}

impl fmt::Display for DaemonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaemonError::FilenameTooLong { len, max } => {
                write!(f, "filename length {} exceeds maximum of {}", len, max)
            }
        }
    }
}

impl std::error::Error for DaemonError {}

pub type Result<T> = std::result::Result<T, DaemonError>;
