//! Error types for sky-geometry computations.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from element-wise sky computations.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    /// Input sequences do not have the same length.
    LengthMismatch { expected: usize, found: usize },
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LengthMismatch { expected, found } => {
                write!(f, "length mismatch: expected {expected}, found {found}")
            }
        }
    }
}

impl Error for FrameError {}
