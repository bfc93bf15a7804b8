//! Error types for propagation, deduplication and match orchestration.

use std::error::Error;
use std::fmt::{Display, Formatter};

use xmatch_frames::FrameError;

/// Which end of an epoch range a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochSide {
    From,
    To,
}

impl Display for EpochSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::From => f.write_str("from"),
            Self::To => f.write_str("to"),
        }
    }
}

/// Broad classification of a [`MatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Contract violation by the caller.
    InvalidInput,
    /// Failure reported by an external collaborator.
    Collaborator,
}

/// Errors from the cross-match core.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MatchError {
    /// Neither a year nor an MJD was given for one end of the epoch range.
    MissingEpoch(EpochSide),
    /// Single-row propagation was asked to move a row with untrusted proper motion.
    UnusableProperMotion,
    /// Sequences that must be row-aligned have different lengths.
    LengthMismatch { expected: usize, found: usize },
    /// Finite declination at or beyond a pole; `1/cos(dec)` is singular.
    DeclinationOutOfRange(f64),
    /// Named column is not present in the table.
    MissingColumn(String),
    /// Named column exists but holds a different value type.
    ColumnType {
        column: String,
        expected: &'static str,
    },
    /// Repeated deduplication still left adjacent duplicate ids.
    DedupDidNotConverge { passes: usize },
    InvalidConfig(&'static str),
    /// An external collaborator (query service, table sink) failed.
    Collaborator(String),
}

impl MatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Collaborator(_) => ErrorKind::Collaborator,
            _ => ErrorKind::InvalidInput,
        }
    }
}

impl Display for MatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEpoch(side) => {
                write!(f, "invalid input: one of mjd_{side} or year_{side} must be given")
            }
            Self::UnusableProperMotion => {
                write!(f, "invalid input: proper motion is not usable, epoch cannot be moved")
            }
            Self::LengthMismatch { expected, found } => {
                write!(f, "invalid input: length mismatch, expected {expected}, found {found}")
            }
            Self::DeclinationOutOfRange(dec) => {
                write!(f, "invalid input: declination {dec} deg is outside (-90, 90)")
            }
            Self::MissingColumn(name) => write!(f, "invalid input: no column named '{name}'"),
            Self::ColumnType { column, expected } => {
                write!(f, "invalid input: column '{column}' is not of type {expected}")
            }
            Self::DedupDidNotConverge { passes } => {
                write!(f, "duplicates remain after {passes} deduplication passes")
            }
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Collaborator(msg) => write!(f, "collaborator error: {msg}"),
        }
    }
}

impl Error for MatchError {}

impl From<FrameError> for MatchError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::LengthMismatch { expected, found } => {
                Self::LengthMismatch { expected, found }
            }
        }
    }
}
