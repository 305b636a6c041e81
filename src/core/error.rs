//! Error types for GenomeChain
//!
//! Defines all error types used throughout the library.

use crate::core::locus::LocusRange;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for GenomeChain operations
#[derive(Debug, Error)]
pub enum GenomeChainError {
    /// Chain construction errors
    #[error("Chain build error: {0}")]
    Build(#[from] ChainBuildError),

    /// Invalid locus or range
    #[error("Locus error: {0}")]
    Locus(#[from] LocusError),

    /// Chain file parsing errors
    #[error("Chain parse error: {0}")]
    ChainParse(#[from] ChainParseError),

    /// Locus record errors
    #[error("Lift error: {0}")]
    Lift(#[from] LiftError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which side of a correspondence collided with an existing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapSide {
    Source,
    Target,
}

impl std::fmt::Display for OverlapSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlapSide::Source => write!(f, "Source"),
            OverlapSide::Target => write!(f, "Target"),
        }
    }
}

/// Errors raised while assembling a chain through the builder
///
/// Both variants are reported before anything is inserted, so the builder
/// is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainBuildError {
    /// Source and target ranges differ in length
    #[error("{source_range} has size {} but {target_range} has size {}", .source_range.len(), .target_range.len())]
    LengthMismatch {
        source_range: LocusRange,
        target_range: LocusRange,
    },

    /// The new range collides with one already stored
    #[error("{side} locus {range} overlaps with {existing}")]
    Overlap {
        side: OverlapSide,
        range: LocusRange,
        existing: LocusRange,
    },
}

/// Errors raised when constructing loci and ranges
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocusError {
    /// Start must be non-negative and strictly before end
    #[error("Invalid coordinate range: start ({start}) must be >= 0 and < end ({end})")]
    InvalidRange { start: i64, end: i64 },

    /// Positions are 0-based and never negative
    #[error("Invalid position: {0} is negative")]
    InvalidPosition(i64),

    /// Strand field was not '+' or '-'
    #[error("Invalid strand '{0}', expected '+' or '-'")]
    InvalidStrand(String),
}

/// Specific kinds of chain parsing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainParseErrorKind {
    /// Invalid chain header format
    InvalidHeader,
    /// Invalid data line format
    InvalidDataLine,
    /// Invalid strand character (must be '+' or '-')
    InvalidStrand,
    /// Failed to parse a numeric value
    InvalidNumber,
    /// Coordinate validation error (e.g., start > end)
    InvalidCoordinates,
    /// Block rejected by the builder
    Rejected,
}

/// Errors that can occur during chain file parsing
#[derive(Debug, Error)]
pub enum ChainParseError {
    /// Malformed content at a given line
    #[error("Line {line}: {message}")]
    Malformed {
        line: usize,
        kind: ChainParseErrorKind,
        message: String,
    },

    /// A block that parsed cleanly but violates the chain invariants
    #[error("Line {line}: {source}")]
    Rejected {
        line: usize,
        #[source]
        source: ChainBuildError,
    },

    /// File not found
    #[error("Chain file not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error during parsing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChainParseError {
    pub fn invalid_header(message: impl Into<String>, line: usize) -> Self {
        Self::Malformed {
            line,
            kind: ChainParseErrorKind::InvalidHeader,
            message: message.into(),
        }
    }

    pub fn invalid_data_line(message: impl Into<String>, line: usize) -> Self {
        Self::Malformed {
            line,
            kind: ChainParseErrorKind::InvalidDataLine,
            message: message.into(),
        }
    }

    pub fn invalid_strand(strand: &str, line: usize) -> Self {
        Self::Malformed {
            line,
            kind: ChainParseErrorKind::InvalidStrand,
            message: format!("Invalid strand '{}', expected '+' or '-'", strand),
        }
    }

    pub fn invalid_number(field: &str, value: &str, line: usize) -> Self {
        Self::Malformed {
            line,
            kind: ChainParseErrorKind::InvalidNumber,
            message: format!("Invalid {} value '{}': expected a non-negative integer", field, value),
        }
    }

    pub fn invalid_coordinates(message: impl Into<String>, line: usize) -> Self {
        Self::Malformed {
            line,
            kind: ChainParseErrorKind::InvalidCoordinates,
            message: message.into(),
        }
    }

    /// Line number where the error occurred (1-based), if known
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Malformed { line, .. } | Self::Rejected { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Check if this is a specific kind of error
    pub fn is_kind(&self, kind: ChainParseErrorKind) -> bool {
        match self {
            Self::Malformed { kind: k, .. } => *k == kind,
            Self::Rejected { .. } => kind == ChainParseErrorKind::Rejected,
            _ => false,
        }
    }
}

/// Errors that can occur while lifting locus records
#[derive(Debug, Error)]
pub enum LiftError {
    /// Record did not have the expected columns
    #[error("Invalid locus record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    /// Output write error
    #[error("Failed to write output: {0}")]
    WriteError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for GenomeChain operations
pub type Result<T> = std::result::Result<T, GenomeChainError>;

/// Result type alias for builder operations
pub type BuildResult<T> = std::result::Result<T, ChainBuildError>;

/// Result type alias for chain parsing operations
pub type ParseResult<T> = std::result::Result<T, ChainParseError>;

/// Result type alias for lift operations
pub type LiftResult<T> = std::result::Result<T, LiftError>;
