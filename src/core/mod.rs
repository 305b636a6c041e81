//! Core coordinate mapping functionality
//!
//! This module contains the locus types, the chain builder and immutable
//! chain, the chain file reader, and compression-aware I/O helpers.

pub mod error;
mod genome_chain;
pub mod io;
mod locus;
mod reader;

pub use error::{
    BuildResult, ChainBuildError, ChainParseError, ChainParseErrorKind, GenomeChainError,
    LiftError, LiftResult, LocusError, OverlapSide, ParseResult, Result,
};
pub use genome_chain::{Builder, GenomeChain};
pub use io::{create_writer, detect_compression, open_reader, CompressionFormat};
pub use locus::{normalize_chrom, ChromStyle, ChromosomeName, Locus, LocusRange, Strand};
pub use reader::{ChainHeader, ChainLoad, ChainReader, LoadStats, OverlapPolicy};
