//! GenomeChain - chain-based genome coordinate translation
//!
//! Translates loci between two assembly versions using the piecewise-linear
//! mapping described by a UCSC chain file.
//!
//! # Features
//!
//! - Validating builder: equal-length blocks, no overlapping ranges
//! - Immutable chains, safe to query from many threads at once
//! - Chain inversion for lifting back without re-reading the file
//! - Support for compressed chain files (gzip, bzip2)
//!
//! # Example
//!
//! ```ignore
//! use genome_chain::{ChainReader, Locus, Strand};
//!
//! // Load chain file
//! let chain = ChainReader::new().read_file("hg19ToHg38.over.chain.gz".as_ref())?.builder.build();
//!
//! // Map a locus
//! let lifted = chain.apply(&Locus::new("chr1", 1_000_000, Strand::Forward)?);
//!
//! // And back again
//! let back = chain.invert();
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    Builder, ChainBuildError, ChainLoad, ChainParseError, ChainReader, ChromStyle,
    ChromosomeName, GenomeChain, GenomeChainError, LiftError, Locus, LocusError, LocusRange,
    OverlapPolicy, Strand,
};
pub use formats::locus;
