//! File format adapters
//!
//! Adapters that lift records of genomic text formats through a chain.

pub mod locus;

pub use locus::{convert_loci, convert_record, ConversionResult, ConversionStats, LocusRecordView};
