//! Locus record conversion
//!
//! Lifts tab-separated locus records (`chrom pos [strand] [extra...]`,
//! 0-based positions) through a [`GenomeChain`]. Extra columns are carried
//! through untouched. Records that fall in a gap or on an unknown chromosome
//! are written to the unmap output.

use crate::core::error::{LiftError, LiftResult};
use crate::core::io::{create_writer, open_reader};
use crate::core::{ChromStyle, GenomeChain, Locus, Strand};
use rayon::prelude::*;
use std::io::{BufRead, Write};
use std::path::Path;

/// Records per parallel work unit
const CHUNK_SIZE: usize = 10_000;

/// A parsed view of one locus line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocusRecordView<'a> {
    pub chrom: &'a str,
    /// The record's coordinate; strand defaults to forward
    pub locus: Locus,
    /// Strand column as given, if any
    pub strand: Option<Strand>,
    /// Remaining columns, tab-joined
    pub extra: Option<&'a str>,
}

impl<'a> LocusRecordView<'a> {
    /// Parse a locus line
    ///
    /// # Examples
    /// ```
    /// use genome_chain::formats::LocusRecordView;
    /// use genome_chain::Strand;
    ///
    /// let view = LocusRecordView::parse("chr1\t150\t-\trs42", 1).unwrap();
    /// assert_eq!(view.chrom, "chr1");
    /// assert_eq!(view.locus.position(), 150);
    /// assert_eq!(view.strand, Some(Strand::Reverse));
    /// assert_eq!(view.extra, Some("rs42"));
    /// ```
    pub fn parse(line: &'a str, line_number: usize) -> LiftResult<Self> {
        let invalid = |message: String| LiftError::InvalidRecord {
            line: line_number,
            message,
        };

        let mut fields = line.splitn(4, '\t');
        let chrom = fields
            .next()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| invalid("missing chromosome".to_string()))?;
        let pos_field = fields
            .next()
            .ok_or_else(|| invalid("missing position".to_string()))?;
        let position = pos_field
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(format!("invalid position '{}'", pos_field)))?;
        let strand = match fields.next().map(str::trim) {
            None | Some("") | Some(".") => None,
            Some(s) => Some(s.parse::<Strand>().map_err(|e| invalid(e.to_string()))?),
        };
        let locus = Locus::new(chrom, position, strand.unwrap_or_default())
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            chrom,
            locus,
            strand,
            extra: fields.next(),
        })
    }
}

/// Conversion statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub invalid: usize,
}

/// Result of converting a single locus record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    /// Successfully mapped
    Success(String),
    /// Fell in a gap or on an unknown chromosome
    Unmapped(String),
    /// Could not be parsed
    Invalid(String),
}

/// Lift one record line through the chain
pub fn convert_record(
    line: &str,
    line_number: usize,
    chain: &GenomeChain,
    chrom_style: ChromStyle,
) -> ConversionResult {
    let view = match LocusRecordView::parse(line, line_number) {
        Ok(view) => view,
        Err(e) => {
            log::debug!("{}", e);
            return ConversionResult::Invalid(line.to_string());
        }
    };

    match chain.apply(&view.locus) {
        Some(lifted) => {
            let chrom = chrom_style.apply(lifted.chromosome().as_str());
            let mut out = format!("{}\t{}\t{}", chrom, lifted.position(), lifted.strand());
            if let Some(extra) = view.extra {
                out.push('\t');
                out.push_str(extra);
            }
            ConversionResult::Success(out)
        }
        None => ConversionResult::Unmapped(line.to_string()),
    }
}

/// Lifted and unlifted lines from one batch of records
#[derive(Debug, Default)]
struct ChunkOutput {
    mapped: Vec<String>,
    unmapped: Vec<String>,
    invalid: usize,
}

fn convert_chunk(
    chunk: &[(usize, String)],
    chain: &GenomeChain,
    chrom_style: ChromStyle,
) -> ChunkOutput {
    let mut out = ChunkOutput::default();
    for (line_number, line) in chunk {
        match convert_record(line, *line_number, chain, chrom_style) {
            ConversionResult::Success(l) => out.mapped.push(l),
            ConversionResult::Unmapped(l) => out.unmapped.push(l),
            ConversionResult::Invalid(l) => {
                out.invalid += 1;
                out.unmapped.push(l);
            }
        }
    }
    out
}

/// Lift every record of `input`, writing mapped records to `output` and
/// the rest to `unmap`
///
/// `#` header lines are passed through to the output. With `threads > 1`
/// records are processed in parallel chunks; output order is preserved.
pub fn convert_loci<P: AsRef<Path>>(
    input: P,
    output: P,
    unmap: P,
    chain: &GenomeChain,
    chrom_style: ChromStyle,
    threads: usize,
) -> LiftResult<ConversionStats> {
    let reader = open_reader(input.as_ref())?;

    let mut header_lines = Vec::new();
    let mut records = Vec::new();
    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with('#') {
            header_lines.push(line);
        } else {
            records.push((idx + 1, line));
        }
    }

    let results: Vec<ChunkOutput> = if threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| LiftError::Io(std::io::Error::other(format!(
                "Failed to create thread pool: {}",
                e
            ))))?;
        pool.install(|| {
            records
                .par_chunks(CHUNK_SIZE)
                .map(|chunk| convert_chunk(chunk, chain, chrom_style))
                .collect()
        })
    } else {
        records
            .chunks(CHUNK_SIZE)
            .map(|chunk| convert_chunk(chunk, chain, chrom_style))
            .collect()
    };

    let mut output_file = create_writer(output.as_ref())?;
    let mut unmap_file = create_writer(unmap.as_ref())?;
    for header in &header_lines {
        writeln!(output_file, "{}", header)?;
    }

    let mut stats = ConversionStats {
        total: records.len(),
        ..Default::default()
    };
    for chunk in results {
        stats.success += chunk.mapped.len();
        stats.failed += chunk.unmapped.len();
        stats.invalid += chunk.invalid;
        for line in chunk.mapped {
            writeln!(output_file, "{}", line)?;
        }
        for line in chunk.unmapped {
            writeln!(unmap_file, "{}", line)?;
        }
    }
    output_file
        .flush()
        .map_err(|e| LiftError::WriteError(e.to_string()))?;
    unmap_file
        .flush()
        .map_err(|e| LiftError::WriteError(e.to_string()))?;

    Ok(stats)
}
