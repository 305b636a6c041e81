//! Chain file reader
//!
//! Turns UCSC chain text into [`Builder::add`] calls.
//!
//! # Chain File Format
//!
//! ```text
//! chain score tName tSize tStrand tStart tEnd qName qSize qStrand qStart qEnd id
//! size dt dq
//! size dt dq
//! size
//! ```
//!
//! - Header line starts with "chain"
//! - Data lines contain: size (aligned block), dt (gap in t), dq (gap in q)
//! - Last data line has only size (no gaps)
//!
//! The `t` side is the source assembly and the `q` side the target. Block
//! coordinates stay in the frame of their strand, as the format defines them,
//! so each block maps source to target by a plain offset.

use crate::core::error::{ChainParseError, ParseResult};
use crate::core::genome_chain::Builder;
use crate::core::io::open_reader;
use crate::core::locus::{LocusRange, Strand};
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// What to do with a block the builder rejects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Fail the whole read at the offending line
    #[default]
    Reject,
    /// Log a warning, count the block and continue
    Skip,
}

/// Parsed chain header
#[derive(Debug, Clone)]
pub struct ChainHeader {
    pub score: u64,
    pub source_name: String,
    pub source_size: i64,
    pub source_strand: Strand,
    pub source_start: i64,
    pub source_end: i64,
    pub target_name: String,
    pub target_size: i64,
    pub target_strand: Strand,
    pub target_start: i64,
    pub target_end: i64,
    pub chain_id: String,
}

fn parse_number(field: &str, value: &str, line_number: usize) -> ParseResult<i64> {
    value
        .parse::<i64>()
        .ok()
        .filter(|n| *n >= 0)
        .ok_or_else(|| ChainParseError::invalid_number(field, value, line_number))
}

fn parse_strand(value: &str, line_number: usize) -> ParseResult<Strand> {
    value
        .parse::<Strand>()
        .map_err(|_| ChainParseError::invalid_strand(value, line_number))
}

fn check_span(side: &str, start: i64, end: i64, size: i64, line_number: usize) -> ParseResult<()> {
    if start > end {
        return Err(ChainParseError::invalid_coordinates(
            format!("{} start ({}) > {} end ({})", side, start, side.to_lowercase(), end),
            line_number,
        ));
    }
    if end > size {
        return Err(ChainParseError::invalid_coordinates(
            format!("{} end ({}) > {} size ({})", side, end, side.to_lowercase(), size),
            line_number,
        ));
    }
    Ok(())
}

impl ChainHeader {
    /// Parse a chain header line
    pub fn parse(line: &str, line_number: usize) -> ParseResult<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        if fields.len() < 12 {
            return Err(ChainParseError::invalid_header(
                format!("Expected 12+ fields, got {}", fields.len()),
                line_number,
            ));
        }
        if fields[0] != "chain" {
            return Err(ChainParseError::invalid_header(
                format!("Expected 'chain' keyword, got '{}'", fields[0]),
                line_number,
            ));
        }

        let score = fields[1]
            .parse::<u64>()
            .map_err(|_| ChainParseError::invalid_number("score", fields[1], line_number))?;

        let source_size = parse_number("source size", fields[3], line_number)?;
        let source_strand = parse_strand(fields[4], line_number)?;
        let source_start = parse_number("source start", fields[5], line_number)?;
        let source_end = parse_number("source end", fields[6], line_number)?;
        check_span("Source", source_start, source_end, source_size, line_number)?;

        let target_size = parse_number("target size", fields[8], line_number)?;
        let target_strand = parse_strand(fields[9], line_number)?;
        let target_start = parse_number("target start", fields[10], line_number)?;
        let target_end = parse_number("target end", fields[11], line_number)?;
        check_span("Target", target_start, target_end, target_size, line_number)?;

        Ok(Self {
            score,
            source_name: fields[2].to_string(),
            source_size,
            source_strand,
            source_start,
            source_end,
            target_name: fields[7].to_string(),
            target_size,
            target_strand,
            target_start,
            target_end,
            chain_id: fields.get(12).map(|s| s.to_string()).unwrap_or_default(),
        })
    }
}

/// Data line in a chain file (size, dt, dq)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DataLine {
    size: i64,
    source_gap: i64,
    target_gap: i64,
}

impl DataLine {
    fn parse(line: &str, line_number: usize) -> ParseResult<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        let (size, source_gap, target_gap) = match fields.as_slice() {
            [size] => (parse_number("block size", size, line_number)?, 0, 0),
            [size, dt, dq] => (
                parse_number("block size", size, line_number)?,
                parse_number("source gap (dt)", dt, line_number)?,
                parse_number("target gap (dq)", dq, line_number)?,
            ),
            _ => {
                return Err(ChainParseError::invalid_data_line(
                    format!("Expected 1 or 3 fields, got {}", fields.len()),
                    line_number,
                ))
            }
        };

        if size == 0 {
            return Err(ChainParseError::invalid_data_line(
                "Block size must be greater than 0",
                line_number,
            ));
        }

        Ok(Self {
            size,
            source_gap,
            target_gap,
        })
    }
}

/// `pos + size + gap`, or an error if the file's numbers overflow
fn advance(pos: i64, size: i64, gap: i64, line_number: usize) -> ParseResult<i64> {
    pos.checked_add(size)
        .and_then(|p| p.checked_add(gap))
        .ok_or_else(|| {
            ChainParseError::invalid_coordinates(
                format!("Block of size {} with gap {} overflows past {}", size, gap, pos),
                line_number,
            )
        })
}

/// Counters collected while reading a chain file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub chains: usize,
    pub blocks: usize,
    pub skipped: usize,
}

/// Output of a chain read: a populated builder plus bookkeeping
#[derive(Debug, Clone, Default)]
pub struct ChainLoad {
    pub builder: Builder,
    pub stats: LoadStats,
    pub source_sizes: HashMap<String, i64>,
    pub target_sizes: HashMap<String, i64>,
}

/// Position of the next block within the current chain
struct Cursor {
    header: ChainHeader,
    source_pos: i64,
    target_pos: i64,
}

/// Reads chain text into a [`Builder`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainReader {
    policy: OverlapPolicy,
}

impl ChainReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: OverlapPolicy) -> Self {
        Self { policy }
    }

    /// Read a chain file from a path
    ///
    /// Automatically handles gzip and bzip2 compression.
    pub fn read_file(&self, path: &Path) -> ParseResult<ChainLoad> {
        if !path.exists() {
            return Err(ChainParseError::FileNotFound(path.to_path_buf()));
        }
        let reader = open_reader(path)?;
        self.read(reader)
    }

    /// Read chain data from bytes (for testing)
    pub fn read_bytes(&self, data: &[u8]) -> ParseResult<ChainLoad> {
        self.read(BufReader::new(data))
    }

    /// Read chain data from any buffered source
    pub fn read<R: BufRead>(&self, reader: R) -> ParseResult<ChainLoad> {
        let mut load = ChainLoad::default();
        let mut cursor: Option<Cursor> = None;

        for (idx, line_result) in reader.lines().enumerate() {
            let line_number = idx + 1;
            let line = line_result?;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                // Blank line ends the current chain
                if trimmed.is_empty() {
                    cursor = None;
                }
                continue;
            }

            if trimmed.starts_with("chain") {
                let header = ChainHeader::parse(trimmed, line_number)?;
                load.source_sizes
                    .insert(header.source_name.clone(), header.source_size);
                load.target_sizes
                    .insert(header.target_name.clone(), header.target_size);
                load.stats.chains += 1;
                cursor = Some(Cursor {
                    source_pos: header.source_start,
                    target_pos: header.target_start,
                    header,
                });
                continue;
            }

            let Some(cur) = cursor.as_mut() else {
                return Err(ChainParseError::invalid_data_line(
                    "Data line outside of a chain",
                    line_number,
                ));
            };

            let data = DataLine::parse(trimmed, line_number)?;
            self.add_block(&mut load, cur, data, line_number)?;
            cur.source_pos = advance(cur.source_pos, data.size, data.source_gap, line_number)?;
            cur.target_pos = advance(cur.target_pos, data.size, data.target_gap, line_number)?;
        }

        log::debug!(
            "Read {} chains, {} blocks ({} skipped)",
            load.stats.chains,
            load.stats.blocks,
            load.stats.skipped
        );
        Ok(load)
    }

    fn add_block(
        &self,
        load: &mut ChainLoad,
        cur: &Cursor,
        data: DataLine,
        line_number: usize,
    ) -> ParseResult<()> {
        let header = &cur.header;
        let source_end = advance(cur.source_pos, data.size, 0, line_number)?;
        let target_end = advance(cur.target_pos, data.size, 0, line_number)?;
        if source_end > header.source_end || target_end > header.target_end {
            return Err(ChainParseError::invalid_coordinates(
                format!(
                    "Block of size {} runs past the chain end (source {}, target {})",
                    data.size, header.source_end, header.target_end
                ),
                line_number,
            ));
        }

        let range = |name: &str, start: i64, strand: Strand| {
            LocusRange::new(name, start, start + data.size, strand).map_err(|e| {
                ChainParseError::invalid_coordinates(e.to_string(), line_number)
            })
        };
        let source = range(&header.source_name, cur.source_pos, header.source_strand)?;
        let target = range(&header.target_name, cur.target_pos, header.target_strand)?;

        match load.builder.add(source, target) {
            Ok(_) => load.stats.blocks += 1,
            Err(e) => match self.policy {
                OverlapPolicy::Reject => {
                    return Err(ChainParseError::Rejected {
                        line: line_number,
                        source: e,
                    })
                }
                OverlapPolicy::Skip => {
                    log::warn!("Skipping block at line {}: {}", line_number, e);
                    load.stats.skipped += 1;
                }
            },
        }
        Ok(())
    }
}
