//! Compression-aware I/O helpers
//!
//! Chain files are commonly distributed gzip- or bzip2-compressed; locus
//! inputs may be either. Readers are opened with a large buffer.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Default buffer size for BufReader (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

impl CompressionFormat {
    /// Guess the format from leading bytes
    pub fn from_magic(magic: &[u8]) -> Self {
        match magic {
            [0x1f, 0x8b, ..] => CompressionFormat::Gzip,
            // "BZh"
            [0x42, 0x5a, 0x68, ..] => CompressionFormat::Bzip2,
            _ => CompressionFormat::Plain,
        }
    }
}

/// Detect compression format from file path and/or content
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("gz") => return Ok(CompressionFormat::Gzip),
        Some("bz2") => return Ok(CompressionFormat::Bzip2),
        _ => {}
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;
    Ok(CompressionFormat::from_magic(&magic[..bytes_read]))
}

/// Open a file for buffered line reading, decompressing as needed
pub fn open_reader(path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
    let format = detect_compression(path)?;
    let file = File::open(path)?;
    log::debug!("Opening {:?} as {:?}", path, format);

    let reader: Box<dyn BufRead + Send> = match format {
        CompressionFormat::Gzip => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            flate2::read::MultiGzDecoder::new(file),
        )),
        CompressionFormat::Bzip2 => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            bzip2::read::BzDecoder::new(file),
        )),
        CompressionFormat::Plain => Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)),
    };
    Ok(reader)
}

/// Create a buffered writer; gzip-compressed when the path ends in `.gz`
pub fn create_writer(path: &Path) -> io::Result<Box<dyn Write + Send>> {
    let file = File::create(path)?;
    let writer: Box<dyn Write + Send> = if path.extension().is_some_and(|e| e == "gz") {
        Box::new(BufWriter::with_capacity(
            DEFAULT_BUFFER_SIZE,
            flate2::write::GzEncoder::new(file, flate2::Compression::default()),
        ))
    } else {
        Box::new(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file))
    };
    Ok(writer)
}
