//! Coordinate value types
//!
//! Strand, chromosome names, single loci and half-open locus ranges.
//! All positions are 0-based; range ends are exclusive.

use crate::core::error::LocusError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, PartialOrd, Ord)]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl Strand {
    /// Get the complement strand
    ///
    /// # Examples
    /// ```
    /// use genome_chain::core::Strand;
    /// assert_eq!(Strand::Forward.complement(), Strand::Reverse);
    /// assert_eq!(Strand::Reverse.complement(), Strand::Forward);
    /// ```
    pub fn complement(&self) -> Self {
        match self {
            Strand::Forward => Strand::Reverse,
            Strand::Reverse => Strand::Forward,
        }
    }

    /// Parse strand from char
    ///
    /// # Examples
    /// ```
    /// use genome_chain::core::Strand;
    /// assert_eq!(Strand::from_char('+'), Some(Strand::Forward));
    /// assert_eq!(Strand::from_char('-'), Some(Strand::Reverse));
    /// assert_eq!(Strand::from_char('.'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Strand::Forward),
            '-' => Some(Strand::Reverse),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl FromStr for Strand {
    type Err = LocusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next().and_then(Strand::from_char), chars.next()) {
            (Some(strand), None) => Ok(strand),
            _ => Err(LocusError::InvalidStrand(s.to_string())),
        }
    }
}

/// Normalize chromosome name for lookup (handles chr1/1/CHR1 variants)
///
/// Returns a canonical form for comparison purposes.
///
/// # Examples
/// ```
/// use genome_chain::core::normalize_chrom;
///
/// assert_eq!(normalize_chrom("chr1"), normalize_chrom("1"));
/// assert_eq!(normalize_chrom("CHR1"), normalize_chrom("chr1"));
/// assert_eq!(normalize_chrom("chrX"), normalize_chrom("X"));
/// assert_eq!(normalize_chrom("chrM"), normalize_chrom("MT"));
/// ```
pub fn normalize_chrom(chrom: &str) -> String {
    let without_prefix = if chrom.len() > 3 && chrom.is_char_boundary(3) && chrom[..3].eq_ignore_ascii_case("chr") {
        &chrom[3..]
    } else {
        chrom
    };

    let upper = without_prefix.to_uppercase();
    if upper == "M" {
        "MT".to_string()
    } else {
        upper
    }
}

/// Chromosome ID style for output formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromStyle {
    /// Keep the spelling stored in the chain
    #[default]
    AsIs,
    /// Short style without "chr" prefix: "1", "2", "X", "Y", "M"
    Short,
    /// Long style with "chr" prefix: "chr1", "chr2", "chrX", "chrY", "chrM"
    Long,
}

impl ChromStyle {
    /// Format a chromosome name according to this style
    ///
    /// # Examples
    /// ```
    /// use genome_chain::core::ChromStyle;
    ///
    /// assert_eq!(ChromStyle::Short.apply("chr1"), "1");
    /// assert_eq!(ChromStyle::Long.apply("X"), "chrX");
    /// assert_eq!(ChromStyle::Long.apply("CHR1"), "chr1");
    /// assert_eq!(ChromStyle::AsIs.apply("1"), "1");
    /// ```
    pub fn apply(&self, chrom: &str) -> String {
        let has_prefix = chrom.len() > 3 && chrom.is_char_boundary(3) && chrom[..3].eq_ignore_ascii_case("chr");
        match self {
            ChromStyle::AsIs => chrom.to_string(),
            ChromStyle::Short if has_prefix => chrom[3..].to_string(),
            ChromStyle::Short => chrom.to_string(),
            ChromStyle::Long if has_prefix => format!("chr{}", &chrom[3..]),
            ChromStyle::Long => format!("chr{}", chrom),
        }
    }
}

/// An opaque chromosome identifier
///
/// Equality and hashing go through the normalized name, so `chr1`, `1` and
/// `CHR1` all name the same chromosome. The original spelling is kept for
/// display.
#[derive(Debug, Clone)]
pub struct ChromosomeName {
    name: String,
    key: String,
}

impl ChromosomeName {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let key = normalize_chrom(&name);
        Self { name, key }
    }

    /// The name as it was given
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// The normalized comparison key
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for ChromosomeName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ChromosomeName {}

impl Hash for ChromosomeName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for ChromosomeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for ChromosomeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ChromosomeName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A single 0-based coordinate on one strand of a chromosome
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locus {
    chromosome: ChromosomeName,
    position: i64,
    strand: Strand,
}

impl Locus {
    pub fn new(
        chromosome: impl Into<ChromosomeName>,
        position: i64,
        strand: Strand,
    ) -> Result<Self, LocusError> {
        if position < 0 {
            return Err(LocusError::InvalidPosition(position));
        }
        Ok(Self {
            chromosome: chromosome.into(),
            position,
            strand,
        })
    }

    pub fn chromosome(&self) -> &ChromosomeName {
        &self.chromosome
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}({})", self.chromosome, self.position, self.strand)
    }
}

/// A half-open interval `[start, end)` on one strand of a chromosome
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocusRange {
    chromosome: ChromosomeName,
    start: i64,
    end: i64,
    strand: Strand,
}

impl LocusRange {
    /// Create a range, rejecting negative starts and empty or inverted intervals
    ///
    /// # Examples
    /// ```
    /// use genome_chain::core::{LocusRange, Strand};
    ///
    /// let range = LocusRange::new("chr1", 100, 200, Strand::Forward).unwrap();
    /// assert_eq!(range.len(), 100);
    /// assert!(LocusRange::new("chr1", 200, 200, Strand::Forward).is_err());
    /// ```
    pub fn new(
        chromosome: impl Into<ChromosomeName>,
        start: i64,
        end: i64,
        strand: Strand,
    ) -> Result<Self, LocusError> {
        if start < 0 || end <= start {
            return Err(LocusError::InvalidRange { start, end });
        }
        Ok(Self {
            chromosome: chromosome.into(),
            start,
            end,
            strand,
        })
    }

    pub fn chromosome(&self) -> &ChromosomeName {
        &self.chromosome
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Number of positions covered; always positive
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    /// Whether `locus` lies in `[start, end)` on the same chromosome
    ///
    /// Strand is not compared.
    pub fn contains(&self, locus: &Locus) -> bool {
        self.chromosome == *locus.chromosome()
            && self.start <= locus.position()
            && locus.position() < self.end
    }

    /// Whether the two ranges share a chromosome and strand and intersect
    ///
    /// Adjacent ranges do not overlap.
    pub fn overlaps_with(&self, other: &LocusRange) -> bool {
        self.chromosome == other.chromosome
            && self.strand == other.strand
            && self.start < other.end
            && other.start < self.end
    }

    /// The locus at `offset` positions past `start`, on this range's strand
    pub(crate) fn locus_at(&self, offset: i64) -> Locus {
        Locus {
            chromosome: self.chromosome.clone(),
            position: self.start + offset,
            strand: self.strand,
        }
    }
}

impl fmt::Display for LocusRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[{},{})({})", self.chromosome, self.start, self.end, self.strand)
    }
}
