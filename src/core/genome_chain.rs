//! Chain mapping between two assemblies
//!
//! A [`Builder`] accumulates validated source→target range correspondences,
//! one bucket per source chromosome. [`Builder::build`] freezes the buckets
//! into an immutable [`GenomeChain`] that answers point queries and can be
//! inverted.
//!
//! Within a bucket, entries are grouped by strand and ordered by end
//! position. Same-strand source ranges never overlap, so inside one group
//! the order by end is also the order by start.

use crate::core::error::{BuildResult, ChainBuildError, OverlapSide};
use crate::core::locus::{ChromosomeName, Locus, LocusRange, Strand};
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound::{Excluded, Unbounded};

/// Ordering key for a range: chromosome, then strand, then end position
///
/// Only ranges sharing chromosome and strand are ever meaningfully compared;
/// the leading fields keep each such group contiguous.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RangeKey {
    chromosome: String,
    strand: Strand,
    end: i64,
}

impl RangeKey {
    fn of(range: &LocusRange) -> Self {
        Self {
            chromosome: range.chromosome().key().to_string(),
            strand: range.strand(),
            end: range.end(),
        }
    }

    /// Every same-group range ending after `range.start()` sorts above this key
    fn lower_bound(range: &LocusRange) -> Self {
        Self {
            chromosome: range.chromosome().key().to_string(),
            strand: range.strand(),
            end: range.start(),
        }
    }

    fn same_group(&self, other: &RangeKey) -> bool {
        self.chromosome == other.chromosome && self.strand == other.strand
    }
}

/// One aligned block: equal-length source and target ranges
#[derive(Debug, Clone, PartialEq, Eq)]
struct Block {
    source: LocusRange,
    target: LocusRange,
}

/// Mutable per-chromosome state of a builder
///
/// `targets` indexes the target side of `blocks` so both overlap checks
/// are a single ordered lookup.
#[derive(Debug, Clone, Default)]
struct WorkingBucket {
    blocks: BTreeMap<RangeKey, Block>,
    targets: BTreeMap<RangeKey, RangeKey>,
}

impl WorkingBucket {
    fn source_overlap(&self, source: &LocusRange) -> Option<&LocusRange> {
        first_candidate(&self.blocks, source)
            .map(|block| &block.source)
            .filter(|existing| existing.overlaps_with(source))
    }

    fn target_overlap(&self, target: &LocusRange) -> Option<&LocusRange> {
        first_candidate(&self.targets, target)
            .and_then(|source_key| self.blocks.get(source_key))
            .map(|block| &block.target)
            .filter(|existing| existing.overlaps_with(target))
    }

    fn insert(&mut self, block: Block) {
        let source_key = RangeKey::of(&block.source);
        self.targets.insert(RangeKey::of(&block.target), source_key.clone());
        self.blocks.insert(source_key, block);
    }
}

/// The only stored entry `range` could overlap
///
/// In a group of non-overlapping ranges ordered by end, that is the first
/// one ending after `range.start()`.
fn first_candidate<'a, V>(map: &'a BTreeMap<RangeKey, V>, range: &LocusRange) -> Option<&'a V> {
    let lower = RangeKey::lower_bound(range);
    map.range((Excluded(&lower), Unbounded))
        .next()
        .filter(|(key, _)| key.same_group(&lower))
        .map(|(_, value)| value)
}

/// Frozen blocks of one source chromosome, one sorted slice per strand
#[derive(Debug, Clone)]
struct FrozenBucket {
    forward: Box<[Block]>,
    reverse: Box<[Block]>,
}

impl FrozenBucket {
    fn groups(&self) -> [&[Block]; 2] {
        [&self.forward, &self.reverse]
    }

    fn len(&self) -> usize {
        self.forward.len() + self.reverse.len()
    }
}

impl From<&WorkingBucket> for FrozenBucket {
    fn from(bucket: &WorkingBucket) -> Self {
        let (forward, reverse): (Vec<Block>, Vec<Block>) = bucket
            .blocks
            .values()
            .cloned()
            .partition(|block| block.source.strand() == Strand::Forward);
        Self {
            forward: forward.into_boxed_slice(),
            reverse: reverse.into_boxed_slice(),
        }
    }
}

/// Find the block containing `locus` in one strand group
///
/// Blocks are sorted by end. The scan stops at the first block ending after
/// the position: either it contains the position or nothing later can.
fn scan_group<'a>(blocks: &'a [Block], locus: &Locus) -> Option<&'a Block> {
    let position = locus.position();
    let idx = blocks.partition_point(|block| block.source.end() <= position);
    blocks.get(idx).filter(|block| block.source.contains(locus))
}

/// An immutable mapping from source to target assembly coordinates
///
/// Built once by [`Builder::build`]; safe to share between threads and
/// query concurrently without locking.
///
/// # Example
/// ```
/// use genome_chain::core::{Builder, Locus, LocusRange, Strand};
///
/// let mut builder = Builder::new();
/// builder.add(
///     LocusRange::new("chr1", 100, 200, Strand::Forward).unwrap(),
///     LocusRange::new("chr5", 1000, 1100, Strand::Forward).unwrap(),
/// ).unwrap();
/// let chain = builder.build();
///
/// let lifted = chain.apply(&Locus::new("chr1", 150, Strand::Forward).unwrap());
/// assert_eq!(lifted, Some(Locus::new("chr5", 1050, Strand::Forward).unwrap()));
/// assert_eq!(chain.apply(&Locus::new("chr1", 250, Strand::Forward).unwrap()), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GenomeChain {
    map: HashMap<ChromosomeName, FrozenBucket>,
}

impl GenomeChain {
    /// Translate a source locus into target coordinates
    ///
    /// The query strand is not matched against the blocks; the result takes
    /// the strand of the target range. Opposite-strand source ranges may
    /// both contain the position, in which case the one with the smaller end
    /// wins. Returns `None` when the chromosome is unknown or the position
    /// falls in a gap.
    pub fn apply(&self, locus: &Locus) -> Option<Locus> {
        let bucket = self.map.get(locus.chromosome())?;
        let block = bucket
            .groups()
            .into_iter()
            .filter_map(|blocks| scan_group(blocks, locus))
            .min_by_key(|block| block.source.end())?;
        Some(block.target.locus_at(locus.position() - block.source.start()))
    }

    /// A new chain with source and target assemblies swapped
    ///
    /// Blocks are re-bucketed under their former target chromosome. The
    /// builder only checks target overlaps within one source chromosome, so
    /// two blocks from different source chromosomes may claim the same target
    /// range; the later one (in chromosome order) is dropped with a warning.
    pub fn invert(&self) -> GenomeChain {
        let mut chromosomes: Vec<&ChromosomeName> = self.map.keys().collect();
        chromosomes.sort_by(|a, b| a.key().cmp(b.key()));

        let mut builder = Builder::new();
        let mut dropped = 0usize;
        for chrom in chromosomes {
            for (source, target) in self.blocks(chrom) {
                if let Err(e) = builder.add(target.clone(), source.clone()) {
                    log::warn!("Dropping block while inverting chain: {}", e);
                    dropped += 1;
                }
            }
        }

        log::debug!(
            "Inverted chain: {} blocks kept, {} dropped",
            builder.len(),
            dropped
        );
        builder.build()
    }

    /// Total number of blocks across all chromosomes
    pub fn len(&self) -> usize {
        self.map.values().map(FrozenBucket::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Source chromosomes with at least one block
    pub fn chromosomes(&self) -> impl Iterator<Item = &ChromosomeName> {
        self.map.keys()
    }

    pub fn contains_chromosome(&self, chromosome: &ChromosomeName) -> bool {
        self.map.contains_key(chromosome)
    }

    /// Blocks of one source chromosome as `(source, target)` pairs
    ///
    /// Forward-strand blocks come first, each strand in ascending end order.
    pub fn blocks<'a>(
        &'a self,
        chromosome: &ChromosomeName,
    ) -> impl Iterator<Item = (&'a LocusRange, &'a LocusRange)> + 'a {
        self.map
            .get(chromosome)
            .into_iter()
            .flat_map(|bucket| bucket.forward.iter().chain(bucket.reverse.iter()))
            .map(|block| (&block.source, &block.target))
    }
}

/// Single-writer accumulator of source→target correspondences
///
/// Not meant for concurrent mutation: every mutating method takes `&mut self`.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    map: HashMap<ChromosomeName, WorkingBucket>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a correspondence between equal-length ranges
    ///
    /// Fails without touching the builder when the lengths differ, when
    /// `source` overlaps a same-strand source range of its chromosome, or
    /// when `target` overlaps a same-strand target range stored under
    /// `source`'s chromosome. Target ranges stored under other source
    /// chromosomes are not checked.
    pub fn add(&mut self, source: LocusRange, target: LocusRange) -> BuildResult<&mut Self> {
        if source.len() != target.len() {
            return Err(ChainBuildError::LengthMismatch {
                source_range: source,
                target_range: target,
            });
        }

        if let Some(bucket) = self.map.get(source.chromosome()) {
            if let Some(existing) = bucket.source_overlap(&source) {
                return Err(ChainBuildError::Overlap {
                    side: OverlapSide::Source,
                    existing: existing.clone(),
                    range: source,
                });
            }
            if let Some(existing) = bucket.target_overlap(&target) {
                return Err(ChainBuildError::Overlap {
                    side: OverlapSide::Target,
                    existing: existing.clone(),
                    range: target,
                });
            }
        }

        self.map
            .entry(source.chromosome().clone())
            .or_default()
            .insert(Block { source, target });
        Ok(self)
    }

    /// Remove the entry whose source range is exactly `source`
    ///
    /// Does nothing if no such entry exists.
    pub fn remove(&mut self, source: &LocusRange) -> &mut Self {
        let chrom = source.chromosome();
        if let Some(bucket) = self.map.get_mut(chrom) {
            let key = RangeKey::of(source);
            if bucket.blocks.get(&key).is_some_and(|block| block.source == *source) {
                if let Some(block) = bucket.blocks.remove(&key) {
                    bucket.targets.remove(&RangeKey::of(&block.target));
                }
            }
            if bucket.blocks.is_empty() {
                self.map.remove(chrom);
            }
        }
        self
    }

    /// Whether an entry with exactly this source range is stored
    pub fn contains(&self, source: &LocusRange) -> bool {
        self.map
            .get(source.chromosome())
            .and_then(|bucket| bucket.blocks.get(&RangeKey::of(source)))
            .is_some_and(|block| block.source == *source)
    }

    /// Total number of stored correspondences
    pub fn len(&self) -> usize {
        self.map.values().map(|bucket| bucket.blocks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Freeze the current contents into a new chain
    ///
    /// The chain owns a deep copy; the builder stays usable and later
    /// changes to it are not visible through the returned chain.
    pub fn build(&self) -> GenomeChain {
        let map: HashMap<ChromosomeName, FrozenBucket> = self
            .map
            .iter()
            .map(|(chrom, bucket)| (chrom.clone(), FrozenBucket::from(bucket)))
            .collect();
        let chain = GenomeChain { map };
        log::debug!(
            "Built chain with {} blocks on {} chromosomes",
            chain.len(),
            chain.map.len()
        );
        chain
    }
}

impl From<&GenomeChain> for Builder {
    fn from(chain: &GenomeChain) -> Self {
        let map = chain
            .map
            .iter()
            .map(|(chrom, frozen)| {
                let mut bucket = WorkingBucket::default();
                for blocks in frozen.groups() {
                    for block in blocks {
                        bucket.insert(block.clone());
                    }
                }
                (chrom.clone(), bucket)
            })
            .collect();
        Self { map }
    }
}
