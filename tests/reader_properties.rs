//! Property-based tests for chain file reading
//!
//! Generated chain text must produce a chain whose queries agree with the
//! block layout the text describes.

use genome_chain::core::{ChainReader, Locus, Strand};
use proptest::prelude::*;

/// Data lines for one chain: (size, dt, dq), last line has no gaps
fn arb_data_lines() -> impl Strategy<Value = Vec<(i64, i64, i64)>> {
    prop::collection::vec((1i64..500, 0i64..300, 0i64..300), 1..15)
}

/// Chain text plus the expected (source_start, target_start, size) blocks
fn render_chain(
    source_start: i64,
    target_start: i64,
    target_strand: Strand,
    lines: &[(i64, i64, i64)],
) -> (String, Vec<(i64, i64, i64)>) {
    let mut blocks = Vec::new();
    let mut s = source_start;
    let mut t = target_start;
    for (i, &(size, dt, dq)) in lines.iter().enumerate() {
        blocks.push((s, t, size));
        s += size;
        t += size;
        if i + 1 < lines.len() {
            s += dt;
            t += dq;
        }
    }

    let chrom_size = 10_000_000i64;
    let mut text = format!(
        "chain 1000 chr1 {} + {} {} chr2 {} {} {} {} 1\n",
        chrom_size,
        source_start,
        s,
        chrom_size,
        target_strand,
        target_start,
        t
    );
    for (i, &(size, dt, dq)) in lines.iter().enumerate() {
        if i + 1 < lines.len() {
            text.push_str(&format!("{} {} {}\n", size, dt, dq));
        } else {
            text.push_str(&format!("{}\n", size));
        }
    }
    (text, blocks)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every parsed block maps its first and last position to the matching
    /// target offsets.
    #[test]
    fn prop_blocks_round_trip_through_text(
        lines in arb_data_lines(),
        source_start in 0i64..100_000,
        target_start in 0i64..100_000,
        reverse in any::<bool>(),
    ) {
        let target_strand = if reverse { Strand::Reverse } else { Strand::Forward };
        let (text, blocks) = render_chain(source_start, target_start, target_strand, &lines);

        let load = ChainReader::new().read_bytes(text.as_bytes()).unwrap();
        prop_assert_eq!(load.stats.blocks, blocks.len());
        prop_assert_eq!(load.stats.chains, 1);

        let chain = load.builder.build();
        for &(s, t, size) in &blocks {
            for offset in [0, size - 1] {
                let query = Locus::new("chr1", s + offset, Strand::Forward).unwrap();
                let expected = Locus::new("chr2", t + offset, target_strand).unwrap();
                prop_assert_eq!(chain.apply(&query), Some(expected));
            }
        }
    }

    /// Positions inside source gaps are unmapped.
    #[test]
    fn prop_source_gaps_unmapped(
        lines in arb_data_lines(),
        source_start in 0i64..100_000,
    ) {
        let (text, blocks) = render_chain(source_start, 0, Strand::Forward, &lines);
        let chain = ChainReader::new().read_bytes(text.as_bytes()).unwrap().builder.build();

        for pair in blocks.windows(2) {
            let gap_start = pair[0].0 + pair[0].2;
            let gap_end = pair[1].0;
            if gap_start < gap_end {
                let query = Locus::new("chr1", gap_start, Strand::Forward).unwrap();
                prop_assert_eq!(chain.apply(&query), None);
                let query = Locus::new("chr1", gap_end - 1, Strand::Forward).unwrap();
                prop_assert_eq!(chain.apply(&query), None);
            }
        }
    }
}
