//! End-to-end lifting of locus files through chain files on disk

use flate2::write::GzEncoder;
use flate2::Compression;
use genome_chain::core::{ChainReader, ChromStyle, OverlapPolicy};
use genome_chain::formats::convert_loci;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

const CHAIN: &str = "\
chain 1000 chr1 10000 + 100 500 chr5 20000 + 1000 1400 1
100 50 50
100 50 50
100

chain 500 chr2 5000 + 0 200 chr6 5000 - 300 500 2
100 50 50
50
";

const LOCI: &str = "\
# lifted by test
chr1\t150\t+\tsnp1
chr1\t225\t+\tgap
chr1\t260
chr2\t10\t-\tminus
chr3\t10\t+\tunknown
chr1\tbad
";

fn write_file(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_lift_plain_files() {
    let dir = TempDir::new().unwrap();
    let chain_path = dir.path().join("test.chain");
    let input = dir.path().join("loci.tsv");
    let output = dir.path().join("out.tsv");
    let unmap = dir.path().join("out.tsv.unmap");
    write_file(&chain_path, CHAIN);
    write_file(&input, LOCI);

    let chain = ChainReader::new().read_file(&chain_path).unwrap().builder.build();
    let stats = convert_loci(&input, &output, &unmap, &chain, ChromStyle::AsIs, 1).unwrap();

    assert_eq!(stats.total, 6);
    assert_eq!(stats.success, 3);
    assert_eq!(stats.failed, 3);
    assert_eq!(stats.invalid, 1);

    assert_eq!(
        read_lines(&output),
        vec![
            "# lifted by test",
            "chr5\t1050\t+\tsnp1",
            "chr5\t1160\t+",
            "chr6\t310\t-\tminus",
        ]
    );
    assert_eq!(
        read_lines(&unmap),
        vec!["chr1\t225\t+\tgap", "chr3\t10\t+\tunknown", "chr1\tbad"]
    );
}

#[test]
fn test_lift_parallel_matches_sequential() {
    let dir = TempDir::new().unwrap();
    let chain_path = dir.path().join("test.chain");
    let input = dir.path().join("loci.tsv");
    write_file(&chain_path, CHAIN);

    let mut loci = String::new();
    for pos in 0..25_000 {
        loci.push_str(&format!("chr1\t{}\n", pos % 600));
    }
    write_file(&input, &loci);

    let chain = ChainReader::new().read_file(&chain_path).unwrap().builder.build();

    let seq_out = dir.path().join("seq.tsv");
    let seq_unmap = dir.path().join("seq.unmap");
    let par_out = dir.path().join("par.tsv");
    let par_unmap = dir.path().join("par.unmap");
    let seq = convert_loci(&input, &seq_out, &seq_unmap, &chain, ChromStyle::AsIs, 1).unwrap();
    let par = convert_loci(&input, &par_out, &par_unmap, &chain, ChromStyle::AsIs, 4).unwrap();

    assert_eq!(seq, par);
    assert_eq!(read_lines(&seq_out), read_lines(&par_out));
    assert_eq!(read_lines(&seq_unmap), read_lines(&par_unmap));
}

#[test]
fn test_lift_gzip_chain_and_invert() {
    let dir = TempDir::new().unwrap();
    let chain_path = dir.path().join("test.chain.gz");
    {
        let file = std::fs::File::create(&chain_path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(CHAIN.as_bytes()).unwrap();
        encoder.finish().unwrap();
    }

    let input = dir.path().join("loci.tsv");
    let output = dir.path().join("out.tsv");
    let unmap = dir.path().join("out.unmap");
    write_file(&input, "chr5\t1050\t+\n6\t310\t-\n");

    let inverted = ChainReader::new()
        .read_file(&chain_path)
        .unwrap()
        .builder
        .build()
        .invert();
    let stats = convert_loci(&input, &output, &unmap, &inverted, ChromStyle::Short, 1).unwrap();

    assert_eq!(stats.success, 2);
    assert_eq!(read_lines(&output), vec!["1\t150\t+", "2\t10\t+"]);
}

#[test]
fn test_skip_policy_loads_partial_chain() {
    let dir = TempDir::new().unwrap();
    let chain_path = dir.path().join("overlap.chain");
    write_file(
        &chain_path,
        "chain 1 chr1 1000 + 0 100 chr1 1000 + 0 100 1\n100\n\n\
         chain 1 chr1 1000 + 50 60 chr1 1000 + 900 910 2\n10\n",
    );

    assert!(ChainReader::new().read_file(&chain_path).is_err());

    let load = ChainReader::with_policy(OverlapPolicy::Skip)
        .read_file(&chain_path)
        .unwrap();
    assert_eq!(load.stats.skipped, 1);
    assert_eq!(load.builder.len(), 1);
}
