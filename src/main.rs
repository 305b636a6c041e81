//! GenomeChain CLI entry point
//!
//! Lifts locus records between assemblies with a UCSC chain file.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use genome_chain::core::{ChainReader, ChromStyle, GenomeChain, OverlapPolicy};
use genome_chain::formats;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Handling of blocks that violate the chain invariants (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OverlapPolicyArg {
    /// Abort on the first rejected block
    #[default]
    #[value(name = "reject")]
    Reject,
    /// Warn and skip rejected blocks
    #[value(name = "skip")]
    Skip,
}

impl From<OverlapPolicyArg> for OverlapPolicy {
    fn from(arg: OverlapPolicyArg) -> Self {
        match arg {
            OverlapPolicyArg::Reject => OverlapPolicy::Reject,
            OverlapPolicyArg::Skip => OverlapPolicy::Skip,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ChromStyleArg {
    /// Keep chromosome names as-is
    #[value(name = "a")]
    AsIs,
    /// Use short names (1, 2, X)
    #[value(name = "s")]
    Short,
    /// Use long names (chr1, chr2, chrX)
    #[value(name = "l")]
    Long,
}

impl From<ChromStyleArg> for ChromStyle {
    fn from(arg: ChromStyleArg) -> Self {
        match arg {
            ChromStyleArg::AsIs => ChromStyle::AsIs,
            ChromStyleArg::Short => ChromStyle::Short,
            ChromStyleArg::Long => ChromStyle::Long,
        }
    }
}

#[derive(Parser)]
#[command(name = "genome-chain")]
#[command(about = "Chain-based genome coordinate translation")]
#[command(version)]
struct Cli {
    /// What to do with overlapping or malformed blocks in the chain file
    #[arg(long = "overlap", global = true, default_value = "reject")]
    overlap: OverlapPolicyArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lift locus records (chrom, 0-based pos, optional strand)
    Lift {
        /// Chain file for coordinate conversion
        chain: PathBuf,
        /// Input locus file
        input: PathBuf,
        /// Output file (optional, output.tsv if not specified)
        output: Option<PathBuf>,
        /// Lift from the chain's target assembly back to its source
        #[arg(long)]
        invert: bool,
        /// Number of threads
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
        /// Chromosome ID style: a(as-is), s(short), l(long)
        #[arg(long = "chromid", default_value = "a")]
        chrom_style: ChromStyleArg,
    },
    /// Print a summary of a chain file
    Stats {
        /// Chain file to summarize
        chain: PathBuf,
    },
}

fn load_chain(chain_path: &Path, policy: OverlapPolicyArg) -> anyhow::Result<GenomeChain> {
    let start = Instant::now();
    log::info!("Loading chain file: {:?}", chain_path);

    let load = ChainReader::with_policy(policy.into())
        .read_file(chain_path)
        .with_context(|| format!("Failed to load chain file {:?}", chain_path))?;
    if load.stats.skipped > 0 {
        log::warn!("Skipped {} rejected blocks", load.stats.skipped);
    }

    let chain = load.builder.build();
    log::info!(
        "Chain file loaded in {:.2}s: {} chains, {} blocks",
        start.elapsed().as_secs_f64(),
        load.stats.chains,
        chain.len()
    );
    Ok(chain)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Lift { chain, input, output, invert, threads, chrom_style } => {
            let mut mapping = load_chain(&chain, cli.overlap)?;
            if invert {
                mapping = mapping.invert();
                log::info!("Inverted chain: {} blocks", mapping.len());
            }

            let output_path = output.unwrap_or_else(|| PathBuf::from("output.tsv"));
            let mut unmap_name = output_path.as_os_str().to_owned();
            unmap_name.push(".unmap");
            let unmap_path = PathBuf::from(unmap_name);

            log::info!("Lifting loci: {:?} -> {:?}", input, output_path);
            let stats = formats::convert_loci(
                &input,
                &output_path,
                &unmap_path,
                &mapping,
                chrom_style.into(),
                threads,
            )
            .with_context(|| format!("Failed to lift {:?}", input))?;

            eprintln!("\n=== Conversion Statistics ===");
            eprintln!("Total records:   {}", stats.total);
            eprintln!("Successful:      {}", stats.success);
            eprintln!("Failed:          {}", stats.failed);
            eprintln!("  - Invalid:     {}", stats.invalid);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Stats { chain } => {
            let mapping = load_chain(&chain, cli.overlap)?;

            let mut chroms: Vec<_> = mapping.chromosomes().collect();
            chroms.sort_by(|a, b| a.as_str().cmp(b.as_str()));

            println!("chrom\tblocks\taligned_bases");
            for chrom in chroms {
                let (blocks, bases) = mapping
                    .blocks(chrom)
                    .fold((0usize, 0i64), |(n, total), (source, _)| (n + 1, total + source.len()));
                println!("{}\t{}\t{}", chrom, blocks, bases);
            }
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
