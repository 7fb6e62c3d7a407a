use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use goertzel_tone::{EstimatorConfig, ToneEstimator, DEFAULT_HISTORY_CAPACITY};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blocks::SampleBlocksExt;

mod adc;
mod audio;
mod blocks;

/// Classic DTMF block length at 8 kHz
const DEFAULT_BLOCK_SIZE: usize = 205;

const USAGE: &str = "Usage: tone-probe <path|-> <coeff> [block_size] [overlap] [history]";

#[derive(Debug, PartialEq)]
enum Source {
    /// ADC readings, one per line on stdin
    Stdin,
    /// Audio file decoded and downmixed to mono
    File(PathBuf),
}

#[derive(Debug, PartialEq)]
struct Args {
    source: Source,
    coeff: f32,
    block_size: usize,
    overlap: usize,
    config: EstimatorConfig,
}

impl Args {
    fn parse(args: &[String]) -> Result<Self> {
        let (source, coeff) = match args {
            [source, coeff, ..] => (source, coeff),
            _ => bail!("{USAGE}"),
        };
        if args.len() > 5 {
            bail!("{USAGE}");
        }

        let source = if source == "-" {
            Source::Stdin
        } else {
            Source::File(PathBuf::from(source))
        };
        let coeff = coeff
            .parse::<f32>()
            .with_context(|| format!("invalid coefficient {coeff:?}"))?;
        let block_size = optional_arg(args.get(2), "block size", DEFAULT_BLOCK_SIZE)?;
        let overlap = optional_arg(args.get(3), "overlap", 0)?;
        let history_capacity = optional_arg(args.get(4), "history", DEFAULT_HISTORY_CAPACITY)?;

        if block_size == 0 {
            bail!("block size must be greater than 0");
        }
        if overlap >= block_size {
            bail!("overlap {overlap} must be less than block size {block_size}");
        }
        let config = EstimatorConfig { history_capacity };
        config.validate()?;

        Ok(Self {
            source,
            coeff,
            block_size,
            overlap,
            config,
        })
    }
}

fn optional_arg(arg: Option<&String>, name: &str, default: usize) -> Result<usize> {
    arg.map_or(Ok(default), |value| {
        value
            .parse::<usize>()
            .with_context(|| format!("invalid {name} {value:?}"))
    })
}

fn read_samples(source: &Source) -> Result<Vec<f32>> {
    match source {
        Source::Stdin => adc::read_readings(io::stdin().lock()),
        Source::File(path) => audio::Decoder::new(path)
            .and_then(audio::Decoder::read_mono)
            .with_context(|| format!("failed to decode {path:?}")),
    }
}

/// Score every block and write `index, power, score` rows
fn run<W: Write>(args: &Args, samples: &[f32], out: &mut W) -> Result<usize> {
    let mut estimator = ToneEstimator::with_config(args.config)?;
    let mut count = 0;

    writeln!(out, "block\tpower\tscore")?;
    for (index, block) in samples.blocks(args.block_size, args.overlap).enumerate() {
        let estimate = estimator.estimate_detailed(&block, args.coeff);
        writeln!(out, "{index}\t{}\t{}", estimate.power, estimate.score)?;
        count += 1;
    }
    out.flush()?;

    Ok(count)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = Args::parse(&args)?;

    let samples = read_samples(&args.source)?;
    info!("Read {} samples from {:?}", samples.len(), args.source);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let blocks = run(&args, &samples, &mut out)?;
    info!("Scored {blocks} blocks of {} samples", args.block_size);

    Ok(())
}
