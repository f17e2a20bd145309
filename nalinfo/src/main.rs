use anyhow::{Context, Result};
use clap::Parser;
use decode::{H264Reader, NalUnit, ReaderConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Lists the NAL units of a raw Annex-B `.h264` file.
#[derive(Parser, Debug)]
struct Args {
    #[arg(short, long)]
    file_path: String,

    /// Bytes read from the file per scan step.
    #[arg(long, default_value_t = ReaderConfig::DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Give up when this many bytes pass without a start code.
    #[arg(long, default_value_t = ReaderConfig::DEFAULT_MAX_BUFFER_LEN)]
    max_buffer_len: usize,

    /// Also emit the last unit of the file, which no start code closes.
    #[arg(long)]
    flush_trailing_unit: bool,
}

fn describe(index: usize, nal_unit: &NalUnit) -> String {
    format!(
        "{index:>5} {:<12} ref_idc={} len={}",
        nal_unit.nal_unit_type().to_string(),
        nal_unit.nal_ref_idc(),
        nal_unit.data().len()
    )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Args {
        file_path,
        chunk_size,
        max_buffer_len,
        flush_trailing_unit,
    } = Args::parse();

    let config = ReaderConfig::default()
        .with_chunk_size(chunk_size)
        .with_max_buffer_len(max_buffer_len)
        .with_flush_trailing_unit(flush_trailing_unit);

    let file = std::fs::File::open(&file_path).with_context(|| format!("opening {file_path}"))?;
    let mut reader = H264Reader::builder()
        .source(file)
        .config(config)
        .build()?;
    let nal_units = reader
        .read_all()
        .with_context(|| format!("reading {file_path}"))?;

    for (index, nal_unit) in nal_units.iter().enumerate() {
        println!("{}", describe(index, nal_unit));
    }
    info!(count = nal_units.len(), "done");

    Ok(())
}
