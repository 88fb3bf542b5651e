use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use png_steg::{cli, ChunkType, Config, Steg};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "png-steg")]
#[command(about = "Hide and recover payloads in PNG chunks")]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the chunks of a PNG file up to IEND
    Inspect {
        /// Path to input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Leave chunk data out of the listing
        #[arg(long)]
        suppress: bool,
    },

    /// XOR a payload with a key and insert it as a new chunk
    Encode {
        #[command(flatten)]
        target: InsertArgs,

        /// Key for the XOR transform
        #[arg(long)]
        key: String,
    },

    /// Insert a payload unmodified as a new chunk
    Inject {
        #[command(flatten)]
        target: InsertArgs,
    },

    /// Recover the payload of the chunk at an offset
    Decode {
        /// Path to input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Write a copy with the chunk replaced by its decoded form
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Offset of the chunk, decimal or 0x-prefixed hex
        #[arg(long)]
        offset: String,

        /// Key for the XOR transform
        #[arg(long)]
        key: String,
    },
}

#[derive(Args)]
struct InsertArgs {
    /// Path to input PNG file
    #[arg(short, long)]
    input: PathBuf,

    /// Path for the output PNG file
    #[arg(short, long)]
    output: PathBuf,

    /// Where to insert the chunk, decimal or 0x-prefixed hex
    #[arg(long)]
    offset: String,

    /// Payload to hide
    #[arg(short, long)]
    payload: String,

    /// Type tag of the new chunk
    #[arg(long = "type", default_value = "tEXt")]
    chunk_type: ChunkType,
}

impl InsertArgs {
    fn into_config(self) -> Config {
        Config::new(self.input)
            .with_output(self.output)
            .with_offset(self.offset)
            .with_payload(self.payload)
            .with_chunk_type(self.chunk_type)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(config: &Config) -> Result<Steg> {
    Steg::open(&config.input).with_context(|| format!("Failed to load {}", config.input.display()))
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Inspect { input, suppress } => {
            let config = Config::new(input).with_suppress(suppress);
            let mut steg = load(&config)?;

            let chunks = steg.chunks().context("Failed to read chunks")?;
            for (index, chunk) in chunks.iter().enumerate() {
                println!("{}", cli::render_chunk(index + 1, chunk, config.suppress));
            }
        }

        Commands::Encode { target, key } => {
            let config = target.into_config().with_key(key);
            let mut steg = load(&config)?;

            let report = steg.encode(&config).context("Encoding failed")?;
            println!("{}", cli::render_payload("Payload Original", &config.payload));
            println!("{}", cli::render_payload("Payload Encode", report.chunk.data()));
            println!("Success: {} created", report.output.display());
        }

        Commands::Inject { target } => {
            let config = target.into_config();
            let mut steg = load(&config)?;

            let report = steg.inject(&config).context("Injection failed")?;
            println!("{}", cli::render_payload("Payload", report.chunk.data()));
            println!("Success: {} created", report.output.display());
        }

        Commands::Decode {
            input,
            output,
            offset,
            key,
        } => {
            let mut config = Config::new(input).with_offset(offset).with_key(key);
            config.output = output;
            let mut steg = load(&config)?;

            let report = steg.decode(&config).context("Decoding failed")?;
            println!("{}", cli::render_payload("Payload Original", report.original.data()));
            println!("{}", cli::render_payload("Payload Decode", report.plaintext()));
            println!("Decoded payload: {}", String::from_utf8_lossy(report.plaintext()));
            if let Some(output) = &report.output {
                println!("Success: {} created", output.display());
            }
        }
    }

    Ok(())
}
