//! wordchipper-cli
//!
//! A thin training entry point over [`wordchipper::train`]: parses
//! arguments, runs training, and writes the resulting artifacts to disk.
//! Argument parsing and artifact I/O only — no interactive input.

use clap::Parser;
use wordchipper::{Tokenizer, TrainerOptions};

/// Train a byte-pair-encoding tokenizer from a text corpus.
#[derive(clap::Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the UTF-8 text corpus to train on.
    #[arg(long)]
    input_path: String,

    /// Target vocabulary size, including the 256 byte entries and any
    /// special tokens.
    #[arg(long)]
    vocab_size: usize,

    /// Special tokens to reserve, in the order they should be assigned
    /// ids. May be repeated.
    #[arg(long = "special-token")]
    special_tokens: Vec<String>,

    /// Directory to write `vocab.json`, `merges.txt`, and
    /// `special_tokens.txt` into. Created if it does not exist.
    #[arg(long)]
    save_dir: String,

    /// Hint for how many parallel pre-tokenization chunks to attempt.
    /// Defaults to the number of available CPUs.
    #[arg(long)]
    desired_num_chunks: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let mut options = TrainerOptions::new(args.vocab_size, args.special_tokens);
    if let Some(desired_num_chunks) = args.desired_num_chunks {
        options = options.with_desired_num_chunks(desired_num_chunks);
    }

    log::info!("training on {}", args.input_path);
    let tokenizer = Tokenizer::train(&args.input_path, &options)?;

    log::info!("writing artifacts to {}", args.save_dir);
    tokenizer.save(&args.save_dir)?;

    log::info!(
        "done: vocab size {}, {} merges",
        tokenizer.vocab().len(),
        tokenizer.merges().len()
    );

    Ok(())
}
