// SPDX-License-Identifier: Apache-2.0

//! Validates a JSON file. Exits with status 0 only if it is valid.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as _;
use flatjson::{Parser, TokenIndex};
use memmap2::Mmap;

/// Check whether a file holds valid JSON.
#[derive(clap::Parser)]
#[command(name = "flatjson-check", version, about, long_about = None)]
struct Args {
    /// JSON file to validate
    #[arg(value_name = "FILE")]
    input: PathBuf,
    /// Initial token capacity; the array grows as needed
    #[arg(long, value_name = "N", default_value_t = flatjson::DEFAULT_CAPACITY)]
    tokens: TokenIndex,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    // SAFETY: read-only mapping, dropped before returning. The file must not
    // be truncated meanwhile.
    let map = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map {}", args.input.display()))?;
    log::debug!("Mapped {} bytes from {}", map.len(), args.input.display());

    let mut parser = Parser::with_capacity(args.tokens);
    match parser.try_parse(&map[..]) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{}: {e}", args.input.display());
            Ok(ExitCode::FAILURE)
        }
    }
}
