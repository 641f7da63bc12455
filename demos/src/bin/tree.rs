// SPDX-License-Identifier: Apache-2.0

//! Displays statistics and the hierarchy of a JSON document.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as _;
use demos::stats::Stats;
use demos::tree::{self, TreeOptions};
use demos::{summary, Status};
use flatjson::Parser;

/// Display information about a JSON file.
///
/// The hierarchy is shown if any of -a, -d, -i, -o or -t is given.
#[derive(clap::Parser)]
#[command(name = "flatjson-tree", version, about)]
struct Args {
    /// Maximum number of array entries to display [default: 20]
    #[arg(short = 'a', value_name = "COUNT")]
    array_children: Option<u32>,
    /// Maximum depth to display [default: 100]
    #[arg(short = 'd', value_name = "DEPTH")]
    max_depth: Option<usize>,
    /// Threshold at which to annotate with index values [default: 20]
    #[arg(short = 'i', value_name = "COUNT")]
    annotate_size: Option<u32>,
    /// Maximum number of object children to display [default: 100]
    #[arg(short = 'o', value_name = "COUNT")]
    object_children: Option<u32>,
    /// Display statistics for each JSON value type
    #[arg(short = 's')]
    stats: bool,
    /// Display JSON hierarchy
    #[arg(short = 't')]
    tree: bool,
    /// JSON file to read; standard input if omitted
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
}

impl Args {
    fn tree_options(&self) -> Option<TreeOptions> {
        let requested = self.tree
            || self.array_children.is_some()
            || self.max_depth.is_some()
            || self.annotate_size.is_some()
            || self.object_children.is_some();
        if !requested {
            return None;
        }
        let defaults = TreeOptions::default();
        Some(TreeOptions {
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            array_children: self.array_children.unwrap_or(defaults.array_children),
            object_children: self.object_children.unwrap_or(defaults.object_children),
            annotate_size: self.annotate_size.unwrap_or(defaults.annotate_size),
        })
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut data = Vec::new();
            io::stdin()
                .read_to_end(&mut data)
                .context("Failed to read standard input")?;
            Ok(data)
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();
    let json = read_input(args.input.as_ref())?;
    log::debug!("Read {} bytes", json.len());

    let mut parser = Parser::new();
    let status = Status::of(&parser.try_parse(&json));
    println!("{}", summary(parser.parsed_len(), json.len(), status));

    if args.stats {
        let mut out = String::new();
        Stats::collect(parser.iter().map(|(_, token)| token)).render(&mut out)?;
        println!("\n{out}");
    }

    if let Some(options) = args.tree_options() {
        let mut out = String::new();
        tree::render(&parser, &options, &mut out)?;
        println!("\n{out}");
    }

    Ok(if status == Status::Valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
