use crate::config::{GridConfig, load_config};
use crate::layout::Pagination;
use crate::layout_dump::{GridDump, render_text, write_dump, write_layout_dump};
use crate::layout_git_log;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "cgrid", version, about = "Lay out a git commit graph as a column grid")]
pub struct Args {
    /// Log file or '-' for stdin (see `LOG_FORMAT` for the expected records)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Reserve row 0 for the uncommitted-changes pseudo-commit
    #[arg(long = "show-index")]
    pub show_index: bool,

    /// The log is one server page; edges leaving it become virtual columns
    #[arg(long = "server-paginated")]
    pub server_paginated: bool,

    /// First visible row
    #[arg(long = "page-start")]
    pub page_start: Option<usize>,

    /// Number of visible rows
    #[arg(long = "page-size")]
    pub page_size: Option<usize>,

    /// Head commit hash (defaults to the first log record)
    #[arg(long = "head")]
    pub head: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    apply_args(&mut config.grid, &args);

    let log = read_input(args.input.as_deref())?;
    let result = layout_git_log(&log, &config.grid)?;
    if !result.failures.is_empty() {
        tracing::warn!(
            skipped = result.failures.len(),
            "some log lines were not valid records"
        );
    }

    match args.format {
        OutputFormat::Json => {
            let dump = GridDump::from_layout(&result.layout, &result.input, &result.failures);
            match args.output.as_deref() {
                Some(path) => write_layout_dump(path, &dump, config.dump.pretty)?,
                None => {
                    let mut stdout = io::stdout().lock();
                    write_dump(&mut stdout, &dump, config.dump.pretty)?;
                    writeln!(stdout)?;
                }
            }
        }
        OutputFormat::Text => {
            let text = render_text(&result.layout, &result.input);
            match args.output.as_deref() {
                Some(path) => std::fs::write(path, text)?,
                None => io::stdout().write_all(text.as_bytes())?,
            }
        }
    }

    Ok(())
}

/// Command-line flags win over the config file.
fn apply_args(grid: &mut GridConfig, args: &Args) {
    if args.show_index {
        grid.show_index = true;
    }
    if args.server_paginated {
        grid.pagination = Pagination::Server;
    }
    if let Some(start) = args.page_start {
        grid.page_start = start;
    }
    if let Some(size) = args.page_size {
        grid.page_size = Some(size);
    }
    if let Some(head) = &args.head {
        grid.head_commit = Some(head.clone());
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
