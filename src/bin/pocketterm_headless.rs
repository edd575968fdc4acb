//! PocketTerm Headless Runner
//!
//! Feeds recorded terminal output through the emulator without a display
//! and prints the resulting snapshot. Useful for testing and for
//! inspecting what a program draws.
//!
//! ```bash
//! printf 'Hello\x1b[31mRed\x1b[0m' | pocketterm-headless --cols 40 --rows 10
//! pocketterm-headless --input session.bin --json --scrollback-snapshot
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use pocketterm_core::{Terminal, TerminalConfig, TerminalEvent};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments
struct Args {
    /// Input file (stdin if not specified)
    input: Option<PathBuf>,
    /// JSON config file; explicit size flags override it
    config: Option<PathBuf>,
    cols: Option<usize>,
    rows: Option<usize>,
    scrollback: Option<usize>,
    /// Output as JSON instead of text
    json: bool,
    /// Include scrollback in the snapshot
    include_scrollback: bool,
    help: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        input: None,
        config: None,
        cols: None,
        rows: None,
        scrollback: None,
        json: false,
        include_scrollback: false,
        help: false,
    };
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-i" | "--input" => {
                i += 1;
                args.input = argv.get(i).map(PathBuf::from);
            }
            "--config" => {
                i += 1;
                args.config = argv.get(i).map(PathBuf::from);
            }
            "-c" | "--cols" => {
                i += 1;
                args.cols = argv.get(i).and_then(|v| v.parse().ok());
            }
            "-r" | "--rows" => {
                i += 1;
                args.rows = argv.get(i).and_then(|v| v.parse().ok());
            }
            "--scrollback" => {
                i += 1;
                args.scrollback = argv.get(i).and_then(|v| v.parse().ok());
            }
            "-j" | "--json" => args.json = true,
            "-s" | "--scrollback-snapshot" => args.include_scrollback = true,
            "-h" | "--help" => args.help = true,
            other => {
                // Treat a bare argument as the input file
                if args.input.is_none() && !other.starts_with('-') {
                    args.input = Some(PathBuf::from(other));
                } else {
                    tracing::warn!(arg = other, "ignoring unknown argument");
                }
            }
        }
        i += 1;
    }
    args
}

fn print_help() {
    println!("pocketterm-headless - run terminal output through the emulator");
    println!();
    println!("USAGE:");
    println!("    pocketterm-headless [OPTIONS] [FILE]");
    println!();
    println!("OPTIONS:");
    println!("    -i, --input <FILE>         Read input from FILE (default: stdin)");
    println!("        --config <FILE>        Load terminal settings from a JSON file");
    println!("    -c, --cols <N>             Terminal width (default: 80)");
    println!("    -r, --rows <N>             Terminal height (default: 24)");
    println!("        --scrollback <N>       Scrollback capacity (default: 500)");
    println!("    -j, --json                 Print the snapshot as JSON");
    println!("    -s, --scrollback-snapshot  Include scrollback in the snapshot");
    println!("    -h, --help                 Print this help");
}

fn run(args: &Args) -> pocketterm_core::Result<()> {
    let mut config = match &args.config {
        Some(path) => TerminalConfig::load(path)?,
        None => TerminalConfig::default(),
    };
    config.columns = args.cols.unwrap_or(config.columns);
    config.rows = args.rows.unwrap_or(config.rows);
    config.scrollback_lines = args.scrollback.unwrap_or(config.scrollback_lines);
    config.validate()?;

    let data = match &args.input {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            data
        }
    };

    let mut terminal = Terminal::from_config(&config);
    terminal.append(&data);
    for event in terminal.take_events() {
        // No transport to answer or resize here
        match event {
            TerminalEvent::Response(bytes) => {
                tracing::info!(response = ?String::from_utf8_lossy(&bytes), "dropping response");
            }
            other => tracing::info!(?other, "dropping event"),
        }
    }

    let snapshot = terminal.snapshot(args.include_scrollback);
    if args.json {
        println!("{}", snapshot.to_json()?);
    } else {
        println!("Terminal State ({}x{}):", snapshot.columns, snapshot.rows);
        match snapshot.cursor {
            Some(cursor) => println!("Cursor: ({}, {})", cursor.row, cursor.column),
            None => println!("Cursor: hidden"),
        }
        println!("---");
        println!("{}", snapshot.text());
        println!("---");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = parse_args();
    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
