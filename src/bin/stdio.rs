use clap::Parser;
use npt_core::cli::CommonArgs;
use npt_core::dispatch::{encode, handle_line};
use npt_core::NptEngine;
use std::io::{self, BufRead, Write};

/// JSON-lines request loop over stdin/stdout
#[derive(Parser, Debug)]
#[command(name = "npt_stdio", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    cli.common.init_tracing();

    let config = cli.common.load_config()?;
    let mut engine = NptEngine::open(&config)?;
    tracing::info!(names = engine.trie.len(), "accepting requests");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let input = line?;
        if input.trim().is_empty() {
            continue;
        }
        let handled = handle_line(&mut engine, &input);
        writeln!(stdout, "{}", encode(&handled.response)?)?;
        stdout.flush()?;
        if handled.shutdown {
            break;
        }
    }
    tracing::info!("stdin closed, exiting");
    Ok(())
}
