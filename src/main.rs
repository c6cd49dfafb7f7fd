// src/main.rs
mod logger;

use clap::Parser;
use clap::error::ErrorKind;
use huffpack::{BitPacker, Encoding, Error, Result};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};

#[derive(Parser, Debug)]
#[command(name = "huffpack", version)]
#[command(about = "Builds a Huffman code for a file and packs it.", long_about = None)]
struct Cli {
    /// File to compress
    input: PathBuf,
    /// Where to write the packed output
    output: PathBuf,
    /// More log output; repeat for trace level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Skip the per-byte statistics
    #[arg(short, long)]
    quiet: bool,
    /// Exit with status 1 on bad arguments or an unreadable input
    #[arg(long)]
    strict_exit: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // The flag may be present even though parsing failed.
            let strict = std::env::args_os().any(|a| a == "--strict-exit");
            let usage = Error::Usage(format!(
                "File missing or required file count not met!\n{}",
                e.render()
            ));
            return finish(Err(usage), strict);
        }
    };

    logger::init(logger::level_for(cli.verbose, cli.quiet));
    let span = tracing::info_span!(
        "command_execution",
        input = %cli.input.display(),
        output = %cli.output.display()
    );
    let _enter = span.enter();

    finish(run(&cli), cli.strict_exit)
}

fn run(cli: &Cli) -> Result<()> {
    let encoding = Encoding::from_path(&cli.input)?;
    if !cli.quiet {
        encoding.report(io::stdout().lock())?;
    }
    encoding.pack(&cli.input, &cli.output, &mut BitPacker)?;
    Ok(())
}

// Bad arguments and unreadable inputs are reported on stdout and, unless
// --strict-exit is given, still exit 0.
fn finish(result: Result<()>, strict: bool) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_soft() => {
            println!("{}", e);
            warn!(error = %e, "nothing was packed");
            if strict {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!(error = %e, "packing failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
