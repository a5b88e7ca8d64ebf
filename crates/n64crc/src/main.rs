//! n64crc - Nintendo 64 ROM header checksum tool
//!
//! Usage: n64crc [OPTIONS] <input>

use anyhow::Context;
use clap::{ArgAction, Parser as ClapParser};
use n64_checksum::{Cic, RepairOptions, repair_file};
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "n64crc")]
#[command(version)]
#[command(about = "Check and fix the header checksum of Nintendo 64 ROM images", long_about = None)]
struct Args {
    /// Input ROM image (big-endian .z64)
    #[arg(required = true)]
    input: PathBuf,

    /// Write the repaired image here instead of updating the input in place
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Boot chip to use instead of detecting it (e.g. 6102 or CIC-NUS-6102)
    #[arg(short, long)]
    cic: Option<Cic>,

    /// Fail on unrecognised boot code instead of assuming CIC-NUS-6105
    #[arg(long)]
    strict: bool,

    /// Only verify the checksum; exit with status 1 if it is wrong
    #[arg(long)]
    check: bool,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}

/// Returns whether the image ends up with a valid header checksum
fn run(args: &Args) -> anyhow::Result<bool> {
    let options = RepairOptions {
        cic: args.cic,
        fallback: if args.strict { None } else { Some(Cic::FALLBACK) },
        dry_run: args.check,
    };

    let report = repair_file(&args.input, args.output.as_deref(), &options)
        .with_context(|| format!("unable to process {}", args.input.display()))?;

    print!("{report}");

    Ok(report.is_valid() || !args.check)
}
