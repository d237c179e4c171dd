use std::{io, path::PathBuf, process::ExitCode, time::SystemTime};

use clap::Parser;
use game::Game;
use log::{LevelFilter, error, info};
use play::{PlayerNames, run_match};

mod board;
mod error;
mod game;
mod moves;
mod perft;
mod play;

/// Two-player chess where only pawns are on the board
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Name of the white player. Prompted for if not given
    #[arg(long)]
    white: Option<String>,

    /// Name of the black player. Prompted for if not given
    #[arg(long)]
    black: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,

    /// Count move paths from the starting position to this depth and exit
    #[arg(long)]
    perft: Option<u8>,
}

fn setup_logger(args: &Args) -> Result<(), fern::InitError> {
    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(args.log_level);

    let dispatch = match &args.log_file {
        Some(path) => dispatch.chain(fern::log_file(path)?),
        None => dispatch.chain(io::stderr()),
    };

    dispatch.apply()?;
    log_panics::init();

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = setup_logger(&args) {
        eprintln!("Failed to set up logging: {e}");
        return ExitCode::FAILURE;
    }

    if let Some(depth) = args.perft {
        let stats = Game::new().start_perft(depth);
        println!("{}", stats.nodes);
        return ExitCode::SUCCESS;
    }

    let names = PlayerNames {
        white: args.white,
        black: args.black,
    };

    match run_match(io::stdin().lock(), io::stdout().lock(), names) {
        Ok(outcome) => {
            info!("Session ended with outcome {outcome:?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Console I/O failed: {e}");
            eprintln!("Console I/O failed: {e}");
            ExitCode::FAILURE
        }
    }
}
