use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Envelope(args) => args.run(),
        Command::Forward(args) => args.run(),
        Command::Inverse(args) => args.run(),
    }
}

#[derive(Parser)]
#[command(name = "tripod", about = "Rotary delta kinematics and workspace calibration")]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Calibrate the robot and print its operating envelope.
    Envelope(cli::envelope::EnvelopeArgs),
    /// Convert shoulder angles (degrees) to a tool position.
    Forward(cli::forward::ForwardArgs),
    /// Convert a tool position (mm) to shoulder angles.
    Inverse(cli::inverse::InverseArgs),
}

// Logs go to stderr so stdout stays parseable.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
