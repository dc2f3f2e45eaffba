use clap::{Parser, Subcommand};
use gpx_pnezd::{Config, Converter, Direction, Result, Srs};
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert GPX waypoints to PNEZD survey points and back
#[derive(Parser)]
#[command(name = "gpx-pnezd", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Reference system of the PNEZD side, e.g. EPSG:2229 (overrides the configuration)
    #[arg(short, long, global = true)]
    srs: Option<Srs>,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a GPX document into a PNEZD list
    ToPnezd { input: PathBuf, output: PathBuf },
    /// Convert a PNEZD list into a GPX document
    ToGpx { input: PathBuf, output: PathBuf },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let srs = cli.srs.unwrap_or_else(|| config.target_srs.clone());

    let (direction, input, output) = match cli.command {
        Command::ToPnezd { input, output } => (Direction::GpxToPnezd, input, output),
        Command::ToGpx { input, output } => (Direction::PnezdToGpx, input, output),
    };

    Converter::with_proj(&config).convert_file(direction, input, output, &srs)
}
