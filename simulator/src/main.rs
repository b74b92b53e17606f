mod dashboard;
mod display;
mod loopback;
mod sampler;
mod session;
mod state;
mod stream;
mod transport;
mod vitals;

use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use sampler::SamplerConfig;
use session::Session;
use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::sync::mpsc;
use transport::{serialport::SerialTransport, tokio_channels::ChannelTransport};
use vitalsim_protocol::SERIAL_BAUD;

/// Display updates that may queue up between redraws, later ones are dropped until there is room.
const DISPLAY_QUEUE_DEPTH: usize = 64;

/// Simulated patient monitor that streams vital signs to a board over serial.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Serial port the receiving board is attached to
    #[arg(short, long, required_unless_present = "loopback")]
    port: Option<String>,

    /// Decode readings in-process instead of sending them to a serial port
    #[arg(long, conflicts_with = "port")]
    loopback: bool,

    /// Serial baud rate
    #[arg(short, long, default_value_t = SERIAL_BAUD)]
    baud: u32,

    /// Time between readings, in milliseconds
    #[arg(long, default_value_t = 1000)]
    interval: u64,

    /// Time allowed for the link to settle before the first reading, in milliseconds
    #[arg(long, default_value_t = 2000)]
    settle: u64,

    /// Write log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Copy, Default, Subcommand)]
enum Command {
    /// Show readings in a terminal dashboard (default)
    #[default]
    Dashboard,

    /// Log readings and toggle the emergency state from stdin
    Stream,
}

#[tokio::main]
async fn main() -> Result<(), io::Error> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();

    init_logging(command, cli.log_file.as_deref())?;

    let config = SamplerConfig {
        interval: Duration::from_millis(cli.interval),
        settle: Duration::from_millis(cli.settle),
    };

    let (display_tx, display_rx) = mpsc::channel(DISPLAY_QUEUE_DEPTH);
    let rng = StdRng::from_entropy();

    let session = match &cli.port {
        Some(port) => Session::start(
            SerialTransport::open(port, cli.baud).ok(),
            rng,
            config,
            display_tx,
        ),
        None => {
            let (transport, rx) = ChannelTransport::new_pair(8);
            loopback::spawn(rx);
            Session::start(Some(transport), rng, config, display_tx)
        }
    };

    match command {
        Command::Dashboard => dashboard::run(session, display_rx).await,
        Command::Stream => stream::run(session, display_rx).await,
    }
}

fn init_logging(command: Command, log_file: Option<&Path>) -> Result<(), io::Error> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    match (log_file, command) {
        (Some(path), _) => {
            builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
        }
        // Anything written to the terminal would be drawn over the dashboard
        (None, Command::Dashboard) => return Ok(()),
        (None, Command::Stream) => {}
    }

    builder.init();

    Ok(())
}

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["vitalsim", "--port", "/dev/ttyUSB0"]).unwrap();

        assert_eq!(cli.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(cli.baud, 115_200);
        assert_eq!(cli.interval, 1000);
        assert_eq!(cli.settle, 2000);
        assert!(matches!(cli.command.unwrap_or_default(), Command::Dashboard));
    }

    #[test]
    fn port_or_loopback_is_required() {
        assert!(Cli::try_parse_from(["vitalsim"]).is_err());
        assert!(Cli::try_parse_from(["vitalsim", "--loopback", "stream"]).is_ok());
        assert!(Cli::try_parse_from(["vitalsim", "--loopback", "--port", "COM10"]).is_err());
    }
}
