// altaz test application -- CLI tool for exercising the mount client
// against real hardware, a TCP-attached controller, or a mock transport.
//
// Usage:
//   altaz-test-app --port /dev/ttyUSB0 status
//   altaz-test-app --port /dev/ttyUSB0 goto 180.0 45.0
//   altaz-test-app --port /dev/ttyUSB0 az 512
//   altaz-test-app --host 192.168.1.50:4000 home
//   altaz-test-app --mock stop
//   altaz-test-app --port /dev/ttyUSB0 track --source 127.0.0.1:10002
//   altaz-test-app listen --bind 0.0.0.0:10001

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use altaz::listener::CoordinateListener;
use altaz::mount::{
    DEFAULT_UPDATE_INTERVAL, MountBuilder, MountClient, StellariumSource, auto_track,
};
use altaz::transport::{SerialTransport, TcpTransport};
use altaz_test_harness::MockTransport;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// altaz test application -- exercises the mount client from the command line.
#[derive(Parser)]
#[command(name = "altaz-test-app", version, about)]
struct Cli {
    /// Serial port path (e.g. /dev/ttyUSB0, COM3).
    /// Required unless --host or --mock is used.
    #[arg(long)]
    port: Option<String>,

    /// Connect to the mount controller over TCP instead of serial
    /// (e.g. 192.168.1.50:4000).
    #[arg(long)]
    host: Option<SocketAddr>,

    /// Override the default baud rate (9600). Serial only.
    #[arg(long)]
    baud: Option<u32>,

    /// Use a mock transport instead of real hardware.
    /// Useful for verifying CLI parsing and builder wiring.
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Query and print the mount position and motion flags.
    Status,

    /// Slew both axes to sky coordinates in degrees.
    Goto {
        /// Azimuth in degrees (0..360).
        azimuth: f64,
        /// Altitude in degrees (0..90).
        altitude: f64,
    },

    /// Move the azimuth axis to an absolute step position.
    Az {
        /// Target step position (0..2048 for one revolution).
        steps: i32,
    },

    /// Move the altitude axis to an absolute step position.
    Al {
        /// Target step position (0..1024 for the quarter turn).
        steps: i32,
    },

    /// Drive both axes to their home position.
    Home,

    /// Stop all motion immediately.
    Stop,

    /// Poll a planetarium program for coordinates and track them
    /// until Ctrl-C.
    Track {
        /// Planetarium coordinate server to query (host:port).
        #[arg(long)]
        source: SocketAddr,

        /// Update interval in seconds.
        #[arg(long, default_value_t = 1)]
        interval: u64,
    },

    /// Listen for coordinates pushed over TCP and log them until
    /// Ctrl-C. Does not require a mount connection.
    Listen {
        /// Address to bind.
        #[arg(long, default_value = "0.0.0.0:10001")]
        bind: SocketAddr,
    },
}

// ---------------------------------------------------------------------------
// Mount construction
// ---------------------------------------------------------------------------

/// Construct a mount client from CLI arguments, dispatching to the
/// right transport.
async fn create_mount(cli: &Cli) -> Result<MountClient> {
    if cli.mock {
        if cli.port.is_some() || cli.host.is_some() {
            bail!("--mock cannot be combined with --port or --host");
        }
        let mut mock = MockTransport::new();
        mock.expect_line("STATUS", "STATUS: AZ=0,AL=0,AZ_MOVING=0,AL_MOVING=0\n");
        let mount = MountBuilder::new()
            .settle_delay(Duration::ZERO)
            .build_with_transport(Box::new(mock))
            .await
            .context("failed to build mount client with mock transport")?;
        println!("Connected (mock transport)");
        return Ok(mount);
    }

    if let Some(addr) = cli.host {
        if cli.port.is_some() {
            bail!("--host and --port are mutually exclusive");
        }
        if cli.baud.is_some() {
            bail!("--baud is not valid with --host");
        }
        let transport = TcpTransport::connect(&addr.to_string())
            .await
            .with_context(|| format!("failed to connect to mount at {addr}"))?;
        let mount = MountBuilder::new()
            .build_with_transport(Box::new(transport))
            .await
            .context("failed to build mount client")?;
        println!("Connected to {addr}");
        return Ok(mount);
    }

    let port = cli
        .port
        .as_deref()
        .context("--port is required unless --host or --mock is used")?;

    let baud = cli.baud.unwrap_or(9600);
    let transport = SerialTransport::open(port, baud)
        .await
        .with_context(|| format!("failed to open serial port {port} at {baud} baud"))?;

    let mount = MountBuilder::new()
        .build_with_transport(Box::new(transport))
        .await
        .context("failed to build mount client")?;

    println!("Connected to {port} at {baud} baud");
    Ok(mount)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_status(mount: &mut MountClient) -> Result<()> {
    let status = mount.get_status().await?;
    println!("{status}");
    Ok(())
}

async fn cmd_goto(mount: &mut MountClient, azimuth: f64, altitude: f64) -> Result<()> {
    if !(0.0..360.0).contains(&azimuth) {
        bail!("azimuth {azimuth} out of range (0..360)");
    }
    if !(0.0..=90.0).contains(&altitude) {
        bail!("altitude {altitude} out of range (0..90)");
    }
    let result = mount.move_to_coordinates(azimuth, altitude).await;
    println!("{result}");
    Ok(())
}

async fn cmd_az(mount: &mut MountClient, steps: i32) -> Result<()> {
    let reply = mount.move_azimuth(steps).await?;
    println!("{}", reply.text);
    Ok(())
}

async fn cmd_al(mount: &mut MountClient, steps: i32) -> Result<()> {
    let reply = mount.move_altitude(steps).await?;
    println!("{}", reply.text);
    Ok(())
}

async fn cmd_home(mount: &mut MountClient) -> Result<()> {
    let reply = mount.home().await?;
    println!("{}", reply.text);
    Ok(())
}

async fn cmd_stop(mount: &mut MountClient) -> Result<()> {
    let reply = mount.stop().await?;
    println!("{}", reply.text);
    Ok(())
}

/// Spawn a task that trips `cancel` on Ctrl-C.
fn cancel_on_ctrl_c(cancel: &CancellationToken) {
    let cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
}

async fn cmd_track(mount: &mut MountClient, source_addr: SocketAddr, interval: u64) -> Result<()> {
    let transport = TcpTransport::connect(&source_addr.to_string())
        .await
        .with_context(|| format!("failed to connect to coordinate source at {source_addr}"))?;
    let mut source = StellariumSource::new(Box::new(transport));

    let interval = if interval == 0 {
        DEFAULT_UPDATE_INTERVAL
    } else {
        Duration::from_secs(interval)
    };

    println!("Tracking from {source_addr} every {interval:?} (Ctrl-C to stop)...");

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(&cancel);

    auto_track(mount, &mut source, interval, &cancel).await?;
    println!("Tracking stopped, motors halted.");
    Ok(())
}

async fn cmd_listen(bind: SocketAddr) -> Result<()> {
    let listener = CoordinateListener::bind(bind)
        .await
        .context("failed to bind coordinate listener")?;
    let bound = listener.local_addr()?;

    println!("Listening for coordinates on {bound} (Ctrl-C to stop)...");

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(&cancel);

    listener.run(cancel).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    // The `listen` command does not require a mount connection.
    if let Command::Listen { bind } = &cli.command {
        return cmd_listen(*bind).await;
    }

    let mut mount = create_mount(&cli).await?;

    let result = match &cli.command {
        Command::Status => cmd_status(&mut mount).await,
        Command::Goto { azimuth, altitude } => cmd_goto(&mut mount, *azimuth, *altitude).await,
        Command::Az { steps } => cmd_az(&mut mount, *steps).await,
        Command::Al { steps } => cmd_al(&mut mount, *steps).await,
        Command::Home => cmd_home(&mut mount).await,
        Command::Stop => cmd_stop(&mut mount).await,
        Command::Track { source, interval } => cmd_track(&mut mount, *source, *interval).await,
        Command::Listen { .. } => unreachable!("listen handled above"),
    };

    mount.disconnect().await.ok();
    result
}
