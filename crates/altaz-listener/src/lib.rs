//! altaz-listener: TCP ingest listener for pushed coordinates.
//!
//! Some planetarium setups push coordinates instead of answering
//! queries. [`CoordinateListener`] binds a TCP port, accepts any number
//! of clients, and scans whatever they send for the first two floating
//! point numbers, taken as azimuth and altitude in degrees. Received
//! pairs are logged in degrees/minutes/seconds form and optionally
//! forwarded over an mpsc channel.
//!
//! The listener never writes back to clients and never rejects input;
//! lines without two numbers are logged and skipped.

use std::net::SocketAddr;
use std::sync::LazyLock;

use regex::Regex;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use altaz_core::angles::AngleDms;
use altaz_core::error::{Error, Result};

/// Default ingest port.
pub const DEFAULT_PORT: u16 = 10001;

/// Matches a float (with or without a fractional part), signed or not.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d*\.\d+|\d+").unwrap());

/// Extract `(azimuth, altitude)` from the first two numbers in `text`.
///
/// Any surrounding text is ignored. Returns `None` when fewer than two
/// numbers are present.
///
/// ```
/// use altaz_listener::extract_coordinates;
///
/// assert_eq!(
///     extract_coordinates("AZ:123.45,ALT:-10.2 trailing junk"),
///     Some((123.45, -10.2))
/// );
/// assert_eq!(extract_coordinates("no numbers here"), None);
/// ```
pub fn extract_coordinates(text: &str) -> Option<(f64, f64)> {
    let mut numbers = NUMBER_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok());

    let azimuth = numbers.next()?;
    let altitude = numbers.next()?;
    Some((azimuth, altitude))
}

/// A bound TCP listener for pushed coordinate pairs.
pub struct CoordinateListener {
    listener: TcpListener,
    sink: Option<mpsc::UnboundedSender<(f64, f64)>>,
}

impl CoordinateListener {
    /// Bind the listener to `addr`.
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            Error::Transport(format!("failed to bind listener on {addr}: {e}"))
        })?;
        info!(%addr, "coordinate listener bound");
        Ok(CoordinateListener {
            listener,
            sink: None,
        })
    }

    /// Forward every extracted coordinate pair to `sink` as well as
    /// logging it.
    pub fn with_sink(mut self, sink: mpsc::UnboundedSender<(f64, f64)>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// The address the listener is actually bound to.
    ///
    /// Useful when binding to port 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(Error::Io)
    }

    /// Accept and serve clients until `cancel` fires.
    ///
    /// Each client is handled on its own task, so a stalled client does
    /// not block the accept loop.
    pub async fn run(self, cancel: CancellationToken) -> Result<()> {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("coordinate listener shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            info!(%peer, "planetarium client connected");
                            let sink = self.sink.clone();
                            let cancel = cancel.clone();
                            tokio::spawn(handle_client(stream, peer, sink, cancel));
                        }
                        Err(e) => {
                            warn!(error = %e, "accept failed");
                        }
                    }
                }
            }
        }
    }
}

/// Read one client until it disconnects or the listener is cancelled.
async fn handle_client(
    mut stream: TcpStream,
    peer: SocketAddr,
    sink: Option<mpsc::UnboundedSender<(f64, f64)>>,
    cancel: CancellationToken,
) {
    let mut buf = [0u8; 1024];

    loop {
        let read = tokio::select! {
            _ = cancel.cancelled() => break,
            read = stream.read(&mut buf) => read,
        };

        let n = match read {
            Ok(0) => {
                info!(%peer, "planetarium client disconnected");
                break;
            }
            Ok(n) => n,
            Err(e) => {
                warn!(%peer, error = %e, "client read failed");
                break;
            }
        };

        let text = String::from_utf8_lossy(&buf[..n]);
        match extract_coordinates(&text) {
            Some((azimuth, altitude)) => {
                info!(
                    %peer,
                    azimuth = %AngleDms::from_degrees(azimuth),
                    altitude = %AngleDms::from_degrees(altitude),
                    "received coordinates"
                );
                if let Some(ref sink) = sink {
                    if sink.send((azimuth, altitude)).is_err() {
                        debug!("coordinate sink dropped, logging only");
                    }
                }
            }
            None => {
                debug!(%peer, text = %text.trim(), "ignoring input without two numbers");
            }
        }
    }
}
