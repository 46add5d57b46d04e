//! Coordinate queries against a planetarium program's telescope socket.
//!
//! [`StellariumSource`] implements [`CoordinateSource`] over any
//! [`Transport`]: it sends a `GET_COORDS` request line and parses the
//! reply for the `AZ:<float>,ALT:<float>` markers. The markers are
//! matched as substrings, not a strict grammar -- any text containing
//! both parses.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use altaz_core::error::Error;
use altaz_core::source::CoordinateSource;
use altaz_core::transport::Transport;

/// The coordinate request line.
const GET_COORDS: &[u8] = b"GET_COORDS\n";

/// Default timeout for one coordinate reply.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// A [`CoordinateSource`] backed by a planetarium program's TCP socket.
///
/// Read failures that indicate a dead peer (connection lost, I/O errors)
/// mark the source disconnected; a bare timeout or an unparseable reply
/// is transient and only skips that cycle.
pub struct StellariumSource {
    transport: Option<Box<dyn Transport>>,
    read_timeout: Duration,
}

impl StellariumSource {
    /// Wrap a connected transport.
    pub fn new(transport: Box<dyn Transport>) -> Self {
        StellariumSource {
            transport: Some(transport),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Override the reply timeout (default: 2s).
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}

#[async_trait]
impl CoordinateSource for StellariumSource {
    async fn read_coordinates(&mut self) -> Option<(f64, f64)> {
        let transport = self.transport.as_mut()?;

        if let Err(e) = transport.send(GET_COORDS).await {
            warn!(error = %e, "coordinate query failed, marking source disconnected");
            self.transport = None;
            return None;
        }

        let mut buf = [0u8; 1024];
        let n = match transport.receive(&mut buf, self.read_timeout).await {
            Ok(n) => n,
            Err(Error::Timeout) => {
                debug!("no coordinate reply this cycle");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "coordinate read failed, marking source disconnected");
                self.transport = None;
                return None;
            }
        };

        let text = String::from_utf8_lossy(&buf[..n]);
        let coords = parse_coordinates(text.trim());
        if coords.is_none() {
            debug!(reply = %text.trim(), "coordinate reply did not parse");
        }
        coords
    }

    fn is_connected(&self) -> bool {
        self.transport
            .as_ref()
            .is_some_and(|t| t.is_connected())
    }
}

/// Extract `(azimuth, altitude)` from a reply containing the
/// `AZ:<float>,ALT:<float>` markers.
///
/// ```
/// use altaz_mount::stellarium::parse_coordinates;
///
/// assert_eq!(
///     parse_coordinates("AZ:123.45,ALT:67.89"),
///     Some((123.45, 67.89))
/// );
/// assert_eq!(parse_coordinates("no markers"), None);
/// ```
pub fn parse_coordinates(text: &str) -> Option<(f64, f64)> {
    let az_part = text.split("AZ:").nth(1)?.split(',').next()?;
    let alt_part = text.split("ALT:").nth(1)?;

    let azimuth: f64 = az_part.trim().parse().ok()?;
    let altitude: f64 = alt_part.trim().parse().ok()?;
    Some((azimuth, altitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use altaz_test_harness::MockTransport;

    #[test]
    fn parse_plain_reply() {
        assert_eq!(
            parse_coordinates("AZ:123.45,ALT:67.89"),
            Some((123.45, 67.89))
        );
    }

    #[test]
    fn parse_with_surrounding_text() {
        assert_eq!(
            parse_coordinates("COORDS AZ:10.5,ALT:20.25"),
            Some((10.5, 20.25))
        );
    }

    #[test]
    fn parse_negative_altitude() {
        assert_eq!(
            parse_coordinates("AZ:300.0,ALT:-5.5"),
            Some((300.0, -5.5))
        );
    }

    #[test]
    fn parse_missing_markers() {
        assert_eq!(parse_coordinates("RA:1.0,DEC:2.0"), None);
        assert_eq!(parse_coordinates("AZ:1.0"), None);
        assert_eq!(parse_coordinates(""), None);
    }

    #[test]
    fn parse_unparseable_numbers() {
        assert_eq!(parse_coordinates("AZ:abc,ALT:2.0"), None);
        assert_eq!(parse_coordinates("AZ:1.0,ALT:xyz"), None);
    }

    #[tokio::test]
    async fn reads_coordinates_over_transport() {
        let mut mock = MockTransport::new();
        mock.expect(b"GET_COORDS\n", b"AZ:123.45,ALT:67.89\n");

        let mut source = StellariumSource::new(Box::new(mock))
            .with_read_timeout(Duration::from_millis(100));
        assert!(source.is_connected());

        let coords = source.read_coordinates().await;
        assert_eq!(coords, Some((123.45, 67.89)));
        assert!(source.is_connected());
    }

    #[tokio::test]
    async fn timeout_is_transient() {
        let mut mock = MockTransport::new();
        // Reply exhausted immediately: the receive times out.
        mock.expect(b"GET_COORDS\n", b"");

        let mut source = StellariumSource::new(Box::new(mock))
            .with_read_timeout(Duration::from_millis(50));

        assert_eq!(source.read_coordinates().await, None);
        assert!(source.is_connected(), "timeout must not kill the source");
    }

    #[tokio::test]
    async fn send_failure_marks_disconnected() {
        // No expectations loaded: send errors inside the mock.
        let mock = MockTransport::new();

        let mut source = StellariumSource::new(Box::new(mock));
        assert_eq!(source.read_coordinates().await, None);
        assert!(!source.is_connected());

        // Subsequent reads short-circuit.
        assert_eq!(source.read_coordinates().await, None);
    }

    #[tokio::test]
    async fn unparseable_reply_is_transient() {
        let mut mock = MockTransport::new();
        mock.expect(b"GET_COORDS\n", b"lost in space\n");

        let mut source = StellariumSource::new(Box::new(mock))
            .with_read_timeout(Duration::from_millis(50));

        assert_eq!(source.read_coordinates().await, None);
        assert!(source.is_connected());
    }
}
