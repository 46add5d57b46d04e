//! Mock transport for deterministic testing of the mount protocol.
//!
//! [`MockTransport`] implements the [`Transport`] trait with pre-loaded
//! request/response pairs. This lets you test command encoding, reply
//! classification, and status parsing without a real controller on the
//! other end of the wire.
//!
//! # Example
//!
//! ```
//! use altaz_test_harness::MockTransport;
//!
//! let mut mock = MockTransport::new();
//! // Pre-load: when the client sends this line, return this reply.
//! mock.expect_line("STATUS", "STATUS: AZ=0,AL=0,AZ_MOVING=0,AL_MOVING=0\n");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

use altaz_core::error::{Error, Result};
use altaz_core::transport::Transport;

/// A pre-loaded request/response pair for the mock transport.
#[derive(Debug, Clone)]
struct Expectation {
    /// The exact bytes we expect to be sent.
    request: Vec<u8>,
    /// The bytes to return when the matching request is received.
    response: Vec<u8>,
    /// Signal end-of-file (a zero-byte read) once the response is drained.
    eof: bool,
}

/// A mock [`Transport`] for testing the mount protocol without hardware.
///
/// Expectations are consumed in order. When `send()` is called, the sent
/// data is recorded and matched against the next expectation. The
/// corresponding response is then returned by the next `receive()` call.
///
/// If no expectation matches or the queue is exhausted, an error is returned.
#[derive(Debug)]
pub struct MockTransport {
    /// Ordered queue of expected request/response pairs.
    expectations: VecDeque<Expectation>,
    /// The response data pending for the next `receive()` call.
    pending_response: Option<Vec<u8>>,
    /// Cursor into the pending response (how many bytes have been read so far).
    response_cursor: usize,
    /// Whether the next drained `receive()` should report end-of-file.
    pending_eof: bool,
    /// Whether the transport is "connected".
    connected: bool,
    /// Log of all bytes sent through this transport.
    sent_log: Vec<Vec<u8>>,
}

impl MockTransport {
    /// Create a new mock transport in the connected state.
    pub fn new() -> Self {
        MockTransport {
            expectations: VecDeque::new(),
            pending_response: None,
            response_cursor: 0,
            pending_eof: false,
            connected: true,
            sent_log: Vec::new(),
        }
    }

    /// Add an expected request/response pair as raw bytes.
    ///
    /// When `send()` is called with data matching `request`, the subsequent
    /// `receive()` call will return `response`.
    pub fn expect(&mut self, request: &[u8], response: &[u8]) {
        self.expectations.push_back(Expectation {
            request: request.to_vec(),
            response: response.to_vec(),
            eof: false,
        });
    }

    /// Add an expected command line and its reply.
    ///
    /// The client terminates outgoing commands with a newline, so `request`
    /// is given without one and it is appended here. The `response` is
    /// returned exactly as given.
    pub fn expect_line(&mut self, request: &str, response: &str) {
        let mut req = request.as_bytes().to_vec();
        req.push(b'\n');
        self.expect(&req, response.as_bytes());
    }

    /// Add an expected command line whose reply is end-of-file.
    ///
    /// After the matching `send()`, the next `receive()` returns `Ok(0)`,
    /// simulating the peer closing the line (an unplugged USB adapter).
    pub fn expect_line_eof(&mut self, request: &str) {
        let mut req = request.as_bytes().to_vec();
        req.push(b'\n');
        self.expectations.push_back(Expectation {
            request: req,
            response: Vec::new(),
            eof: true,
        });
    }

    /// Return a reference to all data that has been sent through this transport.
    ///
    /// Each element is the byte slice from one `send()` call.
    pub fn sent_data(&self) -> &[Vec<u8>] {
        &self.sent_log
    }

    /// Return the number of expectations that have not yet been consumed.
    pub fn remaining_expectations(&self) -> usize {
        self.expectations.len()
    }

    /// Set the connected state of the mock transport.
    ///
    /// When set to `false`, subsequent `send()` and `receive()` calls will
    /// return [`Error::NotConnected`].
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        // Record what was sent.
        self.sent_log.push(data.to_vec());

        // Match against the next expectation.
        if let Some(expectation) = self.expectations.pop_front() {
            if data != expectation.request.as_slice() {
                return Err(Error::Protocol(format!(
                    "unexpected send data: expected {:?}, got {:?}",
                    String::from_utf8_lossy(&expectation.request),
                    String::from_utf8_lossy(data)
                )));
            }
            self.pending_response = Some(expectation.response);
            self.response_cursor = 0;
            self.pending_eof = expectation.eof;
            Ok(())
        } else {
            Err(Error::Protocol(
                "no more expectations in mock transport".into(),
            ))
        }
    }

    async fn receive(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        if let Some(ref response) = self.pending_response {
            let remaining = &response[self.response_cursor..];
            if remaining.is_empty() {
                self.pending_response = None;
                self.response_cursor = 0;
                if self.pending_eof {
                    self.pending_eof = false;
                    return Ok(0);
                }
                return Err(Error::Timeout);
            }
            let n = remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.response_cursor += n;
            if self.response_cursor >= response.len() {
                // All response bytes consumed; clear for next exchange.
                self.pending_response = None;
                self.response_cursor = 0;
            }
            Ok(n)
        } else if self.pending_eof {
            self.pending_eof = false;
            Ok(0)
        } else {
            Err(Error::Timeout)
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.connected = false;
        self.pending_response = None;
        self.response_cursor = 0;
        self.pending_eof = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use altaz_core::transport::Transport;

    #[tokio::test]
    async fn mock_transport_basic_send_receive() {
        let mut mock = MockTransport::new();
        mock.expect_line("STATUS", "STATUS: AZ=100,AL=50,AZ_MOVING=0,AL_MOVING=0\n");

        mock.send(b"STATUS\n").await.unwrap();

        let mut buf = [0u8; 64];
        let n = mock
            .receive(&mut buf, Duration::from_millis(100))
            .await
            .unwrap();

        assert_eq!(
            &buf[..n],
            b"STATUS: AZ=100,AL=50,AZ_MOVING=0,AL_MOVING=0\n"
        );
    }

    #[tokio::test]
    async fn mock_transport_tracks_sent_data() {
        let mut mock = MockTransport::new();
        mock.expect_line("AZ,100", "Target reached\n");
        mock.expect_line("AL,50", "Target reached\n");

        mock.send(b"AZ,100\n").await.unwrap();
        mock.send(b"AL,50\n").await.unwrap();

        assert_eq!(mock.sent_data().len(), 2);
        assert_eq!(mock.sent_data()[0], b"AZ,100\n");
        assert_eq!(mock.sent_data()[1], b"AL,50\n");
    }

    #[tokio::test]
    async fn mock_transport_wrong_data_errors() {
        let mut mock = MockTransport::new();
        mock.expect_line("HOME", "Target reached\n");

        let result = mock.send(b"STOP\n").await;
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), Error::Protocol(_)));
    }

    #[tokio::test]
    async fn mock_transport_no_expectations_errors() {
        let mut mock = MockTransport::new();

        let result = mock.send(b"STATUS\n").await;
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), Error::Protocol(_)));
    }

    #[tokio::test]
    async fn mock_transport_receive_without_send_times_out() {
        let mut mock = MockTransport::new();
        let mut buf = [0u8; 64];

        let result = mock.receive(&mut buf, Duration::from_millis(10)).await;
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), Error::Timeout));
    }

    #[tokio::test]
    async fn mock_transport_disconnect() {
        let mut mock = MockTransport::new();
        assert!(mock.is_connected());

        mock.close().await.unwrap();
        assert!(!mock.is_connected());

        // Operations after close should fail.
        let result = mock.send(b"STATUS\n").await;
        assert!(matches!(result.unwrap_err(), Error::NotConnected));
    }

    #[tokio::test]
    async fn mock_transport_set_connected() {
        let mut mock = MockTransport::new();
        mock.set_connected(false);
        assert!(!mock.is_connected());

        let result = mock.send(b"STATUS\n").await;
        assert!(matches!(result.unwrap_err(), Error::NotConnected));

        let mut buf = [0u8; 8];
        let result = mock.receive(&mut buf, Duration::from_millis(10)).await;
        assert!(matches!(result.unwrap_err(), Error::NotConnected));
    }

    #[tokio::test]
    async fn mock_transport_remaining_expectations() {
        let mut mock = MockTransport::new();
        mock.expect_line("AZ,100", "Target reached\n");
        mock.expect_line("STOP", "STOPPED\n");
        assert_eq!(mock.remaining_expectations(), 2);

        mock.send(b"AZ,100\n").await.unwrap();
        assert_eq!(mock.remaining_expectations(), 1);

        mock.send(b"STOP\n").await.unwrap();
        assert_eq!(mock.remaining_expectations(), 0);
    }

    #[tokio::test]
    async fn mock_transport_eof_after_response() {
        let mut mock = MockTransport::new();
        mock.expect_line_eof("STATUS");

        mock.send(b"STATUS\n").await.unwrap();

        let mut buf = [0u8; 64];
        let n = mock
            .receive(&mut buf, Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(n, 0);

        // EOF is delivered once; afterwards the line is silent again.
        let result = mock.receive(&mut buf, Duration::from_millis(10)).await;
        assert!(matches!(result.unwrap_err(), Error::Timeout));
    }

    #[tokio::test]
    async fn mock_transport_partial_receive() {
        let mut mock = MockTransport::new();
        mock.expect(b"STATUS\n", b"Target reached\n");

        mock.send(b"STATUS\n").await.unwrap();

        // Read with a buffer smaller than the response.
        let mut buf = [0u8; 6];
        let n = mock
            .receive(&mut buf, Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(n, 6);
        assert_eq!(&buf[..n], b"Target");

        // Read the remaining bytes.
        let n = mock
            .receive(&mut buf, Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(&buf[..n], b" reach");
    }
}
