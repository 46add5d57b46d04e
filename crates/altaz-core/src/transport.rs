//! Transport trait for mount communication.
//!
//! The [`Transport`] trait abstracts over the physical link to the mount
//! controller. Implementations exist for serial ports (the Arduino link),
//! TCP sockets (the planetarium coordinate query link), and mock transports
//! for testing.
//!
//! The protocol client in `altaz-mount` operates on a `Transport` rather
//! than directly on a serial port, enabling both real hardware control and
//! deterministic unit testing with `MockTransport` from the
//! `altaz-test-harness` crate.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous byte-level transport to the mount controller.
///
/// Implementations handle buffering and error recovery at the physical
/// layer. Line framing and command/response pairing are handled by the
/// protocol client that consumes this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send raw bytes to the device.
    ///
    /// Implementations should not return until all bytes have been written
    /// to the underlying transport (serial TX buffer, TCP socket, etc.).
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive bytes from the device into the provided buffer.
    ///
    /// Returns the number of bytes actually read. Will wait up to `timeout`
    /// for data to arrive; returns [`Error::Timeout`](crate::error::Error::Timeout)
    /// if no data is received within the deadline. Every read has a hard
    /// timeout so a silent, unresponsive device never blocks a caller
    /// indefinitely.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the transport connection.
    ///
    /// After calling `close()`, subsequent `send()` and `receive()` calls
    /// should return [`Error::NotConnected`](crate::error::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}
