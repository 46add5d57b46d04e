//! MountClient -- the session object for one mount over one transport.
//!
//! The client owns its [`Transport`] exclusively: every command takes
//! `&mut self`, so exactly one request/response exchange can be in flight
//! at a time and interleaved writes cannot corrupt the line framing.
//! Connection flags and the cached position live here instead of in
//! ambient globals.

use std::time::Duration;

use tracing::debug;

use altaz_core::angles::degrees_to_steps;
use altaz_core::error::{Error, Result};
use altaz_core::transport::Transport;
use altaz_core::types::{Axis, MountStatus};

use crate::protocol::{self, Command, LineKind};

/// How a command exchange ended.
///
/// A timed-out exchange and a legitimately short reply can carry the same
/// text; this tag keeps the two distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// A terminating line (`Target reached` or `STATUS:`) arrived.
    Completed,
    /// The controller reported an `ERROR` line.
    DeviceError,
    /// The command timeout elapsed before any terminating line.
    TimedOut,
}

/// The accumulated reply to one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    /// All complete reply lines, newline-joined and trimmed. May be empty
    /// when the exchange timed out before any data arrived.
    pub text: String,
    /// How the exchange ended.
    pub outcome: ReplyOutcome,
}

impl CommandReply {
    /// Whether the exchange timed out.
    pub fn timed_out(&self) -> bool {
        self.outcome == ReplyOutcome::TimedOut
    }

    /// Whether the controller reported an error.
    pub fn is_device_error(&self) -> bool {
        self.outcome == ReplyOutcome::DeviceError
    }
}

/// The two labeled results of a coordinate move.
///
/// The axis commands are issued sequentially and independently: a failure
/// on the azimuth command does not prevent the altitude command from
/// being attempted.
#[derive(Debug)]
pub struct TargetMove {
    /// Step position sent to the azimuth motor.
    pub azimuth_steps: i32,
    /// Step position sent to the altitude motor.
    pub altitude_steps: i32,
    /// Result of the azimuth move command.
    pub azimuth: Result<CommandReply>,
    /// Result of the altitude move command.
    pub altitude: Result<CommandReply>,
}

impl std::fmt::Display for TargetMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.azimuth {
            Ok(reply) => writeln!(f, "Azimuth: {}", reply.text)?,
            Err(e) => writeln!(f, "Azimuth: {e}")?,
        }
        match &self.altitude {
            Ok(reply) => write!(f, "Altitude: {}", reply.text),
            Err(e) => write!(f, "Altitude: {e}"),
        }
    }
}

/// Fluent builder for [`MountClient`].
///
/// All knobs default to the values the stock controller sketch needs:
/// a 2 second command timeout and a 2 second settle delay (the board
/// resets when its serial port opens).
///
/// ```ignore
/// let mount = MountBuilder::new()
///     .command_timeout(Duration::from_secs(2))
///     .build_with_transport(Box::new(transport))
///     .await?;
/// ```
pub struct MountBuilder {
    command_timeout: Duration,
    settle_delay: Duration,
}

impl MountBuilder {
    /// Create a builder with default timeouts.
    pub fn new() -> Self {
        MountBuilder {
            command_timeout: Duration::from_secs(2),
            settle_delay: Duration::from_secs(2),
        }
    }

    /// Set the timeout for one command/response exchange (default: 2s).
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Set the post-open settle delay that lets the controller finish its
    /// reset/boot sequence before the first command (default: 2s).
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Build a [`MountClient`] over a caller-provided transport.
    ///
    /// Waits the settle delay, discards any stale buffered input, and
    /// issues one STATUS query to prime the cached position. A failed
    /// priming query is logged and tolerated -- the cache simply starts
    /// at home.
    pub async fn build_with_transport(self, transport: Box<dyn Transport>) -> Result<MountClient> {
        if !transport.is_connected() {
            return Err(Error::NotConnected);
        }

        let mut client = MountClient {
            transport,
            command_timeout: self.command_timeout,
            status: MountStatus::default(),
        };

        if !self.settle_delay.is_zero() {
            debug!(
                settle_ms = self.settle_delay.as_millis(),
                "waiting for controller reset"
            );
            tokio::time::sleep(self.settle_delay).await;
        }

        client.drain_stale_input().await;

        if let Err(e) = client.get_status().await {
            debug!(error = %e, "initial STATUS query failed, starting from home");
        }

        Ok(client)
    }
}

impl Default for MountBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A connected mount controlled over the line protocol.
///
/// Constructed via [`MountBuilder`]. The client caches the last known
/// [`MountStatus`]; [`get_status`](MountClient::get_status) refreshes the
/// cache from the device, [`status`](MountClient::status) reads it
/// without I/O.
pub struct MountClient {
    transport: Box<dyn Transport>,
    command_timeout: Duration,
    status: MountStatus,
}

impl MountClient {
    /// Whether the underlying transport is connected.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// The last known mount status, without touching the device.
    pub fn status(&self) -> MountStatus {
        self.status
    }

    /// Discard whatever the controller printed before we were listening
    /// (boot banners, replies to a previous session).
    async fn drain_stale_input(&mut self) {
        let mut buf = [0u8; 256];
        loop {
            match self
                .transport
                .receive(&mut buf, Duration::from_millis(50))
                .await
            {
                Ok(n) if n > 0 => {
                    debug!(bytes = n, "discarded stale input");
                }
                _ => break,
            }
        }
    }

    /// Send one command and collect its reply.
    ///
    /// Returns [`Error::NotConnected`] without touching the channel when
    /// the transport is closed. Otherwise writes the encoded line plus a
    /// newline, then accumulates complete reply lines until one is
    /// terminal (`Target reached`, `ERROR`, or `STATUS:`) or the command
    /// timeout elapses. A timed-out exchange is not an `Err`: it returns
    /// whatever partial text accumulated, tagged
    /// [`ReplyOutcome::TimedOut`].
    pub async fn send_command(&mut self, command: Command) -> Result<CommandReply> {
        if !self.transport.is_connected() {
            return Err(Error::NotConnected);
        }

        let line = command.encode();
        debug!(command = %line, "sending mount command");
        self.transport.send(format!("{line}\n").as_bytes()).await?;

        let deadline = tokio::time::Instant::now() + self.command_timeout;
        let mut pending: Vec<u8> = Vec::new();
        let mut text = String::new();

        loop {
            let now = tokio::time::Instant::now();
            if now >= deadline {
                break;
            }
            let remaining = deadline - now;

            let mut buf = [0u8; 256];
            match self.transport.receive(&mut buf, remaining).await {
                // A zero-byte read is EOF on the serial side; looping on
                // it would spin until the deadline.
                Ok(0) => return Err(Error::ConnectionLost),
                Ok(n) => {
                    pending.extend_from_slice(&buf[..n]);

                    // Peel off complete lines; keep any partial tail.
                    while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
                        let raw: Vec<u8> = pending.drain(..=pos).collect();
                        let reply_line = String::from_utf8_lossy(&raw).trim().to_string();
                        if reply_line.is_empty() {
                            continue;
                        }

                        if !text.is_empty() {
                            text.push('\n');
                        }
                        text.push_str(&reply_line);

                        match protocol::classify_line(&reply_line) {
                            LineKind::Error => {
                                debug!(reply = %text, "controller reported error");
                                return Ok(CommandReply {
                                    text,
                                    outcome: ReplyOutcome::DeviceError,
                                });
                            }
                            LineKind::TargetReached | LineKind::Status => {
                                return Ok(CommandReply {
                                    text,
                                    outcome: ReplyOutcome::Completed,
                                });
                            }
                            LineKind::Info => {}
                        }
                    }
                }
                Err(Error::Timeout) => break,
                Err(e) => return Err(e),
            }
        }

        // Deadline hit: surface any trailing partial line with the rest.
        if !pending.is_empty() {
            let tail = String::from_utf8_lossy(&pending).trim().to_string();
            if !tail.is_empty() {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&tail);
            }
        }

        debug!(command = %line, partial = %text, "mount command timed out");
        Ok(CommandReply {
            text,
            outcome: ReplyOutcome::TimedOut,
        })
    }

    /// Query the controller and refresh the cached status.
    ///
    /// A reply missing the `STATUS:` marker leaves the cache unchanged
    /// and is not an error; fields inside the reply are applied with
    /// per-field fault isolation.
    pub async fn get_status(&mut self) -> Result<MountStatus> {
        let reply = self.send_command(Command::Status).await?;
        if !protocol::apply_status(&reply.text, &mut self.status) {
            debug!(reply = %reply.text, "STATUS reply missing marker, keeping cached status");
        }
        Ok(self.status)
    }

    /// Move the azimuth motor to an absolute step position.
    pub async fn move_azimuth(&mut self, steps: i32) -> Result<CommandReply> {
        self.send_command(Command::MoveAzimuth(steps)).await
    }

    /// Move the altitude motor to an absolute step position.
    pub async fn move_altitude(&mut self, steps: i32) -> Result<CommandReply> {
        self.send_command(Command::MoveAltitude(steps)).await
    }

    /// Move the mount to a pair of sky coordinates in degrees.
    ///
    /// Converts both angles through the codec and issues the two move
    /// commands sequentially; the altitude command is attempted even when
    /// the azimuth command failed.
    pub async fn move_to_coordinates(&mut self, az_degrees: f64, alt_degrees: f64) -> TargetMove {
        let azimuth_steps = degrees_to_steps(az_degrees, Axis::Azimuth);
        let altitude_steps = degrees_to_steps(alt_degrees, Axis::Altitude);

        let azimuth = self.move_azimuth(azimuth_steps).await;
        let altitude = self.move_altitude(altitude_steps).await;

        TargetMove {
            azimuth_steps,
            altitude_steps,
            azimuth,
            altitude,
        }
    }

    /// Move both motors to the home position (0, 0).
    pub async fn home(&mut self) -> Result<CommandReply> {
        self.send_command(Command::Home).await
    }

    /// Stop all movement.
    pub async fn stop(&mut self) -> Result<CommandReply> {
        self.send_command(Command::Stop).await
    }

    /// Close the transport. Idempotent.
    pub async fn disconnect(&mut self) -> Result<()> {
        if self.transport.is_connected() {
            self.transport.close().await?;
            tracing::info!("disconnected from mount");
        }
        Ok(())
    }
}
