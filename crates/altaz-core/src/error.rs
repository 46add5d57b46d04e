//! Error types for altaz.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Transport-layer and protocol-layer
//! failures are all captured here.

/// The error type for all altaz operations.
///
/// Variants cover the failure modes of talking to a stepper-motor mount
/// over a serial line and to a planetarium program over TCP: physical
/// transport failures, malformed responses, timeouts, and lost peers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport-level error (serial port, TCP socket).
    #[error("transport error: {0}")]
    Transport(String),

    /// A protocol-level error (malformed mount response).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Timed out waiting for a response from the mount.
    ///
    /// This typically indicates the controller is powered off, the baud
    /// rate is wrong, or the sketch is not running.
    #[error("timeout waiting for response")]
    Timeout,

    /// No connection to the mount has been established.
    #[error("not connected")]
    NotConnected,

    /// The connection to the mount was lost unexpectedly.
    #[error("connection lost")]
    ConnectionLost,

    /// The coordinate source (planetarium program) is no longer reachable.
    #[error("coordinate source disconnected")]
    SourceDisconnected,

    /// An invalid parameter was supplied, such as a zero baud rate.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_transport() {
        let e = Error::Transport("port busy".into());
        assert_eq!(e.to_string(), "transport error: port busy");
    }

    #[test]
    fn error_display_protocol() {
        let e = Error::Protocol("missing STATUS marker".into());
        assert_eq!(e.to_string(), "protocol error: missing STATUS marker");
    }

    #[test]
    fn error_display_timeout() {
        let e = Error::Timeout;
        assert_eq!(e.to_string(), "timeout waiting for response");
    }

    #[test]
    fn error_display_not_connected() {
        let e = Error::NotConnected;
        assert_eq!(e.to_string(), "not connected");
    }

    #[test]
    fn error_display_source_disconnected() {
        let e = Error::SourceDisconnected;
        assert_eq!(e.to_string(), "coordinate source disconnected");
    }

    #[test]
    fn error_display_invalid_parameter() {
        let e = Error::InvalidParameter("baud rate 0".into());
        assert_eq!(e.to_string(), "invalid parameter: baud rate 0");
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broken");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(e.to_string().contains("pipe broken"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<Error>();
    }
}
