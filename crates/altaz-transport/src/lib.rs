//! altaz-transport: Transport implementations for altaz.
//!
//! Provides [`SerialTransport`] for the USB serial link to the mount
//! controller and [`TcpTransport`] for network collaborators such as a
//! planetarium program's telescope control socket. Both implement the
//! [`Transport`](altaz_core::Transport) trait from `altaz-core`.

pub mod serial;
pub mod tcp;

pub use serial::{SerialConfig, SerialTransport};
pub use tcp::TcpTransport;
