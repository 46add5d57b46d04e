//! altaz-mount: The mount command protocol layer.
//!
//! This crate turns high-level pointing intents into the line-oriented
//! command protocol spoken by the Arduino mount controller, and drives the
//! mount from a stream of target coordinates:
//!
//! - [`protocol`] -- command encoding and tagged response parsing
//! - [`MountClient`] -- the session object owning the serial link
//! - [`StellariumSource`] -- coordinate queries against a planetarium socket
//! - [`auto_track`] -- the tracking control loop
//!
//! # Example
//!
//! ```no_run
//! use altaz_mount::MountBuilder;
//! use altaz_transport::SerialTransport;
//!
//! # async fn example() -> altaz_core::Result<()> {
//! let transport = SerialTransport::open("/dev/ttyUSB0", 9600).await?;
//! let mut mount = MountBuilder::new()
//!     .build_with_transport(Box::new(transport))
//!     .await?;
//!
//! let status = mount.get_status().await?;
//! println!("mount at {status}");
//!
//! mount.move_to_coordinates(180.0, 45.0).await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod protocol;
pub mod stellarium;
pub mod track;

pub use client::{CommandReply, MountBuilder, MountClient, ReplyOutcome, TargetMove};
pub use protocol::Command;
pub use stellarium::StellariumSource;
pub use track::{auto_track, DEFAULT_UPDATE_INTERVAL};
