//! # altaz -- Alt-Azimuth Telescope Mount Control
//!
//! `altaz` is an asynchronous Rust library for driving a two-axis
//! stepper telescope mount over a line-oriented serial protocol, and
//! for feeding it coordinates from a planetarium program such as
//! Stellarium. It sits between the sky model (degrees) and the motor
//! controller (steps).
//!
//! ## Quick Start
//!
//! Add `altaz` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! altaz = "0.1"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! Connect to a mount and slew it:
//!
//! ```no_run
//! use altaz::mount::MountBuilder;
//! use altaz::transport::SerialTransport;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let transport = SerialTransport::open("/dev/ttyUSB0", 9600).await?;
//!     let mut mount = MountBuilder::new()
//!         .build_with_transport(Box::new(transport))
//!         .await?;
//!
//!     let result = mount.move_to_coordinates(180.0, 45.0).await;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate                | Purpose                                         |
//! |----------------------|-------------------------------------------------|
//! | `altaz-core`         | Traits, angle/step conversions, types, errors   |
//! | `altaz-transport`    | Serial and TCP transport implementations        |
//! | `altaz-mount`        | Mount protocol client, tracking loop, Stellarium source |
//! | `altaz-listener`     | TCP ingest listener for pushed coordinates      |
//! | **`altaz`**          | This facade crate -- re-exports everything      |
//!
//! The protocol client works against the [`Transport`] trait, so the
//! same code drives a mount over USB serial, TCP, or a mock in tests.
//!
//! ## Angle Model
//!
//! Both motors step 2048 times per revolution. The azimuth axis turns
//! 1:1 with its motor (0..360 degrees maps to 0..2048 steps); the
//! altitude axis is geared 2:1, so its quarter-turn range of 0..90
//! degrees maps to 0..1024 steps, half a motor revolution. Conversions
//! truncate toward zero and are never clamped, matching what the
//! controller firmware accepts.
//!
//! ## Tracking
//!
//! [`auto_track`](mount::auto_track) polls a [`CoordinateSource`] on a
//! fixed interval and forwards each reading to the mount, stopping the
//! motors once on cancellation or source loss.

pub use altaz_core::*;

/// Serial and TCP transports.
pub mod transport {
    pub use altaz_transport::*;
}

/// Mount protocol client, tracking loop, and the Stellarium
/// coordinate source.
pub mod mount {
    pub use altaz_mount::*;
}

/// TCP ingest listener for coordinates pushed by a planetarium
/// program.
#[cfg(feature = "listener")]
pub mod listener {
    pub use altaz_listener::*;
}
