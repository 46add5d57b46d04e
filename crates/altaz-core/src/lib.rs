//! altaz-core: Core traits, types, and error definitions for altaz.
//!
//! This crate defines the transport-agnostic abstractions shared by the
//! mount protocol client, the transports, and the test harness. Applications
//! that only need coordinate math can depend on this crate alone.
//!
//! # Key types
//!
//! - [`Transport`] -- byte-level communication channel
//! - [`CoordinateSource`] -- supplier of target azimuth/altitude pairs
//! - [`Axis`] / [`AngleDms`] -- the angle/step codec
//! - [`MountStatus`] -- cached mount position snapshot
//! - [`Error`] / [`Result`] -- error handling

pub mod angles;
pub mod error;
pub mod source;
pub mod transport;
pub mod types;

// Re-export key types at crate root for ergonomic `use altaz_core::*`.
pub use angles::{degrees_to_steps, dms_to_steps, steps_to_angle, AngleDms, STEPS_PER_REVOLUTION};
pub use error::{Error, Result};
pub use source::CoordinateSource;
pub use transport::Transport;
pub use types::{Axis, MountStatus};
