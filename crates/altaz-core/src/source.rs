//! Coordinate source trait.
//!
//! A coordinate source is any external system that supplies target
//! azimuth/altitude pairs -- typically a planetarium program's telescope
//! control socket, or a scripted source in tests. The auto-track loop in
//! `altaz-mount` consumes this trait; it never cares where the numbers
//! come from.

use async_trait::async_trait;

/// Supplier of target pointing coordinates.
#[async_trait]
pub trait CoordinateSource: Send {
    /// Request one `(azimuth, altitude)` pair in degrees.
    ///
    /// Returns `None` on any communication failure. Callers must treat a
    /// `None` as transient unless [`is_connected`](Self::is_connected)
    /// also reports the source permanently gone.
    async fn read_coordinates(&mut self) -> Option<(f64, f64)>;

    /// Whether the source is still reachable.
    ///
    /// Once this returns `false` the tracking loop halts gracefully
    /// instead of polling a dead peer.
    fn is_connected(&self) -> bool;
}
