//! The auto-track control loop.
//!
//! Repeatedly pulls a target coordinate pair from a [`CoordinateSource`],
//! forwards it to the mount, and sleeps for the update interval. The loop
//! never terminates on its own: it runs until the [`CancellationToken`]
//! fires or the source reports itself permanently gone, and in either case
//! issues exactly one STOP before returning.
//!
//! The loop borrows the [`MountClient`] mutably for its whole lifetime,
//! so no other caller can interleave commands while tracking is active.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use altaz_core::error::{Error, Result};
use altaz_core::source::CoordinateSource;

use crate::client::MountClient;

/// Default pause between tracking iterations.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(1);

/// Track the coordinate source until cancelled.
///
/// Refuses to start -- no state change, no commands issued -- when either
/// the mount transport ([`Error::NotConnected`]) or the coordinate source
/// ([`Error::SourceDisconnected`]) is not connected.
///
/// Per iteration: read one coordinate pair; forward it to
/// [`MountClient::move_to_coordinates`] if present (command failures are
/// logged and skipped, the loop keeps going); skip the move if absent.
/// A source that reports itself disconnected halts the loop gracefully:
/// the mount is stopped and [`Error::SourceDisconnected`] returned.
///
/// Cancellation is checked once per iteration and also interrupts the
/// inter-iteration sleep; the final STOP is never skipped.
pub async fn auto_track(
    client: &mut MountClient,
    source: &mut dyn CoordinateSource,
    interval: Duration,
    cancel: &CancellationToken,
) -> Result<()> {
    if !client.is_connected() {
        warn!("cannot start tracking: mount not connected");
        return Err(Error::NotConnected);
    }
    if !source.is_connected() {
        warn!("cannot start tracking: coordinate source not connected");
        return Err(Error::SourceDisconnected);
    }

    info!(interval_ms = interval.as_millis(), "auto-tracking started");

    while !cancel.is_cancelled() {
        match source.read_coordinates().await {
            Some((azimuth, altitude)) => {
                info!(azimuth, altitude, "forwarding target");
                let result = client.move_to_coordinates(azimuth, altitude).await;
                if let Err(e) = &result.azimuth {
                    warn!(error = %e, "azimuth move failed");
                }
                if let Err(e) = &result.altitude {
                    warn!(error = %e, "altitude move failed");
                }
            }
            None => {
                if !source.is_connected() {
                    warn!("coordinate source lost, stopping mount");
                    client.stop().await?;
                    return Err(Error::SourceDisconnected);
                }
                debug!("no coordinates this cycle");
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    info!("auto-tracking cancelled, stopping mount");
    client.stop().await?;
    Ok(())
}
