//! Core types used throughout altaz.

use std::fmt;

use crate::angles::{steps_to_angle, AngleDms, STEPS_PER_REVOLUTION};

/// One of the mount's two motor axes.
///
/// Each axis has a fixed full-scale step count and a fixed angular span:
/// the azimuth motor covers a full 360 degree revolution, the altitude
/// motor covers 0-90 degrees in half a revolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal-plane pointing angle, 0-360 degrees.
    Azimuth,
    /// Elevation above the horizon, 0-90 degrees.
    Altitude,
}

impl Axis {
    /// Step count for the axis's full angular span.
    pub fn max_steps(&self) -> i32 {
        match self {
            Axis::Azimuth => STEPS_PER_REVOLUTION,
            Axis::Altitude => STEPS_PER_REVOLUTION / 2,
        }
    }

    /// Angular span of the axis in degrees.
    pub fn span_degrees(&self) -> f64 {
        match self {
            Axis::Azimuth => 360.0,
            Axis::Altitude => 90.0,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Azimuth => write!(f, "azimuth"),
            Axis::Altitude => write!(f, "altitude"),
        }
    }
}

/// Snapshot of the mount's position and motion state.
///
/// Maintained by the protocol client as a cache: each STATUS reply
/// overwrites the fields it carries, and fields that are missing or fail
/// to parse keep their last known value. A malformed reply leaves the
/// whole snapshot untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MountStatus {
    /// Absolute azimuth motor position in steps.
    pub azimuth_steps: i32,
    /// Absolute altitude motor position in steps.
    pub altitude_steps: i32,
    /// Whether the azimuth motor is currently moving.
    pub azimuth_moving: bool,
    /// Whether the altitude motor is currently moving.
    pub altitude_moving: bool,
}

impl MountStatus {
    /// Azimuth position as a decomposed angle.
    pub fn azimuth_angle(&self) -> AngleDms {
        steps_to_angle(self.azimuth_steps, Axis::Azimuth)
    }

    /// Altitude position as a decomposed angle.
    pub fn altitude_angle(&self) -> AngleDms {
        steps_to_angle(self.altitude_steps, Axis::Altitude)
    }
}

impl fmt::Display for MountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AZ={} ({}), AL={} ({}), AZ_MOVING={}, AL_MOVING={}",
            self.azimuth_steps,
            self.azimuth_angle(),
            self.altitude_steps,
            self.altitude_angle(),
            self.azimuth_moving as u8,
            self.altitude_moving as u8,
        )
    }
}
