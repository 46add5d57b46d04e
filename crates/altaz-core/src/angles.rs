//! The angle/step codec: pure conversions between sky angles and motor
//! step positions.
//!
//! The mount drives two 28BYJ-48 style steppers geared so that one full
//! azimuth revolution is [`STEPS_PER_REVOLUTION`] steps and the altitude
//! axis covers its 90 degree span in half a revolution. These functions are
//! referentially transparent and do no I/O; the protocol client and the
//! ingest listener both build on them.
//!
//! Conversions truncate toward zero (the firmware's step counter is an
//! integer), so `deg -> steps -> deg` round-trips within one step's angular
//! resolution. There is no bounds checking: negative or out-of-range inputs
//! propagate to negative or out-of-range outputs, and step positions are
//! never clamped to the axis travel. The firmware owns its limits.

use crate::types::Axis;
use std::fmt;

/// Motor steps for one full 360 degree azimuth revolution.
pub const STEPS_PER_REVOLUTION: i32 = 2048;

/// A sky angle decomposed into degrees, arcminutes, and arcseconds.
///
/// The decomposition truncates: `degrees` and `minutes` are the integer
/// parts, `seconds` carries the remainder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleDms {
    /// Whole degrees.
    pub degrees: i32,
    /// Whole arcminutes of the fractional degree.
    pub minutes: i32,
    /// Remaining arcseconds.
    pub seconds: f64,
}

impl AngleDms {
    /// Decompose a floating-point degree value.
    ///
    /// ```
    /// use altaz_core::AngleDms;
    ///
    /// let a = AngleDms::from_degrees(123.7625);
    /// assert_eq!(a.degrees, 123);
    /// assert_eq!(a.minutes, 45);
    /// assert!((a.seconds - 45.0).abs() < 1e-6);
    /// ```
    pub fn from_degrees(total: f64) -> Self {
        let degrees = total as i32;
        let minutes = ((total - degrees as f64) * 60.0) as i32;
        let seconds = (total - degrees as f64 - minutes as f64 / 60.0) * 3600.0;
        AngleDms {
            degrees,
            minutes,
            seconds,
        }
    }

    /// Recombine into a single floating-point degree value.
    pub fn total_degrees(&self) -> f64 {
        self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0
    }
}

impl fmt::Display for AngleDms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\u{b0} {}' {:.2}\"",
            self.degrees, self.minutes, self.seconds
        )
    }
}

/// Convert a degree value to an absolute step position on an axis.
///
/// Computes `trunc((degrees / span) * max_steps)`. Values outside the
/// axis travel pass through unclamped.
///
/// ```
/// use altaz_core::{degrees_to_steps, Axis};
///
/// assert_eq!(degrees_to_steps(0.0, Axis::Azimuth), 0);
/// assert_eq!(degrees_to_steps(360.0, Axis::Azimuth), 2048);
/// assert_eq!(degrees_to_steps(90.0, Axis::Altitude), 1024);
/// ```
pub fn degrees_to_steps(degrees: f64, axis: Axis) -> i32 {
    ((degrees / axis.span_degrees()) * axis.max_steps() as f64) as i32
}

/// Convert a decomposed degrees/minutes/seconds angle to a step position.
///
/// The parts are combined as `d + m/60 + s/3600` first.
pub fn dms_to_steps(degrees: f64, minutes: f64, seconds: f64, axis: Axis) -> i32 {
    degrees_to_steps(degrees + minutes / 60.0 + seconds / 3600.0, axis)
}

/// Convert an absolute step position back to a decomposed angle.
pub fn steps_to_angle(steps: i32, axis: Axis) -> AngleDms {
    let total = steps as f64 * axis.span_degrees() / axis.max_steps() as f64;
    AngleDms::from_degrees(total)
}
