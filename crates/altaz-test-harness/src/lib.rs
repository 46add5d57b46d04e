//! altaz-test-harness: Test utilities and mock transports for altaz.
//!
//! This crate provides [`MockTransport`] for deterministic unit testing of
//! the mount protocol without requiring real controller hardware, and
//! [`ScriptedSource`] for driving the tracking loop with canned
//! coordinates.

pub mod mock_serial;
pub mod mock_source;

pub use mock_serial::MockTransport;
pub use mock_source::ScriptedSource;
