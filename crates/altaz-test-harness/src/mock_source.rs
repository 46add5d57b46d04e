//! Scripted coordinate source for testing the tracking loop.

use std::collections::VecDeque;

use async_trait::async_trait;

use altaz_core::source::CoordinateSource;

/// A [`CoordinateSource`] that yields a fixed script of readings.
///
/// Each call to `read_coordinates()` pops the next entry: `Some` yields
/// that coordinate pair, `None` models a cycle where the source had
/// nothing usable. Once the script is exhausted every further read
/// yields `None`.
#[derive(Debug)]
pub struct ScriptedSource {
    script: VecDeque<Option<(f64, f64)>>,
    connected: bool,
    /// Report disconnected once the script has been fully consumed.
    disconnect_on_exhaustion: bool,
    reads: usize,
}

impl ScriptedSource {
    /// Create a source that plays back `script` in order.
    pub fn new(script: Vec<Option<(f64, f64)>>) -> Self {
        ScriptedSource {
            script: script.into(),
            connected: true,
            disconnect_on_exhaustion: false,
            reads: 0,
        }
    }

    /// Report the source as disconnected once the script runs out.
    pub fn disconnect_after_script(mut self) -> Self {
        self.disconnect_on_exhaustion = true;
        self
    }

    /// Force the connected state.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Number of `read_coordinates()` calls made so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

#[async_trait]
impl CoordinateSource for ScriptedSource {
    async fn read_coordinates(&mut self) -> Option<(f64, f64)> {
        self.reads += 1;
        self.script.pop_front().flatten()
    }

    fn is_connected(&self) -> bool {
        if !self.connected {
            return false;
        }
        if self.disconnect_on_exhaustion && self.script.is_empty() {
            return false;
        }
        true
    }
}
