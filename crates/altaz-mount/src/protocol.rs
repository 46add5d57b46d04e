//! Mount command encoding and response decoding.
//!
//! The controller speaks a newline-terminated ASCII request/response
//! protocol: one command line out, free-text reply lines back, with two
//! terminating tokens (`Target reached` on success, `ERROR` on failure)
//! plus a structured `STATUS:` reply for position queries.
//!
//! Responses are classified line by line into [`LineKind`] rather than by
//! ad-hoc substring search, so partial and ambiguous matches are explicit
//! cases. STATUS field parsing is per-field: one unparseable field is
//! skipped without losing the others.

use altaz_core::types::MountStatus;

/// Marker that introduces the structured status reply.
pub const STATUS_MARKER: &str = "STATUS:";

/// Token that terminates a reply on controller-side failure.
pub const ERROR_TOKEN: &str = "ERROR";

/// Phrase that terminates a reply when a move completes.
pub const TARGET_REACHED: &str = "Target reached";

/// A command understood by the mount controller.
///
/// Step values are passed through verbatim -- the codec does not clamp
/// to the axis travel and neither does the encoder; the firmware owns
/// its limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Query position and motion state.
    Status,
    /// Move the azimuth motor to an absolute step position.
    MoveAzimuth(i32),
    /// Move the altitude motor to an absolute step position.
    MoveAltitude(i32),
    /// Move both motors to the home position (0, 0).
    Home,
    /// Stop all movement.
    Stop,
}

impl Command {
    /// Encode the command as a wire line (without the trailing newline).
    ///
    /// ```
    /// use altaz_mount::Command;
    ///
    /// assert_eq!(Command::Status.encode(), "STATUS");
    /// assert_eq!(Command::MoveAzimuth(512).encode(), "AZ,512");
    /// assert_eq!(Command::MoveAltitude(-3).encode(), "AL,-3");
    /// assert_eq!(Command::Home.encode(), "HOME");
    /// assert_eq!(Command::Stop.encode(), "STOP");
    /// ```
    pub fn encode(&self) -> String {
        match self {
            Command::Status => "STATUS".to_string(),
            Command::MoveAzimuth(steps) => format!("AZ,{steps}"),
            Command::MoveAltitude(steps) => format!("AL,{steps}"),
            Command::Home => "HOME".to_string(),
            Command::Stop => "STOP".to_string(),
        }
    }
}

/// Classification of one reply line from the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// The line carries the `Target reached` completion phrase.
    TargetReached,
    /// The line carries the `ERROR` token.
    Error,
    /// The line carries a structured `STATUS:` reply.
    Status,
    /// Free-text progress chatter; not terminal.
    Info,
}

impl LineKind {
    /// Whether this line ends the response to an in-flight command.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LineKind::Info)
    }
}

/// Classify one reply line.
///
/// `ERROR` wins over the other tokens: a line carrying both is an error.
pub fn classify_line(line: &str) -> LineKind {
    if line.contains(ERROR_TOKEN) {
        LineKind::Error
    } else if line.contains(TARGET_REACHED) {
        LineKind::TargetReached
    } else if line.contains(STATUS_MARKER) {
        LineKind::Status
    } else {
        LineKind::Info
    }
}

/// Apply a STATUS reply to a cached [`MountStatus`].
///
/// Returns `false` (leaving the status untouched) when the text does not
/// contain the `STATUS:` marker. Otherwise splits the remainder of that
/// line on commas and applies each recognized field independently:
/// `AZ=<int>`, `AL=<int>`, `AZ_MOVING=<0|1>`, `AL_MOVING=<0|1>`. A field
/// that fails to parse is skipped and keeps its prior value; unrecognized
/// fields are ignored.
pub fn apply_status(text: &str, status: &mut MountStatus) -> bool {
    let Some(idx) = text.find(STATUS_MARKER) else {
        return false;
    };
    let rest = &text[idx + STATUS_MARKER.len()..];
    let line = rest.lines().next().unwrap_or("");

    for field in line.split(',') {
        let field = field.trim();
        if let Some(v) = field.strip_prefix("AZ=") {
            if let Ok(steps) = v.trim().parse::<i32>() {
                status.azimuth_steps = steps;
            }
        } else if let Some(v) = field.strip_prefix("AL=") {
            if let Ok(steps) = v.trim().parse::<i32>() {
                status.altitude_steps = steps;
            }
        } else if let Some(v) = field.strip_prefix("AZ_MOVING=") {
            if let Some(moving) = parse_flag(v.trim()) {
                status.azimuth_moving = moving;
            }
        } else if let Some(v) = field.strip_prefix("AL_MOVING=") {
            if let Some(moving) = parse_flag(v.trim()) {
                status.altitude_moving = moving;
            }
        }
    }

    true
}

/// Parse a `0`/`1` motion flag. Anything else is a skipped field.
fn parse_flag(v: &str) -> Option<bool> {
    match v {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Command encoding
    // -----------------------------------------------------------------------

    #[test]
    fn encode_all_commands() {
        assert_eq!(Command::Status.encode(), "STATUS");
        assert_eq!(Command::MoveAzimuth(1024).encode(), "AZ,1024");
        assert_eq!(Command::MoveAltitude(512).encode(), "AL,512");
        assert_eq!(Command::Home.encode(), "HOME");
        assert_eq!(Command::Stop.encode(), "STOP");
    }

    #[test]
    fn encode_passes_out_of_range_steps_verbatim() {
        assert_eq!(Command::MoveAzimuth(99999).encode(), "AZ,99999");
        assert_eq!(Command::MoveAltitude(-1).encode(), "AL,-1");
    }

    // -----------------------------------------------------------------------
    // Line classification
    // -----------------------------------------------------------------------

    #[test]
    fn classify_target_reached() {
        assert_eq!(
            classify_line("Azimuth: Target reached"),
            LineKind::TargetReached
        );
    }

    #[test]
    fn classify_error() {
        assert_eq!(classify_line("ERROR: steps out of range"), LineKind::Error);
    }

    #[test]
    fn classify_error_wins_over_target_reached() {
        assert_eq!(
            classify_line("ERROR before Target reached"),
            LineKind::Error
        );
    }

    #[test]
    fn classify_status() {
        assert_eq!(
            classify_line("STATUS: AZ=100,AL=50,AZ_MOVING=0,AL_MOVING=0"),
            LineKind::Status
        );
    }

    #[test]
    fn classify_info_chatter() {
        assert_eq!(classify_line("Moving azimuth to 512..."), LineKind::Info);
        assert!(!LineKind::Info.is_terminal());
        assert!(LineKind::Status.is_terminal());
    }

    // -----------------------------------------------------------------------
    // STATUS parsing
    // -----------------------------------------------------------------------

    #[test]
    fn apply_status_full_reply() {
        let mut status = MountStatus::default();
        let applied = apply_status("STATUS: AZ=100, AL=50, AZ_MOVING=0, AL_MOVING=1", &mut status);
        assert!(applied);
        assert_eq!(status.azimuth_steps, 100);
        assert_eq!(status.altitude_steps, 50);
        assert!(!status.azimuth_moving);
        assert!(status.altitude_moving);
    }

    #[test]
    fn apply_status_missing_marker_is_noop() {
        let mut status = MountStatus {
            azimuth_steps: 7,
            ..Default::default()
        };
        let applied = apply_status("garbage with no marker", &mut status);
        assert!(!applied);
        assert_eq!(status.azimuth_steps, 7);
    }

    #[test]
    fn apply_status_field_isolation() {
        // One bad field must not poison the others or reset prior values.
        let mut status = MountStatus {
            altitude_steps: 42,
            ..Default::default()
        };
        let applied = apply_status("STATUS: AZ=500,AL=BAD,AZ_MOVING=1,AL_MOVING=0", &mut status);
        assert!(applied);
        assert_eq!(status.azimuth_steps, 500);
        assert_eq!(status.altitude_steps, 42, "bad field must keep prior value");
        assert!(status.azimuth_moving);
        assert!(!status.altitude_moving);
    }

    #[test]
    fn apply_status_partial_fields() {
        let mut status = MountStatus {
            azimuth_steps: 1,
            altitude_steps: 2,
            azimuth_moving: true,
            altitude_moving: true,
        };
        apply_status("STATUS: AL=99", &mut status);
        assert_eq!(status.azimuth_steps, 1);
        assert_eq!(status.altitude_steps, 99);
        assert!(status.azimuth_moving);
        assert!(status.altitude_moving);
    }

    #[test]
    fn apply_status_bad_flag_keeps_prior() {
        let mut status = MountStatus {
            azimuth_moving: true,
            ..Default::default()
        };
        apply_status("STATUS: AZ_MOVING=banana", &mut status);
        assert!(status.azimuth_moving);
    }

    #[test]
    fn apply_status_ignores_unknown_fields() {
        let mut status = MountStatus::default();
        apply_status("STATUS: AZ=10,TEMP=21,AL=20", &mut status);
        assert_eq!(status.azimuth_steps, 10);
        assert_eq!(status.altitude_steps, 20);
    }

    #[test]
    fn apply_status_only_first_line_after_marker() {
        let mut status = MountStatus::default();
        apply_status("STATUS: AZ=10\nAL=999", &mut status);
        assert_eq!(status.azimuth_steps, 10);
        assert_eq!(status.altitude_steps, 0);
    }

    #[test]
    fn apply_status_marker_mid_text() {
        let mut status = MountStatus::default();
        apply_status("booting\nSTATUS: AZ=3,AL=4,AZ_MOVING=0,AL_MOVING=0", &mut status);
        assert_eq!(status.azimuth_steps, 3);
        assert_eq!(status.altitude_steps, 4);
    }
}
