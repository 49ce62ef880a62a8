/// Camera and recording flags as confirmed by the remote service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    pub camera_active: bool,
    pub recording: bool,
}

/// Enabled state and labels of the dashboard buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub camera_label: &'static str,
    pub camera_enabled: bool,
    pub record_enabled: bool,
    pub stop_enabled: bool,
}

impl ControlState {
    pub fn derive(state: SessionState, camera_start_pending: bool) -> Self {
        let camera_label = if camera_start_pending {
            "Starting camera..."
        } else if state.camera_active {
            "Stop Camera"
        } else {
            "Start Camera"
        };

        Self {
            camera_label,
            camera_enabled: !camera_start_pending,
            record_enabled: state.camera_active && !state.recording,
            stop_enabled: state.camera_active && state.recording,
        }
    }
}

/// Outcome counters for pose ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub succeeded: u64,
    pub failed: u64,
    pub stale: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_start_disables_camera_button() {
        let controls = ControlState::derive(SessionState::default(), true);
        assert!(!controls.camera_enabled);
        assert_eq!(controls.camera_label, "Starting camera...");
        assert!(!controls.record_enabled);
    }

    #[test]
    fn recording_flips_record_and_stop() {
        let idle = ControlState::derive(SessionState { camera_active: true, recording: false }, false);
        assert!(idle.record_enabled && !idle.stop_enabled);

        let recording = ControlState::derive(SessionState { camera_active: true, recording: true }, false);
        assert!(!recording.record_enabled && recording.stop_enabled);
        assert_eq!(recording.camera_label, "Stop Camera");
    }
}
