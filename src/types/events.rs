use crate::service::ServiceError;
use super::PoseSample;

/// Responses delivered from runtime tasks to the controller's thread.
#[derive(Debug)]
pub enum ServiceEvent {
    CameraStarted(Result<(), ServiceError>),
    CameraStopped(Result<(), ServiceError>),
    RecordingStarted(Result<(), ServiceError>),
    /// Carries the artifact name reported by the service, if any.
    RecordingStopped(Result<Option<String>, ServiceError>),
    PoseFetched {
        generation: u64,
        result: Result<PoseSample, ServiceError>,
    },
}
