//! Client side of the remote pose service.

pub mod wire;
pub mod http;
pub mod demo;

use std::future::Future;
use crate::types::{PoseError, PoseSample};

pub use http::HttpPoseService;
pub use demo::DemoPoseService;

/// Failures of a single request to the pose service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),
    #[error("service reported failure: {0}")]
    Rejected(String),
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("malformed pose: {0}")]
    Pose(#[from] PoseError),
}

/// The four control actions and the pose fetch exposed by the remote service.
///
/// Each call is one request/response exchange; no call retries.
pub trait PoseService: Send + Sync + 'static {
    fn start_camera(&self) -> impl Future<Output = Result<(), ServiceError>> + Send;

    fn stop_camera(&self) -> impl Future<Output = Result<(), ServiceError>> + Send;

    fn start_recording(&self) -> impl Future<Output = Result<(), ServiceError>> + Send;

    /// Returns the name of the persisted recording artifact when the service reports one.
    fn stop_recording(&self) -> impl Future<Output = Result<Option<String>, ServiceError>> + Send;

    fn fetch_pose(&self) -> impl Future<Output = Result<PoseSample, ServiceError>> + Send;

    /// Opaque video stream reference shown while the camera is active.
    fn video_feed_url(&self) -> Option<String> {
        None
    }
}
