use std::f64::consts::TAU;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use chrono::Local;
use log::info;
use rand::Rng;

use crate::types::{LandmarkPoint, PoseSample, LANDMARK_COUNT};
use super::{PoseService, ServiceError};

/// Resting pose in normalized image coordinates, MediaPipe index order.
const REST_POSE: [[f64; 3]; LANDMARK_COUNT] = [
    [0.50, 0.15, -0.05], // nose
    [0.49, 0.13, -0.05], [0.48, 0.13, -0.05], [0.47, 0.13, -0.05],
    [0.51, 0.13, -0.05], [0.52, 0.13, -0.05], [0.53, 0.13, -0.05],
    [0.45, 0.14, 0.00], [0.55, 0.14, 0.00],
    [0.49, 0.18, -0.04], [0.51, 0.18, -0.04],
    [0.40, 0.28, 0.00], [0.60, 0.28, 0.00], // shoulders
    [0.37, 0.42, 0.02], [0.63, 0.42, 0.02], // elbows
    [0.36, 0.55, 0.00], [0.64, 0.55, 0.00], // wrists
    [0.35, 0.58, 0.00], [0.65, 0.58, 0.00],
    [0.35, 0.58, 0.00], [0.65, 0.58, 0.00],
    [0.36, 0.57, 0.00], [0.64, 0.57, 0.00],
    [0.44, 0.58, 0.00], [0.56, 0.58, 0.00], // hips
    [0.44, 0.74, 0.03], [0.56, 0.74, 0.03], // knees
    [0.44, 0.90, 0.00], [0.56, 0.90, 0.00], // ankles
    [0.43, 0.92, 0.03], [0.57, 0.92, 0.03], // heels
    [0.45, 0.95, -0.06], [0.55, 0.95, -0.06], // toes
];

/// Offline stand-in for the pose service: a breathing skeleton that waves its
/// left arm and bends its left knee.
pub struct DemoPoseService {
    camera_active: AtomicBool,
    recording: AtomicBool,
    frame: AtomicU64,
}

impl DemoPoseService {
    pub fn new() -> Self {
        Self {
            camera_active: AtomicBool::new(false),
            recording: AtomicBool::new(false),
            frame: AtomicU64::new(0),
        }
    }

    fn synthesize(&self) -> Result<PoseSample, ServiceError> {
        if !self.camera_active.load(Ordering::SeqCst) {
            return Err(ServiceError::Rejected("camera is not active".to_string()));
        }

        let frame = self.frame.fetch_add(1, Ordering::SeqCst) as f64;
        let phase = frame / 30.0 * TAU;
        let mut rng = rand::rng();

        let landmarks = REST_POSE
            .iter()
            .enumerate()
            .map(|(index, &[x, y, z])| {
                let dy = match index {
                    15 | 17 | 19 | 21 => -0.12 * (1.0 + phase.sin()),
                    13 => -0.04 * (1.0 + phase.sin()),
                    25 => -0.05 * (1.0 + (phase * 0.5).cos()),
                    _ => 0.005 * (phase * 0.25).sin(),
                };
                LandmarkPoint::new(
                    x + rng.random_range(-0.003..0.003),
                    y + dy + rng.random_range(-0.003..0.003),
                    z + rng.random_range(-0.01..0.01),
                )
            })
            .collect::<Vec<_>>();

        Ok(PoseSample::try_from(landmarks)?)
    }

    fn latency() -> Duration {
        Duration::from_millis(rand::rng().random_range(5..40))
    }
}

impl Default for DemoPoseService {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseService for DemoPoseService {
    fn start_camera(&self) -> impl Future<Output = Result<(), ServiceError>> + Send {
        let delay = Self::latency();
        async move {
            tokio::time::sleep(delay).await;
            self.camera_active.store(true, Ordering::SeqCst);
            info!("Demo camera started");
            Ok(())
        }
    }

    fn stop_camera(&self) -> impl Future<Output = Result<(), ServiceError>> + Send {
        async move {
            self.camera_active.store(false, Ordering::SeqCst);
            self.recording.store(false, Ordering::SeqCst);
            Ok(())
        }
    }

    fn start_recording(&self) -> impl Future<Output = Result<(), ServiceError>> + Send {
        async move {
            if !self.camera_active.load(Ordering::SeqCst) {
                return Err(ServiceError::Rejected("camera is not active".to_string()));
            }
            self.recording.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn stop_recording(&self) -> impl Future<Output = Result<Option<String>, ServiceError>> + Send {
        async move {
            if !self.recording.swap(false, Ordering::SeqCst) {
                return Err(ServiceError::Rejected("not recording".to_string()));
            }
            Ok(Some(format!("pose_{}.csv", Local::now().format("%Y%m%d_%H%M%S"))))
        }
    }

    fn fetch_pose(&self) -> impl Future<Output = Result<PoseSample, ServiceError>> + Send {
        let delay = Self::latency();
        let pose = self.synthesize();
        async move {
            tokio::time::sleep(delay).await;
            pose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::derive_angles;

    #[test]
    fn pose_requires_active_camera() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let service = DemoPoseService::new();

        assert!(matches!(runtime.block_on(service.fetch_pose()), Err(ServiceError::Rejected(_))));

        runtime.block_on(service.start_camera()).unwrap();
        let pose = runtime.block_on(service.fetch_pose()).unwrap();
        assert_eq!(pose.landmarks().len(), LANDMARK_COUNT);

        let angles = derive_angles(&pose, 0);
        assert!(angles.joint1 > 0.0 && angles.joint3 > 0.0);
    }

    #[test]
    fn recording_round_trip_yields_csv_name() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let service = DemoPoseService::new();

        assert!(runtime.block_on(service.start_recording()).is_err());
        runtime.block_on(service.start_camera()).unwrap();
        runtime.block_on(service.start_recording()).unwrap();

        let filename = runtime.block_on(service.stop_recording()).unwrap().unwrap();
        assert!(filename.starts_with("pose_") && filename.ends_with(".csv"));
        assert!(runtime.block_on(service.stop_recording()).is_err());
    }
}
