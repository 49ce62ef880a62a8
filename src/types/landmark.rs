use serde::{Deserialize, Serialize};

/// Number of landmarks in a MediaPipe pose estimation frame.
pub const LANDMARK_COUNT: usize = 33;

pub const LEFT_SHOULDER: usize = 11;
pub const LEFT_ELBOW: usize = 13;
pub const LEFT_WRIST: usize = 15;
pub const LEFT_HIP: usize = 23;
pub const LEFT_KNEE: usize = 25;
pub const LEFT_ANKLE: usize = 27;

/// One normalized body landmark. Extra fields such as `visibility` are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PoseError {
    #[error("expected at least {expected} landmarks, found {found}")]
    TooFewLandmarks { expected: usize, found: usize },
}

/// Landmarks of a single estimation frame, indexed by the MediaPipe pose convention.
///
/// Holding a `PoseSample` means every index below [`LANDMARK_COUNT`] is present.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseSample {
    landmarks: Vec<LandmarkPoint>,
}

impl PoseSample {
    pub fn landmarks(&self) -> &[LandmarkPoint] {
        &self.landmarks
    }

    /// Landmark at a pose index. Indices at or above [`LANDMARK_COUNT`] are not guaranteed.
    pub fn landmark(&self, index: usize) -> &LandmarkPoint {
        &self.landmarks[index]
    }
}

impl TryFrom<Vec<LandmarkPoint>> for PoseSample {
    type Error = PoseError;

    fn try_from(landmarks: Vec<LandmarkPoint>) -> Result<Self, Self::Error> {
        if landmarks.len() < LANDMARK_COUNT {
            return Err(PoseError::TooFewLandmarks {
                expected: LANDMARK_COUNT,
                found: landmarks.len(),
            });
        }
        Ok(Self { landmarks })
    }
}
