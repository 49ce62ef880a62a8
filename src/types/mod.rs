pub mod landmark;
pub mod angle_sample;
pub mod session;
pub mod events;

pub use landmark::{LandmarkPoint, PoseError, PoseSample, LANDMARK_COUNT};
pub use angle_sample::{AngleChannel, AngleSample};
pub use session::{ControlState, PollStats, SessionState};
pub use events::ServiceEvent;
