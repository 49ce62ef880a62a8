//! Pose-frame derivations: joint-extension proxies for the chart and skeleton
//! geometry for the two 3D views.

use serde::{Deserialize, Serialize};
use crate::types::landmark::{LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST};
use crate::types::{AngleSample, PoseSample};

/// MediaPipe landmark pairs drawn as bones: arms, torso, legs and feet.
pub const POSE_CONNECTIONS: [(usize, usize); 16] = [
    (11, 12), (11, 13), (13, 15), (12, 14), (14, 16),
    (11, 23), (12, 24), (23, 24), (23, 25), (24, 26),
    (25, 27), (26, 28), (27, 29), (28, 30), (29, 31), (30, 32),
];

/// Vertical displacement proxies, scaled by 100.
///
/// These are not angles in degrees. The chart calibration depends on this
/// exact formula:
/// - `joint1`: elbow to wrist (13, 15)
/// - `joint2`: knee to ankle (25, 27)
/// - `joint3`: shoulder to hip (11, 23)
pub fn derive_angles(pose: &PoseSample, timestamp: u64) -> AngleSample {
    let dy = |a: usize, b: usize| (pose.landmark(a).y - pose.landmark(b).y).abs() * 100.0;

    AngleSample::new(
        timestamp,
        dy(LEFT_ELBOW, LEFT_WRIST),
        dy(LEFT_KNEE, LEFT_ANKLE),
        dy(LEFT_SHOULDER, LEFT_HIP),
    )
}

/// Per-axis coordinate series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisSeries<T> {
    pub x: Vec<T>,
    pub y: Vec<T>,
    pub z: Vec<T>,
}

impl<T: Copy> AxisSeries<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            z: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, x: T, y: T, z: T) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Landmark markers plus bone segments. In `segments` every bone is two
/// endpoints followed by a `None` pen-up entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletonGeometry {
    pub points: AxisSeries<f64>,
    pub segments: AxisSeries<Option<f64>>,
}

pub fn build_skeleton_views(pose: &PoseSample) -> SkeletonGeometry {
    let landmarks = pose.landmarks();

    let mut points = AxisSeries::with_capacity(landmarks.len());
    for landmark in landmarks {
        points.push(landmark.x, landmark.y, landmark.z);
    }

    let mut segments = AxisSeries::with_capacity(POSE_CONNECTIONS.len() * 3);
    for &(from, to) in POSE_CONNECTIONS.iter() {
        let a = pose.landmark(from);
        let b = pose.landmark(to);
        segments.push(Some(a.x), Some(a.y), Some(a.z));
        segments.push(Some(b.x), Some(b.y), Some(b.z));
        segments.push(None, None, None);
    }

    SkeletonGeometry { points, segments }
}

/// Camera and axis ranges of one 3D view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewDescriptor {
    pub eye: [f64; 3],
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    pub z_range: [f64; 2],
}

impl ViewDescriptor {
    pub fn front_right() -> Self {
        Self::with_eye([1.5, 1.5, 1.5])
    }

    pub fn front_left() -> Self {
        Self::with_eye([-1.5, 1.5, 1.5])
    }

    fn with_eye(eye: [f64; 3]) -> Self {
        Self {
            eye,
            x_range: [0.0, 1.0],
            y_range: [0.0, 1.0],
            z_range: [-0.5, 0.5],
        }
    }

    /// Orthographic projection onto the image plane of a camera at `eye`
    /// looking at the centre of the axis-range cube, `+z` up.
    pub fn project(&self, point: [f64; 3]) -> [f64; 2] {
        let unit = [
            to_unit(point[0], self.x_range),
            to_unit(point[1], self.y_range),
            to_unit(point[2], self.z_range),
        ];
        let (right, up) = self.camera_basis();
        [dot(unit, right), dot(unit, up)]
    }

    /// Splits a pen-up separated segment series into projected polylines.
    pub fn project_strips(&self, segments: &AxisSeries<Option<f64>>) -> Vec<Vec<[f64; 2]>> {
        let mut strips = Vec::new();
        let mut current = Vec::new();

        for i in 0..segments.len() {
            match (segments.x[i], segments.y[i], segments.z[i]) {
                (Some(x), Some(y), Some(z)) => current.push(self.project([x, y, z])),
                _ => {
                    if !current.is_empty() {
                        strips.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            strips.push(current);
        }
        strips
    }

    pub fn is_valid(&self) -> bool {
        let range_ok = |r: [f64; 2]| r[1] > r[0];
        normalize(self.eye).is_some()
            && range_ok(self.x_range)
            && range_ok(self.y_range)
            && range_ok(self.z_range)
    }

    fn camera_basis(&self) -> ([f64; 3], [f64; 3]) {
        let forward = normalize([-self.eye[0], -self.eye[1], -self.eye[2]]).unwrap_or([0.0, -1.0, 0.0]);
        let right = normalize(cross(forward, [0.0, 0.0, 1.0])).unwrap_or([1.0, 0.0, 0.0]);
        let up = cross(right, forward);
        (right, up)
    }
}

fn to_unit(value: f64, range: [f64; 2]) -> f64 {
    let span = range[1] - range[0];
    if span <= 0.0 {
        return 0.0;
    }
    (value - range[0]) / span - 0.5
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f64; 3]) -> Option<[f64; 3]> {
    let length = dot(v, v).sqrt();
    if length < 1e-12 {
        return None;
    }
    Some([v[0] / length, v[1] / length, v[2] / length])
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use crate::types::{LandmarkPoint, LANDMARK_COUNT};

    fn pose_with(overrides: &[(usize, f64)]) -> PoseSample {
        let mut landmarks: Vec<LandmarkPoint> = (0..LANDMARK_COUNT)
            .map(|i| LandmarkPoint::new(i as f64 / 40.0, 0.5, 0.0))
            .collect();
        for &(index, y) in overrides {
            landmarks[index].y = y;
        }
        PoseSample::try_from(landmarks).unwrap()
    }

    #[test]
    fn elbow_wrist_displacement_scales_by_hundred() {
        let pose = pose_with(&[(13, 0.2), (15, 0.5)]);
        let angles = derive_angles(&pose, 7);
        assert_eq!(angles.timestamp, 7);
        assert_approx_eq!(angles.joint1, 30.0, 1e-9);
        assert_approx_eq!(angles.joint2, 0.0, 1e-9);
        assert_approx_eq!(angles.joint3, 0.0, 1e-9);
    }

    #[test]
    fn all_three_channels_use_absolute_difference() {
        let pose = pose_with(&[(25, 0.9), (27, 0.6), (11, 0.3), (23, 0.75)]);
        let angles = derive_angles(&pose, 0);
        assert_approx_eq!(angles.joint2, 30.0, 1e-9);
        assert_approx_eq!(angles.joint3, 45.0, 1e-9);
    }

    #[test]
    fn derivation_is_pure() {
        let pose = pose_with(&[(13, 0.12), (15, 0.81), (25, 0.4)]);
        assert_eq!(derive_angles(&pose, 3), derive_angles(&pose, 3));
        assert_eq!(build_skeleton_views(&pose), build_skeleton_views(&pose));
    }

    #[test]
    fn segments_carry_pen_up_separators() {
        let pose = pose_with(&[]);
        let geometry = build_skeleton_views(&pose);

        assert_eq!(geometry.points.len(), LANDMARK_COUNT);
        assert_eq!(geometry.segments.len(), POSE_CONNECTIONS.len() * 3);
        for (i, x) in geometry.segments.x.iter().enumerate() {
            assert_eq!(x.is_none(), i % 3 == 2, "entry {}", i);
        }
        // second bone is shoulder (11) to elbow (13)
        assert_eq!(geometry.segments.x[3], Some(pose.landmark(11).x));
        assert_eq!(geometry.segments.x[4], Some(pose.landmark(13).x));
    }

    #[test]
    fn strips_split_at_every_separator() {
        let pose = pose_with(&[]);
        let geometry = build_skeleton_views(&pose);
        let strips = ViewDescriptor::front_right().project_strips(&geometry.segments);
        assert_eq!(strips.len(), POSE_CONNECTIONS.len());
        assert!(strips.iter().all(|strip| strip.len() == 2));
    }

    #[test]
    fn cube_centre_projects_to_origin() {
        for view in [ViewDescriptor::front_right(), ViewDescriptor::front_left()] {
            let [u, v] = view.project([0.5, 0.5, 0.0]);
            assert_approx_eq!(u, 0.0, 1e-12);
            assert_approx_eq!(v, 0.0, 1e-12);
        }
    }

    #[test]
    fn default_views_mirror_the_y_axis() {
        let right = ViewDescriptor::front_right().project([0.5, 0.8, 0.0]);
        let left = ViewDescriptor::front_left().project([0.5, 0.8, 0.0]);
        assert_approx_eq!(right[0], -left[0], 1e-12);
        assert_approx_eq!(right[1], left[1], 1e-12);
        assert!(right[0].abs() > 0.1);
    }

    #[test]
    fn z_axis_points_up_on_screen() {
        let [_, v] = ViewDescriptor::front_right().project([0.5, 0.5, 0.4]);
        assert!(v > 0.0);
    }

    #[test]
    fn eye_on_up_axis_still_projects() {
        let view = ViewDescriptor { eye: [0.0, 0.0, 2.0], ..ViewDescriptor::front_right() };
        assert!(view.is_valid());
        let [u, v] = view.project([1.0, 0.5, 0.0]);
        assert!(u.is_finite() && v.is_finite());
    }

    #[test]
    fn degenerate_descriptor_is_invalid() {
        let zero_eye = ViewDescriptor { eye: [0.0, 0.0, 0.0], ..ViewDescriptor::front_right() };
        let flat_range = ViewDescriptor { z_range: [0.5, 0.5], ..ViewDescriptor::front_right() };
        assert!(!zero_eye.is_valid());
        assert!(!flat_range.is_valid());
    }
}
