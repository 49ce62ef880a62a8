use serde::Deserialize;
use crate::types::{LandmarkPoint, PoseSample};
use super::ServiceError;

const SUCCESS: &str = "success";

/// Body of the camera and recording control endpoints.
#[derive(Debug, Deserialize)]
pub struct ControlResponse {
    pub status: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `/pose_data`.
#[derive(Debug, Deserialize)]
pub struct PoseResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<Vec<LandmarkPoint>>,
    #[serde(default)]
    pub message: Option<String>,
}

fn rejected(status: String, message: Option<String>) -> ServiceError {
    match message {
        Some(message) => ServiceError::Rejected(format!("{} ({})", status, message)),
        None => ServiceError::Rejected(status),
    }
}

pub fn parse_control_response(payload: &[u8]) -> Result<ControlResponse, ServiceError> {
    let response: ControlResponse = serde_json::from_slice(payload)
        .map_err(|e| ServiceError::Malformed(format!("control JSON parsing error: {}", e)))?;

    if response.status != SUCCESS {
        return Err(rejected(response.status, response.message));
    }
    Ok(response)
}

pub fn parse_pose_response(payload: &[u8]) -> Result<PoseSample, ServiceError> {
    let response: PoseResponse = serde_json::from_slice(payload)
        .map_err(|e| ServiceError::Malformed(format!("pose JSON parsing error: {}", e)))?;

    if response.status != SUCCESS {
        return Err(rejected(response.status, response.message));
    }

    let landmarks = response
        .data
        .ok_or_else(|| ServiceError::Malformed("pose response has no landmark data".to_string()))?;
    Ok(PoseSample::try_from(landmarks)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::types::{PoseError, LANDMARK_COUNT};

    fn landmarks(count: usize) -> serde_json::Value {
        let points: Vec<_> = (0..count)
            .map(|i| json!({"x": 0.5, "y": i as f64 / 100.0, "z": 0.0, "visibility": 0.9}))
            .collect();
        json!(points)
    }

    #[test]
    fn stop_recording_exposes_filename() {
        let body = br#"{"status": "success", "filename": "session1.csv"}"#;
        let response = parse_control_response(body).unwrap();
        assert_eq!(response.filename.as_deref(), Some("session1.csv"));
    }

    #[test]
    fn non_success_status_is_rejected_with_message() {
        let body = br#"{"status": "error", "message": "camera busy"}"#;
        match parse_control_response(body) {
            Err(ServiceError::Rejected(reason)) => assert_eq!(reason, "error (camera busy)"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_status_is_malformed() {
        assert!(matches!(parse_control_response(b"{}"), Err(ServiceError::Malformed(_))));
        assert!(matches!(parse_control_response(b"<html>"), Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn pose_payload_becomes_sample() {
        let body = json!({"status": "success", "data": landmarks(LANDMARK_COUNT)}).to_string();
        let pose = parse_pose_response(body.as_bytes()).unwrap();
        assert_eq!(pose.landmarks().len(), LANDMARK_COUNT);
        assert_eq!(pose.landmark(12).y, 0.12);
    }

    #[test]
    fn short_pose_payload_is_malformed() {
        let body = json!({"status": "success", "data": landmarks(12)}).to_string();
        match parse_pose_response(body.as_bytes()) {
            Err(ServiceError::Pose(PoseError::TooFewLandmarks { found, .. })) => assert_eq!(found, 12),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn pose_without_data_is_malformed() {
        let null_data = br#"{"status": "success", "data": null}"#;
        let no_data = br#"{"status": "success"}"#;
        assert!(matches!(parse_pose_response(null_data), Err(ServiceError::Malformed(_))));
        assert!(matches!(parse_pose_response(no_data), Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn failed_pose_status_is_rejected() {
        let body = json!({"status": "error", "data": landmarks(LANDMARK_COUNT)}).to_string();
        assert!(matches!(parse_pose_response(body.as_bytes()), Err(ServiceError::Rejected(_))));
    }
}
