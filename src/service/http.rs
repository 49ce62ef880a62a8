use std::future::Future;
use std::time::Duration;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};

use crate::config::ServiceConfig;
use crate::types::PoseSample;
use super::wire::{parse_control_response, parse_pose_response, ControlResponse};
use super::{PoseService, ServiceError};

/// `PoseService` over the dashboard's HTTP endpoints.
pub struct HttpPoseService {
    client: Client,
    base_url: String,
    video_feed_path: String,
}

impl HttpPoseService {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            video_feed_path: config.video_feed_path.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ServiceError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::HttpStatus(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn post_control(&self, path: &str) -> Result<ControlResponse, ServiceError> {
        debug!("POST {}", path);
        let body = self.send(self.client.post(self.url(path))).await?;
        parse_control_response(&body).map_err(|e| {
            warn!("{} failed: {}", path, e);
            e
        })
    }
}

impl PoseService for HttpPoseService {
    fn start_camera(&self) -> impl Future<Output = Result<(), ServiceError>> + Send {
        async move { self.post_control("/start_camera").await.map(|_| ()) }
    }

    fn stop_camera(&self) -> impl Future<Output = Result<(), ServiceError>> + Send {
        async move { self.post_control("/stop_camera").await.map(|_| ()) }
    }

    fn start_recording(&self) -> impl Future<Output = Result<(), ServiceError>> + Send {
        async move { self.post_control("/start_recording").await.map(|_| ()) }
    }

    fn stop_recording(&self) -> impl Future<Output = Result<Option<String>, ServiceError>> + Send {
        async move {
            let response = self.post_control("/stop_recording").await?;
            Ok(response.filename)
        }
    }

    fn fetch_pose(&self) -> impl Future<Output = Result<PoseSample, ServiceError>> + Send {
        async move {
            let body = self.send(self.client.get(self.url("/pose_data"))).await?;
            parse_pose_response(&body)
        }
    }

    fn video_feed_url(&self) -> Option<String> {
        Some(self.url(&self.video_feed_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_double_slashes() {
        let config = ServiceConfig {
            base_url: "http://127.0.0.1:5000/".to_string(),
            ..ServiceConfig::default()
        };
        let service = HttpPoseService::new(&config).unwrap();
        assert_eq!(service.url("/pose_data"), "http://127.0.0.1:5000/pose_data");
        assert_eq!(service.video_feed_url().as_deref(), Some("http://127.0.0.1:5000/video_feed"));
    }

    #[test]
    fn unreachable_service_is_a_transport_error() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let config = ServiceConfig {
            // port 9 (discard) on localhost is closed on test machines
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_ms: 500,
            ..ServiceConfig::default()
        };
        let service = HttpPoseService::new(&config).unwrap();
        let result = runtime.block_on(service.fetch_pose());
        assert!(matches!(result, Err(ServiceError::Transport(_))));
    }
}
