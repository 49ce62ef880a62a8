use std::future::Future;
use std::sync::Arc;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use log::{debug, info, warn};
use tokio::runtime::Handle;

use crate::buffer::RollingSeriesBuffer;
use crate::config::AppConfig;
use crate::polling::PollingLoop;
use crate::pose::{build_skeleton_views, derive_angles, SkeletonGeometry};
use crate::service::PoseService;
use crate::types::{ControlState, PollStats, PoseSample, ServiceEvent, SessionState};
use super::status::{StatusKind, StatusNotifier};

/// Owner of all dashboard state.
///
/// Requests run as tasks on the tokio runtime and report back over channels;
/// nothing changes until [`process_events`](Self::process_events) applies
/// them on the owning thread. Control responses have their own unbounded
/// channel so a backlog of pose ticks can never push one out.
pub struct SessionController<S: PoseService> {
    service: Arc<S>,
    runtime: Handle,
    state: SessionState,
    camera_start_pending: bool,
    buffer: RollingSeriesBuffer,
    polling: PollingLoop,
    geometry: Option<SkeletonGeometry>,
    status: StatusNotifier,
    stats: PollStats,
    renders: u64,
    control_sender: Sender<ServiceEvent>,
    control_receiver: Receiver<ServiceEvent>,
    pose_sender: Sender<ServiceEvent>,
    pose_receiver: Receiver<ServiceEvent>,
}

impl<S: PoseService> SessionController<S> {
    pub fn new(service: S, runtime: Handle, config: &AppConfig) -> Self {
        let (control_sender, control_receiver) = unbounded();
        let (pose_sender, pose_receiver) = bounded(config.channels.event_channel_capacity);

        Self {
            service: Arc::new(service),
            runtime,
            state: SessionState::default(),
            camera_start_pending: false,
            buffer: RollingSeriesBuffer::new(config.chart.max_data_points),
            polling: PollingLoop::new(config.polling_interval()),
            geometry: None,
            status: StatusNotifier::new(config.status_duration()),
            stats: PollStats::default(),
            renders: 0,
            control_sender,
            control_receiver,
            pose_sender,
            pose_receiver,
        }
    }

    pub fn toggle_camera(&mut self) {
        if self.state.camera_active {
            self.stop_camera();
        } else {
            self.start_camera();
        }
    }

    pub fn start_camera(&mut self) {
        if self.camera_start_pending {
            debug!("Camera start already in flight");
            return;
        }
        if self.state.camera_active {
            debug!("Camera already active");
            return;
        }

        self.camera_start_pending = true;
        info!("Requesting camera start");
        self.dispatch(|service| async move { ServiceEvent::CameraStarted(service.start_camera().await) });
    }

    /// Takes effect locally at once; the remote outcome is only logged.
    pub fn stop_camera(&mut self) {
        // no delivery can happen once this returns
        self.polling.stop();
        self.state.camera_active = false;
        self.state.recording = false;
        self.geometry = None;
        self.status.show("Camera stopped", StatusKind::Info);

        info!("Requesting camera stop");
        self.dispatch(|service| async move { ServiceEvent::CameraStopped(service.stop_camera().await) });
    }

    pub fn start_recording(&mut self) {
        if !self.state.camera_active {
            warn!("Recording requested while camera is inactive");
            return;
        }
        if self.state.recording {
            debug!("Already recording");
            return;
        }

        info!("Requesting recording start");
        self.dispatch(|service| async move { ServiceEvent::RecordingStarted(service.start_recording().await) });
    }

    pub fn stop_recording(&mut self) {
        if !self.state.recording {
            warn!("Stop requested while not recording");
            return;
        }

        info!("Requesting recording stop");
        self.dispatch(|service| async move { ServiceEvent::RecordingStopped(service.stop_recording().await) });
    }

    /// Applies every pending response and pose tick. Returns how many were handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;

        // control responses first, they may start or stop polling
        while let Ok(event) = self.control_receiver.try_recv() {
            self.handle_event(event);
            handled += 1;
        }

        while let Ok(event) = self.pose_receiver.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    pub fn shutdown(&mut self) {
        self.polling.stop();
        info!(
            "Session closed: {} pose ticks rendered, {} failed, {} stale",
            self.stats.succeeded, self.stats.failed, self.stats.stale
        );
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn controls(&self) -> ControlState {
        ControlState::derive(self.state, self.camera_start_pending)
    }

    /// Read-only view of the angle window.
    pub fn buffer(&self) -> &RollingSeriesBuffer {
        &self.buffer
    }

    /// Skeleton geometry of the latest rendered tick.
    pub fn geometry(&self) -> Option<&SkeletonGeometry> {
        self.geometry.as_ref()
    }

    pub fn status(&self) -> &StatusNotifier {
        &self.status
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Number of ticks that produced a fresh render.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn is_polling(&self) -> bool {
        self.polling.is_polling()
    }

    pub fn video_feed_url(&self) -> Option<String> {
        if self.state.camera_active {
            self.service.video_feed_url()
        } else {
            None
        }
    }

    fn dispatch<F, Fut>(&self, request: F)
    where
        F: FnOnce(Arc<S>) -> Fut + Send + 'static,
        Fut: Future<Output = ServiceEvent> + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let sender = self.control_sender.clone();
        self.runtime.spawn(async move {
            let event = request(service).await;
            // only fails once the controller is gone
            if sender.send(event).is_err() {
                debug!("Service response arrived after shutdown");
            }
        });
    }

    fn start_polling(&mut self) {
        let service = Arc::clone(&self.service);
        let sender = self.pose_sender.clone();

        self.polling.start(
            &self.runtime,
            move || {
                let service = Arc::clone(&service);
                async move { service.fetch_pose().await }
            },
            move |generation, result| {
                // a full queue means the window is not drawing, the next tick replaces this one
                match sender.try_send(ServiceEvent::PoseFetched { generation, result }) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => debug!("Pose queue full, dropping tick"),
                    Err(TrySendError::Disconnected(_)) => debug!("Pose tick arrived after shutdown"),
                }
            },
        );
    }

    fn handle_event(&mut self, event: ServiceEvent) {
        match event {
            ServiceEvent::CameraStarted(result) => {
                self.camera_start_pending = false;
                match result {
                    Ok(()) => {
                        self.state.camera_active = true;
                        self.start_polling();
                        self.status.show("Camera started", StatusKind::Active);
                        info!("Camera started");
                    }
                    Err(e) => {
                        self.status.show(format!("Unable to start camera: {}", e), StatusKind::Error);
                        warn!("Camera start failed: {}", e);
                    }
                }
            }
            ServiceEvent::CameraStopped(result) => match result {
                Ok(()) => info!("Camera stopped"),
                Err(e) => warn!("Camera stop request failed: {}", e),
            },
            ServiceEvent::RecordingStarted(result) => match result {
                // a new recording starts from an empty chart
                Ok(()) if self.state.camera_active => {
                    self.buffer.reset();
                    self.state.recording = true;
                    self.status.show("Recording in progress", StatusKind::Recording);
                    info!("Recording started, chart window reset");
                }
                Ok(()) => warn!("Recording start confirmed after camera stop, ignoring"),
                Err(e) => {
                    self.status.show(format!("Unable to start recording: {}", e), StatusKind::Error);
                    warn!("Recording start failed: {}", e);
                }
            },
            ServiceEvent::RecordingStopped(result) => match result {
                Ok(filename) => {
                    self.state.recording = false;
                    let message = match filename {
                        Some(name) => format!("Recording saved: {}", name),
                        None => "Recording saved".to_string(),
                    };
                    info!("{}", message);
                    self.status.show(message, StatusKind::Active);
                }
                Err(e) => {
                    self.status.show(format!("Unable to stop recording: {}", e), StatusKind::Error);
                    warn!("Recording stop failed: {}", e);
                }
            },
            ServiceEvent::PoseFetched { generation, result } => {
                // queued before the last stop or restart
                if self.polling.generation() != Some(generation) {
                    self.stats.stale += 1;
                    debug!("Discarded pose tick from generation {}", generation);
                    return;
                }
                match result {
                    Ok(pose) => self.render_pose(&pose),
                    Err(e) => {
                        self.stats.failed += 1;
                        warn!("Pose fetch failed: {}", e);
                    }
                }
            }
        }
    }

    fn render_pose(&mut self, pose: &PoseSample) {
        // angles go to the chart, the full skeleton to both views
        let sample = derive_angles(pose, self.buffer.next_timestamp());
        self.buffer.append(sample);
        self.geometry = Some(build_skeleton_views(pose));
        self.stats.succeeded += 1;
        self.renders += 1;
    }
}
