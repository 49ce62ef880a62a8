use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Active,
    Recording,
    Error,
    Info,
}

impl StatusKind {
    /// Recording messages stay until replaced.
    pub fn is_persistent(self) -> bool {
        matches!(self, StatusKind::Recording)
    }

    pub fn color(self) -> [u8; 3] {
        match self {
            StatusKind::Active => [0, 150, 0],
            StatusKind::Recording => [200, 0, 0],
            StatusKind::Error => [180, 60, 0],
            StatusKind::Info => [80, 80, 80],
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub shown_at: Instant,
}

/// The single status line of the dashboard.
#[derive(Debug)]
pub struct StatusNotifier {
    current: Option<StatusMessage>,
    display_duration: Duration,
}

impl StatusNotifier {
    pub fn new(display_duration: Duration) -> Self {
        Self {
            current: None,
            display_duration,
        }
    }

    pub fn show(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.current = Some(StatusMessage {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        });
    }

    pub fn visible(&self) -> Option<&StatusMessage> {
        self.visible_at(Instant::now())
    }

    pub fn visible_at(&self, now: Instant) -> Option<&StatusMessage> {
        self.current.as_ref().filter(|message| {
            message.kind.is_persistent()
                || now.saturating_duration_since(message.shown_at) < self.display_duration
        })
    }

    /// Latest message whether or not it has expired.
    pub fn last(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_message_expires() {
        let mut status = StatusNotifier::new(Duration::from_secs(3));
        status.show("Camera started", StatusKind::Active);
        let shown_at = status.last().unwrap().shown_at;

        assert!(status.visible_at(shown_at + Duration::from_secs(2)).is_some());
        assert!(status.visible_at(shown_at + Duration::from_secs(3)).is_none());
        assert_eq!(status.last().unwrap().text, "Camera started");
    }

    #[test]
    fn recording_message_persists() {
        let mut status = StatusNotifier::new(Duration::from_secs(3));
        status.show("Recording...", StatusKind::Recording);
        let shown_at = status.last().unwrap().shown_at;
        assert!(status.visible_at(shown_at + Duration::from_secs(600)).is_some());
    }

    #[test]
    fn new_message_replaces_persistent_one() {
        let mut status = StatusNotifier::new(Duration::from_millis(500));
        status.show("Recording...", StatusKind::Recording);
        status.show("Recording saved: a.csv", StatusKind::Active);

        let message = status.last().unwrap();
        assert_eq!(message.kind, StatusKind::Active);
        assert!(status.visible_at(message.shown_at).is_some());
        assert!(status.visible_at(message.shown_at + Duration::from_millis(600)).is_none());
    }
}
