/// Derived joint-extension proxies for one pose frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSample {
    /// Logical sequence number assigned by the rolling buffer, not wall-clock.
    pub timestamp: u64,
    pub joint1: f64,
    pub joint2: f64,
    pub joint3: f64,
}

impl AngleSample {
    pub fn new(timestamp: u64, joint1: f64, joint2: f64, joint3: f64) -> Self {
        Self { timestamp, joint1, joint2, joint3 }
    }

    pub fn value(&self, channel: AngleChannel) -> f64 {
        match channel {
            AngleChannel::Joint1 => self.joint1,
            AngleChannel::Joint2 => self.joint2,
            AngleChannel::Joint3 => self.joint3,
        }
    }
}

/// One line of the angle chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleChannel {
    Joint1,
    Joint2,
    Joint3,
}

impl AngleChannel {
    pub const ALL: [AngleChannel; 3] = [AngleChannel::Joint1, AngleChannel::Joint2, AngleChannel::Joint3];

    pub fn label(self) -> &'static str {
        match self {
            AngleChannel::Joint1 => "angle 1",
            AngleChannel::Joint2 => "angle 2",
            AngleChannel::Joint3 => "angle 3",
        }
    }
}
