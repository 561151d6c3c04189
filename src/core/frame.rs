use std::time::Duration;

/// Frame - timing of one render step handed to the frame callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Zero-based invocation number
    pub number: u64,
    /// Elapsed time, never decreases
    pub time: Duration,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl Frame {
    pub fn new(number: u64, time: Duration, delta: f32) -> Self {
        Self { number, time, delta }
    }

    /// Elapsed time in seconds
    pub fn seconds(&self) -> f32 {
        self.time.as_secs_f32()
    }

    /// Elapsed time in milliseconds, kept in f64 so long uptimes stay smooth
    pub fn millis(&self) -> f64 {
        self.time.as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_new() {
        let frame = Frame::new(3, Duration::from_millis(1500), 0.016);
        assert_eq!(frame.number, 3);
        assert_eq!(frame.seconds(), 1.5);
        assert_eq!(frame.delta, 0.016);
    }

    #[test]
    fn test_frame_millis() {
        let frame = Frame::new(0, Duration::from_secs(2), 0.0);
        assert_eq!(frame.millis(), 2000.0);
    }

    #[test]
    fn test_millis_resolve_single_steps_after_hours() {
        let hours = Duration::from_secs(10 * 3600);
        let a = Frame::new(0, hours, 0.0);
        let b = Frame::new(1, hours + Duration::from_millis(1), 0.001);

        assert!((b.millis() - a.millis() - 1.0).abs() < 1e-6);
    }
}
