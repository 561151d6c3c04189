/// Self-contained timers - accumulate delta time and decide when to fire

/// Throttled timer - minimum interval between fires
#[derive(Debug, Clone, Copy)]
pub struct Throttled {
    min_interval: f32,
    time_since_last: f32,
}

impl Throttled {
    /// Create throttled timer with minimum interval
    pub fn new(min_interval: f32) -> Self {
        Self {
            min_interval,
            time_since_last: 0.0,
        }
    }

    /// Attempt to fire, returns true if enough time has passed
    pub fn try_tick(&mut self, delta: f32) -> bool {
        self.time_since_last += delta;

        if self.time_since_last >= self.min_interval {
            self.time_since_last = 0.0;
            true
        } else {
            false
        }
    }
}

/// Frames-per-second counter that reports once per interval
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    window: Throttled,
    frames: u32,
    elapsed: f32,
}

impl FpsCounter {
    /// Create counter reporting every `interval` seconds
    pub fn new(interval: f32) -> Self {
        Self {
            window: Throttled::new(interval),
            frames: 0,
            elapsed: 0.0,
        }
    }

    /// Record one frame, returns the new rate when a report is due
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if !self.window.try_tick(delta) {
            return None;
        }

        let fps = self.frames as f32 / self.elapsed;
        self.frames = 0;
        self.elapsed = 0.0;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttled_enforces_minimum() {
        let mut timer = Throttled::new(0.1);

        assert!(!timer.try_tick(0.05)); // Too soon
        assert!(timer.try_tick(0.06)); // Enough time
        assert!(!timer.try_tick(0.05)); // Reset after fire
    }

    #[test]
    fn fps_counter_reports_once_per_interval() {
        let mut counter = FpsCounter::new(1.0);

        for _ in 0..59 {
            assert_eq!(counter.tick(1.0 / 60.0), None);
        }

        // 60th frame crosses the one second boundary (allow float slack)
        let reported = counter.tick(1.0 / 60.0 + 1e-4).map(|fps| fps.round());
        assert_eq!(reported, Some(60.0));
    }

    #[test]
    fn fps_counter_restarts_after_report() {
        let mut counter = FpsCounter::new(0.5);
        assert!(counter.tick(0.5).is_some());

        assert_eq!(counter.tick(0.25), None);
        assert_eq!(counter.tick(0.25), Some(4.0));
    }
}
