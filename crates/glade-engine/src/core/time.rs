/// Turns host frame timestamps into per-frame delta time.
///
/// The first frame has no predecessor, so it uses a nominal delta. Later
/// deltas are capped so a long stall (tab in background, debugger pause)
/// does not launch bodies through walls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
    first_frame_dt: f32,
    max_dt: f32,
    elapsed: f64,
    frames: u64,
}

impl FrameClock {
    pub fn new(first_frame_dt: f32, max_dt: f32) -> Self {
        Self {
            last_timestamp: None,
            first_frame_dt,
            max_dt,
            elapsed: 0.0,
            frames: 0,
        }
    }

    /// Feed a timestamp in milliseconds. Returns the delta in seconds.
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_timestamp {
            None => self.first_frame_dt,
            Some(prev) => (((timestamp_ms - prev) / 1000.0) as f32).clamp(0.0, self.max_dt),
        };
        self.last_timestamp = Some(timestamp_ms);
        self.elapsed += dt as f64;
        self.frames += 1;
        dt
    }

    /// Forget the last timestamp, e.g. after the host resumes from a pause.
    pub fn reset(&mut self) {
        self.last_timestamp = None;
    }

    /// Simulated seconds since the first frame.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_uses_nominal_dt() {
        let mut clock = FrameClock::new(1.0 / 60.0, 0.1);
        assert_eq!(clock.tick(12_345.0), 1.0 / 60.0);
    }

    #[test]
    fn deltas_follow_timestamps() {
        let mut clock = FrameClock::new(1.0 / 60.0, 0.1);
        clock.tick(1000.0);
        let dt = clock.tick(1020.0);
        assert!((dt - 0.02).abs() < 1e-6);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn long_stalls_are_capped() {
        let mut clock = FrameClock::new(1.0 / 60.0, 0.1);
        clock.tick(0.0);
        assert_eq!(clock.tick(5000.0), 0.1);
    }

    #[test]
    fn backwards_timestamps_clamp_to_zero() {
        let mut clock = FrameClock::new(1.0 / 60.0, 0.1);
        clock.tick(500.0);
        assert_eq!(clock.tick(400.0), 0.0);
    }

    #[test]
    fn reset_restarts_with_nominal_dt() {
        let mut clock = FrameClock::new(0.02, 0.1);
        clock.tick(0.0);
        clock.reset();
        assert_eq!(clock.tick(90_000.0), 0.02);
    }
}
