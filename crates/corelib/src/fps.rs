/// Seconds between FPS reports.
pub const DEFAULT_UPDATE_INTERVAL: f32 = 0.2;

/// Averages frame rate over a fixed interval.
#[derive(Clone, Copy, Debug)]
pub struct FpsCounter {
    interval: f32,
    accumulated: f32,
    frames: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_INTERVAL)
    }
}

impl FpsCounter {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulated: 0.0,
            frames: 0,
        }
    }

    /// Registers one frame of `dt` seconds. Returns the averaged FPS once per interval.
    pub fn tick(&mut self, dt: f32) -> Option<u32> {
        self.accumulated += dt;
        self.frames += 1;
        if self.accumulated < self.interval {
            return None;
        }
        let fps = (self.frames as f32 / self.accumulated).round() as u32;
        self.accumulated = 0.0;
        self.frames = 0;
        Some(fps)
    }
}

pub fn title_with_fps(title: &str, fps: u32) -> String {
    format!("{title} - FPS: {fps}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_after_interval() {
        let mut c = FpsCounter::default();
        assert_eq!(c.tick(0.1), None);
        assert_eq!(c.tick(0.1), Some(10));
        // Counter restarts after reporting.
        assert_eq!(c.tick(0.05), None);
    }

    #[test]
    fn rounds_average() {
        let mut c = FpsCounter::new(1.0);
        for _ in 0..59 {
            assert_eq!(c.tick(1.0 / 60.0), None);
        }
        assert_eq!(c.tick(1.0 / 60.0 + 0.001), Some(60));
    }

    #[test]
    fn title_format() {
        assert_eq!(title_with_fps("lumen3d", 144), "lumen3d - FPS: 144");
    }
}
