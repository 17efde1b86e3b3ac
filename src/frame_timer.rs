use std::time::{Duration, Instant};

/// Longest FPS averaging window accepted.
const MAX_FPS_INTERVAL: f64 = 10.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameTick {
    /// Seconds since the previous tick, clamped to the configured maximum.
    pub delta: f32,
    /// Set once per measurement interval.
    pub fps: Option<f64>,
}

/// Measures frame durations and a running frames-per-second figure.
#[derive(Debug)]
pub struct FrameTimer {
    last_frame: Option<Instant>,
    interval: f64,
    max_frame_time: f32,
    window_start: Option<Instant>,
    frames: u32,
    fps: f64,
}

impl FrameTimer {
    pub fn new(fps_interval: f64, max_frame_time: f32) -> Self {
        FrameTimer {
            last_frame: None,
            interval: fps_interval.clamp(0.0, MAX_FPS_INTERVAL),
            max_frame_time: max_frame_time.max(0.0),
            window_start: None,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Registers a frame at `now`. The first tick only starts the clock and
    /// reports a zero delta.
    pub fn tick(&mut self, now: Instant) -> FrameTick {
        let delta = match self.last_frame {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last_frame = Some(now);

        let window_start = *self.window_start.get_or_insert(now);
        let elapsed = now.saturating_duration_since(window_start);
        let fps = if elapsed > Duration::ZERO && elapsed.as_secs_f64() > self.interval {
            self.fps = f64::from(self.frames) / elapsed.as_secs_f64();
            self.frames = 0;
            self.window_start = Some(now);
            Some(self.fps)
        } else {
            self.frames += 1;
            None
        };

        FrameTick {
            delta: delta.min(self.max_frame_time),
            fps,
        }
    }

    /// Last measured frames per second.
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

pub fn fps_title(title: &str, fps: f64) -> String {
    format!("{} || Frames per second: {:.1}", title, fps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn delta_is_time_since_last_tick() {
        let mut timer = FrameTimer::new(1.0, 0.5);
        let start = Instant::now();

        assert_eq!(timer.tick(start).delta, 0.0);
        let tick = timer.tick(start + Duration::from_millis(20));
        assert_abs_diff_eq!(tick.delta, 0.02, epsilon = 1e-6);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut timer = FrameTimer::new(1.0, 0.1);
        let start = Instant::now();
        timer.tick(start);
        let tick = timer.tick(start + Duration::from_secs(3));
        assert_abs_diff_eq!(tick.delta, 0.1);
    }

    #[test]
    fn fps_is_reported_once_per_interval() {
        let mut timer = FrameTimer::new(1.0, 0.1);
        let start = Instant::now();
        let mut reports = Vec::new();
        for frame in 0..=120u64 {
            let tick = timer.tick(start + Duration::from_millis(frame * 10));
            if let Some(fps) = tick.fps {
                reports.push(fps);
            }
        }
        assert_eq!(reports.len(), 1);
        assert_abs_diff_eq!(reports[0], 100.0, epsilon = 1.0);
        assert_abs_diff_eq!(timer.fps(), reports[0]);
    }

    #[test]
    fn interval_is_clamped() {
        let timer = FrameTimer::new(42.0, 0.1);
        assert_eq!(timer.interval, MAX_FPS_INTERVAL);
        let timer = FrameTimer::new(-1.0, 0.1);
        assert_eq!(timer.interval, 0.0);
    }

    #[test]
    fn title_includes_fps() {
        assert_eq!(fps_title("Rocket", 59.94), "Rocket || Frames per second: 59.9");
    }
}
