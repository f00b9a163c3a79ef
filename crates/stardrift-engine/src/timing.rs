//! Frame pacing and frame time statistics.
//!
//! The driver always advances the scene by a fixed step. Pacing only decides
//! whether the loop sleeps between frames to match the target rate.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frame timing manager.
#[derive(Debug)]
pub struct FrameTiming {
    /// Target frames per second
    target_fps: u32,
    /// Time budget per frame
    frame_budget: Duration,
    /// Start of the current frame
    frame_start: Instant,
    /// Simulation step per frame in seconds
    fixed_dt: f32,
    /// Whether to sleep out the remaining budget
    paced: bool,
    /// Recent frame work times in seconds
    frame_times: VecDeque<f32>,
    /// Maximum samples for averaging
    max_samples: usize,
    /// Longest frame seen
    peak: f32,
    /// Frames completed
    frames: u64,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameTiming {
    /// Create a new frame timing manager stepping at `target_fps`.
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            target_fps,
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps)),
            frame_start: Instant::now(),
            fixed_dt: 1.0 / target_fps as f32,
            paced: false,
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
            peak: 0.0,
            frames: 0,
        }
    }

    /// Enable or disable real-time pacing.
    #[must_use]
    pub fn with_pacing(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    /// Simulation step per frame in seconds.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Mark the start of a frame.
    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Mark the end of a frame: records its work time and, when paced,
    /// sleeps for the rest of the budget.
    pub fn end_frame(&mut self) {
        let work = self.frame_start.elapsed();
        let secs = work.as_secs_f32();

        self.frame_times.push_back(secs);
        if self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }
        self.peak = self.peak.max(secs);
        self.frames += 1;

        if self.paced && work < self.frame_budget {
            std::thread::sleep(self.frame_budget - work);
        }
    }

    /// Average frame work time in milliseconds over recent frames.
    #[must_use]
    pub fn average_frame_time_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        (self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32) * 1000.0
    }

    /// Longest frame work time in milliseconds.
    #[must_use]
    pub fn peak_frame_time_ms(&self) -> f32 {
        self.peak * 1000.0
    }

    /// Frames completed.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Get the target FPS.
    #[must_use]
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Whether real-time pacing is on.
    #[must_use]
    pub fn is_paced(&self) -> bool {
        self.paced
    }
}
