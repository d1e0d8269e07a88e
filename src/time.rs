//! Simulated clock and frame-rate measurement.
//!
//! The animation runs on [`SimClock`], a fixed-step accumulator: every tick
//! adds the same step no matter how long the frame actually took, so the
//! scene evolves identically on fast and slow machines. Wall-clock time only
//! feeds [`FrameMeter`], which is used for display.
//!
//! # Example
//!
//! ```
//! use lunar_mochi::time::SimClock;
//!
//! let mut clock = SimClock::new(0.02);
//! clock.advance();
//! clock.advance();
//! assert_eq!(clock.ticks(), 2);
//! assert!((clock.time() - 0.04).abs() < 1e-6);
//! ```

use std::time::{Duration, Instant};

/// Default simulated seconds per tick.
pub const DEFAULT_STEP: f32 = 0.02;

/// Fixed-step simulated clock.
#[derive(Debug, Clone)]
pub struct SimClock {
    /// Seconds added per tick.
    step: f32,
    /// Accumulated simulated time. Kept in f64 so long sessions do not lose
    /// the step to rounding.
    elapsed: f64,
    /// Ticks applied since start or the last reset.
    ticks: u64,
    paused: bool,
}

impl SimClock {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            elapsed: 0.0,
            ticks: 0,
            paused: false,
        }
    }

    /// Advance by one step and return the new time.
    ///
    /// Returns `None` while paused; the clock does not move.
    pub fn advance(&mut self) -> Option<f32> {
        if self.paused {
            return None;
        }
        self.elapsed += self.step as f64;
        self.ticks += 1;
        Some(self.time())
    }

    /// Current simulated time in seconds.
    #[inline]
    pub fn time(&self) -> f32 {
        self.elapsed as f32
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Back to time zero. Pause state is kept.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.ticks = 0;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

/// Rendered-frames-per-second meter.
///
/// Averages over a window (500 ms by default) instead of per frame so the
/// value shown in the title bar does not flicker.
#[derive(Debug)]
pub struct FrameMeter {
    window_frames: u64,
    window_start: Instant,
    interval: Duration,
    fps: f32,
}

impl FrameMeter {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            window_frames: 0,
            window_start: Instant::now(),
            interval,
            fps: 0.0,
        }
    }

    /// Record one rendered frame. Returns `true` when the FPS estimate was
    /// refreshed.
    pub fn record(&mut self) -> bool {
        self.record_at(Instant::now())
    }

    fn record_at(&mut self, now: Instant) -> bool {
        self.window_frames += 1;

        let elapsed = now.duration_since(self.window_start);
        if elapsed >= self.interval && !elapsed.is_zero() {
            self.fps = self.window_frames as f32 / elapsed.as_secs_f32();
            self.window_frames = 0;
            self.window_start = now;
            true
        } else {
            false
        }
    }

    /// Latest averaged FPS; 0 until the first window completes.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameMeter {
    fn default() -> Self {
        Self::new()
    }
}
