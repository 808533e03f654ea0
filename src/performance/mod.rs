//! # Frame pacing and performance metrics
//!
//! [`FramePacer`] caps the frame rate by sleeping off whatever is left of the
//! frame budget and hands back the delta time for the next frame.
//! [`PerformanceMonitor`] keeps a window of recent frame times and reports
//! averaged FPS and min/max frame times.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chadd_scene::performance::FramePacer;
//!
//! let mut pacer = FramePacer::new(144.0);
//! loop {
//!     let dt = pacer.begin_frame();
//!     // ... update with dt, render ...
//!     pacer.end_frame();
//! #   break;
//! }
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Longest delta handed to the simulation; stalls (window drags, breakpoints)
/// would otherwise teleport the camera.
const MAX_DT: f32 = 0.1;

/// Soft real-time frame limiter.
pub struct FramePacer {
    /// Target frame duration; zero when pacing is disabled
    frame_budget: Duration,
    frame_start: Instant,
    last_dt: f32,
}

impl FramePacer {
    /// Creates a pacer for `target_fps` frames per second (0 or less = unlimited).
    pub fn new(target_fps: f32) -> Self {
        // Rates too small for a representable budget fall back to unlimited
        let frame_budget = if target_fps > 0.0 {
            Duration::try_from_secs_f64(1.0 / target_fps as f64).unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        };

        Self {
            frame_budget,
            frame_start: Instant::now(),
            last_dt: frame_budget.as_secs_f32(),
        }
    }

    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }

    /// Marks the start of a frame and returns the delta time to simulate.
    pub fn begin_frame(&mut self) -> f32 {
        self.frame_start = Instant::now();
        self.last_dt
    }

    /// Sleeps out the rest of the frame budget and records the full frame time.
    pub fn end_frame(&mut self) -> Duration {
        let busy = self.frame_start.elapsed();
        let remaining = remaining_budget(self.frame_budget, busy);
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }

        let frame_time = self.frame_start.elapsed();
        self.last_dt = clamp_dt(frame_time.as_secs_f32());
        frame_time
    }
}

/// Time left in the frame budget after `busy` has been spent.
pub fn remaining_budget(budget: Duration, busy: Duration) -> Duration {
    budget.saturating_sub(busy)
}

fn clamp_dt(dt: f32) -> f32 {
    dt.clamp(0.0, MAX_DT)
}

/// Averaged frame metrics
#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    /// Current frames per second
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    /// Minimum frame time in the current window
    pub min_frame_time_ms: f32,
    /// Maximum frame time in the current window
    pub max_frame_time_ms: f32,
    /// Number of draw calls in the last frame
    pub draw_calls: u32,
    /// Number of instances submitted in the last frame
    pub instance_count: u32,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: f32::MAX,
            max_frame_time_ms: 0.0,
            draw_calls: 0,
            instance_count: 0,
        }
    }
}

/// Rolling frame-time statistics
pub struct PerformanceMonitor {
    /// Ring buffer of recent frame times for averaging
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    current_metrics: PerformanceMetrics,
    last_report: Instant,
    report_interval: Duration,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::with_config(240, Duration::from_secs(5))
    }

    pub fn with_config(max_samples: usize, report_interval: Duration) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            current_metrics: PerformanceMetrics::default(),
            last_report: Instant::now(),
            report_interval,
        }
    }

    /// Adds a frame time sample and refreshes the metrics.
    pub fn record_frame(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
        self.update_metrics();

        if self.last_report.elapsed() >= self.report_interval {
            self.last_report = Instant::now();
            let m = &self.current_metrics;
            log::debug!(
                "{:.1} fps ({:.2}ms avg, {:.2}..{:.2}ms), {} draws, {} instances",
                m.fps,
                m.frame_time_ms,
                m.min_frame_time_ms,
                m.max_frame_time_ms,
                m.draw_calls,
                m.instance_count
            );
        }
    }

    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total_time: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total_time / self.frame_times.len() as u32;
        let avg_frame_time_ms = avg_frame_time.as_secs_f32() * 1000.0;

        self.current_metrics.frame_time_ms = avg_frame_time_ms;
        self.current_metrics.fps = if avg_frame_time_ms > 0.0 {
            1000.0 / avg_frame_time_ms
        } else {
            0.0
        };

        if let (Some(min_time), Some(max_time)) =
            (self.frame_times.iter().min(), self.frame_times.iter().max())
        {
            self.current_metrics.min_frame_time_ms = min_time.as_secs_f32() * 1000.0;
            self.current_metrics.max_frame_time_ms = max_time.as_secs_f32() * 1000.0;
        }
    }

    pub fn update_render_stats(&mut self, draw_calls: u32, instance_count: u32) {
        self.current_metrics.draw_calls = draw_calls;
        self.current_metrics.instance_count = instance_count;
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.current_metrics
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_from_target_fps() {
        let pacer = FramePacer::new(144.0);
        let expected = 1.0 / 144.0;
        assert!((pacer.frame_budget().as_secs_f64() - expected).abs() < 1e-9);

        assert_eq!(FramePacer::new(0.0).frame_budget(), Duration::ZERO);
    }

    #[test]
    fn test_unrepresentable_budget_disables_pacing() {
        assert_eq!(FramePacer::new(1e-30).frame_budget(), Duration::ZERO);
        assert_eq!(FramePacer::new(f32::NAN).frame_budget(), Duration::ZERO);
    }

    #[test]
    fn test_remaining_budget_never_negative() {
        let budget = Duration::from_millis(7);
        assert_eq!(
            remaining_budget(budget, Duration::from_millis(3)),
            Duration::from_millis(4)
        );
        assert_eq!(remaining_budget(budget, Duration::from_millis(20)), Duration::ZERO);
    }

    #[test]
    fn test_end_frame_waits_out_budget() {
        let mut pacer = FramePacer::new(100.0);
        pacer.begin_frame();
        let frame_time = pacer.end_frame();
        assert!(frame_time >= Duration::from_millis(10));

        let dt = pacer.begin_frame();
        assert!(dt >= 0.01 && dt <= MAX_DT);
    }

    #[test]
    fn test_dt_is_clamped() {
        assert_eq!(clamp_dt(3.0), MAX_DT);
        assert_eq!(clamp_dt(0.004), 0.004);
    }

    #[test]
    fn test_monitor_averages_window() {
        let mut monitor = PerformanceMonitor::with_config(2, Duration::from_secs(60));
        monitor.record_frame(Duration::from_millis(100));
        monitor.record_frame(Duration::from_millis(10));
        monitor.record_frame(Duration::from_millis(10));

        let metrics = monitor.metrics();
        assert!((metrics.frame_time_ms - 10.0).abs() < 1e-3);
        assert!((metrics.fps - 100.0).abs() < 1e-2);
        assert!((metrics.max_frame_time_ms - 10.0).abs() < 1e-3);
    }
}
