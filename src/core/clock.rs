//=========================================================================
// Clock
//=========================================================================
//
// Millisecond frame timing: scaled delta, FPS accounting, frame pacing.
//
// The clock never reads time itself. Every operation takes the current
// monotonic timestamp from the caller (the engine reads it from the
// platform), which keeps the arithmetic deterministic under test.
//
// FPS accounting:
//   window_start ──── 1000 ms ────┐
//   account_fps() x N             ├─► last_reported_fps = N
//                                 └─► window_start += 1000
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== Constants ===========================================================

const FPS_WINDOW_MS: u64 = 1000;

//=== Pacing ==============================================================

/// Frame pacing strategy applied after present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    /// Sleep the whole target frame time after every frame, regardless of
    /// how long the frame took.
    #[default]
    Fixed,

    /// Sleep only what remains of the target frame time since the frame
    /// started.
    Deadline,
}

//=== Clock ===============================================================

#[derive(Debug, Clone)]
pub struct Clock {
    target_frame_ms: f32,
    time_scale: f32,
    pacing: Pacing,

    last_frame_ms: u64,
    frame_start_ms: u64,
    window_start_ms: u64,
    frames_this_window: u32,
    last_reported_fps: u32,
    delta_ms: f32,
}

impl Clock {
    /// Creates a clock seeded at `now_ms`.
    ///
    /// `target_fps == 0` means uncapped: pacing never sleeps.
    pub fn new(target_fps: u32, time_scale: f32, pacing: Pacing, now_ms: u64) -> Self {
        let target_frame_ms = if target_fps > 0 {
            1000.0 / target_fps as f32
        } else {
            0.0
        };

        Self {
            target_frame_ms,
            time_scale,
            pacing,
            last_frame_ms: now_ms,
            frame_start_ms: now_ms,
            window_start_ms: now_ms,
            frames_this_window: 0,
            last_reported_fps: 0,
            delta_ms: 0.0,
        }
    }

    //--- Per-frame Operations ---------------------------------------------

    /// Computes the scaled delta since the previous call and stores it.
    pub fn begin_frame(&mut self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.last_frame_ms);
        self.last_frame_ms = now_ms;
        self.delta_ms = elapsed as f32 * self.time_scale;
        self.delta_ms
    }

    /// Counts one frame towards the current FPS window.
    ///
    /// When the window has run for a full second the count is published
    /// and the window start advances by exactly 1000 ms. The boundary
    /// check runs before counting, so the frame that crosses the
    /// boundary belongs to the new window.
    pub fn account_fps(&mut self, now_ms: u64) {
        self.frame_start_ms = now_ms;

        if now_ms.saturating_sub(self.window_start_ms) >= FPS_WINDOW_MS {
            self.last_reported_fps = self.frames_this_window;
            self.frames_this_window = 0;
            self.window_start_ms += FPS_WINDOW_MS;
        }

        self.frames_this_window += 1;
    }

    /// Returns how many milliseconds the caller should sleep now.
    pub fn pace(&self, now_ms: u64) -> u64 {
        if self.target_frame_ms <= 0.0 {
            return 0;
        }

        match self.pacing {
            Pacing::Fixed => self.target_frame_ms as u64,
            Pacing::Deadline => {
                let spent = now_ms.saturating_sub(self.frame_start_ms) as f32;
                (self.target_frame_ms - spent).max(0.0) as u64
            }
        }
    }

    //--- Accessors --------------------------------------------------------

    /// Most recent scaled delta in milliseconds.
    pub fn delta_ms(&self) -> f32 {
        self.delta_ms
    }

    /// Frame count of the last complete one-second window.
    pub fn last_reported_fps(&self) -> u32 {
        self.last_reported_fps
    }

    pub fn target_frame_ms(&self) -> f32 {
        self.target_frame_ms
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_frame_time_from_fps() {
        let clock = Clock::new(50, 1.0, Pacing::Fixed, 0);
        assert_eq!(clock.target_frame_ms(), 20.0);
    }

    #[test]
    fn zero_fps_is_uncapped() {
        let clock = Clock::new(0, 1.0, Pacing::Fixed, 0);
        assert_eq!(clock.target_frame_ms(), 0.0);
        assert_eq!(clock.pace(0), 0);

        let clock = Clock::new(0, 1.0, Pacing::Deadline, 0);
        assert_eq!(clock.pace(500), 0);
    }

    //--- Delta ------------------------------------------------------------

    #[test]
    fn delta_is_scaled_and_advances_last_frame() {
        let mut clock = Clock::new(60, 0.5, Pacing::Fixed, 100);

        assert_eq!(clock.begin_frame(120), 10.0);
        assert_eq!(clock.delta_ms(), 10.0);

        assert_eq!(clock.begin_frame(160), 20.0);
    }

    #[test]
    fn delta_never_goes_negative() {
        let mut clock = Clock::new(60, 1.0, Pacing::Fixed, 100);
        assert_eq!(clock.begin_frame(50), 0.0);
    }

    //--- FPS Accounting ---------------------------------------------------

    #[test]
    fn fps_reads_zero_during_first_window() {
        let mut clock = Clock::new(60, 1.0, Pacing::Fixed, 0);

        for t in (0..1000).step_by(16) {
            clock.account_fps(t);
            assert_eq!(clock.last_reported_fps(), 0);
        }
    }

    #[test]
    fn fps_reports_calls_of_previous_window() {
        let mut clock = Clock::new(60, 1.0, Pacing::Fixed, 0);

        // 40 calls in [0, 1000)
        for i in 0..40 {
            clock.account_fps(i * 25);
        }
        assert_eq!(clock.last_reported_fps(), 0);

        // First call in [1000, 2000) publishes the count
        clock.account_fps(1000);
        assert_eq!(clock.last_reported_fps(), 40);

        // 9 more calls in [1000, 2000): 10 total for that window
        for i in 1..10 {
            clock.account_fps(1000 + i * 100);
            assert_eq!(clock.last_reported_fps(), 40, "Stable inside a window");
        }

        clock.account_fps(2000);
        assert_eq!(clock.last_reported_fps(), 10);
    }

    #[test]
    fn window_start_advances_in_exact_steps() {
        let mut clock = Clock::new(60, 1.0, Pacing::Fixed, 0);

        clock.account_fps(0);
        clock.account_fps(1350);
        assert_eq!(clock.last_reported_fps(), 1);

        // Window is now [1000, 2000), so 1999 is still inside it
        clock.account_fps(1999);
        assert_eq!(clock.last_reported_fps(), 1);

        clock.account_fps(2000);
        assert_eq!(clock.last_reported_fps(), 2);
    }

    //--- Pacing -----------------------------------------------------------

    #[test]
    fn fixed_pacing_sleeps_whole_frame_time() {
        let mut clock = Clock::new(60, 1.0, Pacing::Fixed, 0);
        clock.account_fps(0);

        // Truncated like a millisecond delay call
        assert_eq!(clock.pace(0), 16);
        assert_eq!(clock.pace(15), 16, "Fixed pacing ignores frame work");
    }

    #[test]
    fn deadline_pacing_subtracts_frame_work() {
        let mut clock = Clock::new(50, 1.0, Pacing::Deadline, 0);
        clock.account_fps(100);

        assert_eq!(clock.pace(105), 15);
        assert_eq!(clock.pace(119), 1);
        assert_eq!(clock.pace(130), 0, "Overrun frames do not sleep");
    }
}
