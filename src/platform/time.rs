//! Frame timing

use crate::consts::MAX_FRAME_DT;

/// Clamp a raw frame delta (seconds) so a stalled tab cannot tunnel entities.
/// Negative or NaN deltas become zero.
#[inline]
pub fn clamp_frame_dt(raw: f32) -> f32 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.min(MAX_FRAME_DT).max(0.0)
}

/// Turns animation-frame timestamps (milliseconds) into clamped deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous frame; zero on the first call
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        clamp_frame_dt(dt)
    }

    /// Forget the last timestamp (after the tab was hidden, for example)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
