//! Fixed-timestep game clock using an accumulator pattern.
//!
//! `draw_web()` calls at ~60fps with variable delta. GameTime converts
//! this into whole 50ms ticks, so every interval in the game (passive
//! income, bonus spawner, auto-click, random events) is a tick count and
//! the logic stays deterministic.

/// Length of one game tick in milliseconds.
pub const TICK_MS: u64 = 50;

/// Ticks per real-time second.
pub const TICKS_PER_SEC: u64 = 1000 / TICK_MS;

/// Convert a millisecond duration into ticks (rounding down).
pub const fn ms_to_ticks(ms: u64) -> u64 {
    ms / TICK_MS
}

pub struct GameTime {
    /// Accumulated milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Largest frame delta honoured, in ms. Longer gaps (backgrounded tab)
    /// are clamped so the game does not fast-forward.
    max_frame_ms: f64,
    /// Total elapsed ticks since creation
    pub total_ticks: u64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(max_frame_ms: f64) -> Self {
        Self {
            accumulator: 0.0,
            max_frame_ms: max_frame_ms.max(TICK_MS as f64),
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed wall-clock timestamp (from `performance.now()`).
    /// Returns the number of ticks to run this frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, self.max_frame_ms),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let tick_ms = TICK_MS as f64;
        let ticks = (self.accumulator / tick_ms) as u32;
        self.accumulator -= ticks as f64 * tick_ms;
        self.total_ticks += ticks as u64;
        ticks
    }
}
