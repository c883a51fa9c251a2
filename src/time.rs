//! Fixed-timestep clock: turns ~60fps frame callbacks into a steady
//! `TICKS_PER_SEC` game ticks, so the economy advances at the same pace
//! whatever the frame rate.

/// Game ticks per real second. The economy ticks once every ten.
pub const TICKS_PER_SEC: u32 = 10;

/// Longest frame gap credited as play time. The rest of a longer gap (a
/// hidden tab) is paid by `AcademyGame::tick` from the wall clock.
const MAX_FRAME_DELTA_MS: f64 = 500.0;

pub struct GameTime {
    ms_per_tick: f64,
    /// Milliseconds seen but not yet turned into ticks.
    carry_ms: f64,
    last_frame_ms: Option<f64>,
}

impl GameTime {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            carry_ms: 0.0,
            last_frame_ms: None,
        }
    }

    /// Feed the frame's timestamp and get back the number of ticks to run.
    /// Call once per draw frame and hand the count to `AcademyGame::tick`.
    /// The first frame only sets the baseline; a clock that steps backwards
    /// counts as no time.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = self
            .last_frame_ms
            .map_or(0.0, |prev| (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS));
        self.last_frame_ms = Some(now_ms);

        self.carry_ms += delta;
        let ticks = (self.carry_ms / self.ms_per_tick).floor();
        self.carry_ms -= ticks * self.ms_per_tick;
        ticks as u32
    }
}
