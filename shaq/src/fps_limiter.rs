//! Paces the main loop to a fixed rate, grounded on `game_render::fps_limiter::FpsLimiter` (the
//! windowing/presentation layer that owned frame pacing there is out of scope here, but a
//! headless sandbox still shouldn't spin a CPU core evaluating the same frame forever).

use std::time::{Duration, Instant};

pub struct FrameLimiter {
    timestep: Duration,
    last_update: Instant,
}

impl FrameLimiter {
    pub fn new(target_fps: u32) -> Self {
        Self { timestep: Duration::from_secs(1) / target_fps.max(1), last_update: Instant::now() }
    }

    pub fn block_until_ready(&mut self) {
        let now = Instant::now();
        let elapsed = now - self.last_update;
        if elapsed < self.timestep {
            std::thread::sleep(self.timestep - elapsed);
        }
        self.last_update += self.timestep;
    }
}
