//! Fixed-step simulation clock and per-step ordering.
//!
//! The logic step runs in `FixedUpdate` at [`STEP_HZ`]. Bevy's fixed timestep
//! accumulates wall-clock time and runs zero or more steps per rendered frame.
//! Every gameplay timer (cooldowns, charge time, cleanup) reads [`SimClock`]
//! instead of wall-clock time so that pausing freezes them too.

use bevy::prelude::*;

/// Logic steps per second.
pub const STEP_HZ: f64 = 60.0;

/// Simulated milliseconds per logic step.
pub const STEP_MS: f64 = 1000.0 / STEP_HZ;

/// Ordering of one logic step.
///
/// Later sets observe state mutated by earlier sets in the same step:
/// player movement and projectiles, then collision resolution against
/// terrain and props, then prop updates, then enemies, then the
/// damage/experience/victory outcome.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepSet {
    Clock,
    Player,
    Collision,
    Objects,
    Enemies,
    Outcome,
}

/// Ordering of the systems that (re)build a run on entering `InGame`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelSet {
    /// Despawn the previous run and reset resources
    Reset,
    /// Build terrain, player and camera
    Build,
    /// Fill enemy and prop pools
    Populate,
}

/// Simulation time, advanced once per logic step.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    /// Number of logic steps since the run started
    pub frame: u64,
    /// Simulated milliseconds since the run started
    pub elapsed_ms: f64,
}

impl SimClock {
    pub fn advance(&mut self) {
        self.frame += 1;
        self.elapsed_ms += STEP_MS;
    }

    /// Milliseconds elapsed since `earlier_ms`.
    pub fn since(&self, earlier_ms: f64) -> f64 {
        self.elapsed_ms - earlier_ms
    }
}

/// Minimum-interval gate measured on the simulation clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimiter {
    pub interval_ms: f64,
    last_ms: Option<f64>,
}

impl RateLimiter {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Returns true (and records `now_ms`) when the interval has elapsed.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_ms {
            if now_ms - last < self.interval_ms {
                return false;
            }
        }
        self.last_ms = Some(now_ms);
        true
    }
}

/// Advance the simulation clock by one step.
pub fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.advance();
}
