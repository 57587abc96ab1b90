// Cooperative per-cycle scheduler
//
// Calls `update` exactly once on every registered subsystem per cycle, in the
// order given. Mutator calls for the cycle must happen before `run_cycle`.

use std::time::Duration;

use tracing::trace;

use crate::config::MAX_LOOP_HZ;
use crate::subsystems::Subsystem;

pub struct Scheduler {
    period: Duration,
    cycle: u64,
}

impl Scheduler {
    /// Rates outside 1..=MAX_LOOP_HZ are clamped, so the period is never zero
    pub fn new(loop_hz: u64) -> Self {
        Self {
            period: Duration::from_millis(1000 / loop_hz.clamp(1, MAX_LOOP_HZ)),
            cycle: 0,
        }
    }

    /// Commit one cycle
    pub fn run_cycle(&mut self, subsystems: &mut [&mut dyn Subsystem]) {
        for subsystem in subsystems.iter_mut() {
            trace!("cycle {}: update {}", self.cycle, subsystem.name());
            subsystem.update();
        }
        self.cycle += 1;
    }

    /// Completed cycles
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
