// Fixed-rate control loop over simulated hardware
// Each tick: stage commands from the routine, commit one scheduler cycle,
// then advance the simulated encoders.

use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use crate::autonomous::{Routine, RoutineOptions};
use crate::config::{ConfigError, RobotConfig};
use crate::hardware::{HardwareError, SimHardwareMap};
use crate::robot::Robot;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Hardware bring-up failed: {0}")]
    Hardware(#[from] HardwareError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to serialize telemetry: {0}")]
    Telemetry(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub routine: RoutineOptions,
    /// Give up after this many cycles, even if the routine is not done
    pub max_cycles: u64,
    /// Log a telemetry line every N cycles (0 disables)
    pub telemetry_every: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            routine: RoutineOptions::default(),
            max_cycles: 1500,
            telemetry_every: 25,
        }
    }
}

/// Outcome of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub completed: bool,
}

pub async fn run(config: RobotConfig, options: RunOptions) -> Result<RunSummary, RuntimeError> {
    info!("Binding subsystems on simulated hardware...");
    let mut hardware = SimHardwareMap::standard();
    let mut robot = Robot::bind(&mut hardware, &config)?;
    let mut routine = Routine::new(options.routine);

    let period = robot.scheduler().period();
    let mut tick = interval(period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "Runtime started: {}Hz loop ({}ms period), max {} cycles",
        config.loop_hz,
        period.as_millis(),
        options.max_cycles
    );

    let mut cycles = 0;
    while !routine.is_done() && cycles < options.max_cycles {
        tick.tick().await;

        // 1. Stage this cycle's commands
        routine.advance(&mut robot);

        // 2. Commit every subsystem once
        robot.periodic();

        // 3. Advance the simulated world
        hardware.step();
        cycles += 1;

        // 4. Telemetry
        if options.telemetry_every > 0 && cycles % options.telemetry_every == 0 {
            let telemetry = serde_json::to_string(&robot.telemetry())?;
            info!("telemetry {}", telemetry);
        }
    }

    if !routine.is_done() {
        warn!(
            "Routine still at {:?} after {} cycles, stopping",
            routine.step(),
            cycles
        );
    }
    robot.drive.stop();

    Ok(RunSummary {
        cycles,
        completed: routine.is_done(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_run_completes_routine() {
        let summary = run(RobotConfig::default(), RunOptions::default())
            .await
            .unwrap();
        assert!(summary.completed);
        assert!(summary.cycles < 1500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_at_max_cycles() {
        let options = RunOptions {
            max_cycles: 10,
            ..RunOptions::default()
        };
        let summary = run(RobotConfig::default(), options).await.unwrap();
        assert_eq!(
            summary,
            RunSummary {
                cycles: 10,
                completed: false
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_loop_rate_does_not_panic() {
        let config = RobotConfig {
            loop_hz: 2000,
            ..RobotConfig::default()
        };
        let options = RunOptions {
            max_cycles: 5,
            ..RunOptions::default()
        };
        let summary = run(config, options).await.unwrap();
        assert_eq!(summary.cycles, 5);
    }

    #[tokio::test]
    async fn test_bad_port_name_aborts_bring_up() {
        let mut config = RobotConfig::default();
        config.ports.kicker = "missing".to_string();
        let err = run(config, RunOptions::default()).await.err().unwrap();
        assert!(matches!(
            err,
            RuntimeError::Hardware(HardwareError::NotFound { .. })
        ));
    }
}
