// The assembled robot: every subsystem plus the scheduler that commits them

use tracing::info;

use crate::config::RobotConfig;
use crate::hardware::{HardwareError, HardwareMap};
use crate::scheduler::Scheduler;
use crate::subsystems::{Drive, Intake, Kicker, Shooter, Subsystem};
use crate::telemetry::RobotTelemetry;

pub struct Robot {
    pub drive: Drive,
    pub intake: Intake,
    pub shooter: Shooter,
    pub kicker: Kicker,
    scheduler: Scheduler,
}

impl Robot {
    /// Bind every subsystem. Any missing or mistyped port aborts bring-up.
    ///
    /// Ports claimed before the failing one stay claimed, so a failed bind
    /// cannot be retried on the same map. Start again from a fresh map.
    pub fn bind(hardware: &mut dyn HardwareMap, config: &RobotConfig) -> Result<Self, HardwareError> {
        let robot = Self {
            drive: Drive::bind(hardware, config)?,
            intake: Intake::bind(hardware, config)?,
            shooter: Shooter::bind(hardware, config)?,
            kicker: Kicker::bind(hardware, config)?,
            scheduler: Scheduler::new(config.loop_hz),
        };
        info!("Robot bound: drive, intake, shooter, kicker");
        Ok(robot)
    }

    /// Commit all staged state, one update per subsystem
    pub fn periodic(&mut self) {
        let mut subsystems: [&mut dyn Subsystem; 4] = [
            &mut self.drive,
            &mut self.intake,
            &mut self.shooter,
            &mut self.kicker,
        ];
        self.scheduler.run_cycle(&mut subsystems);
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn telemetry(&self) -> RobotTelemetry {
        RobotTelemetry::capture(self)
    }
}
