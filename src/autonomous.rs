// Scripted autonomous routine
//
// Drive straight a fixed distance on encoder targets, spin up the shooter and
// fire a number of rings with the kicker. The routine only stages commands;
// it advances at most one step per cycle and never waits on hardware.

use tracing::info;

use crate::config::{COUNTS_PER_INCH, PowerLevel};
use crate::hardware::RunMode;
use crate::robot::Robot;

/// Cycles to let the flywheel reach speed before the first kick
const SPIN_UP_CYCLES: u32 = 25;

/// Cycles the kicker holds each position
const KICK_DWELL_CYCLES: u32 = 8;

#[derive(Debug, Clone, Copy)]
pub struct RoutineOptions {
    pub inches: f64,
    pub drive_power: f64,
    pub rings: u32,
    pub power_level: PowerLevel,
}

impl Default for RoutineOptions {
    fn default() -> Self {
        Self {
            inches: 24.0,
            drive_power: 0.6,
            rings: 3,
            power_level: PowerLevel::Far,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ResetEncoders,
    StartMove,
    WaitForMove,
    SpinUp { remaining: u32 },
    KickOut { fired: u32, remaining: u32 },
    KickIn { fired: u32, remaining: u32 },
    Disarm,
    Done,
}

pub struct Routine {
    options: RoutineOptions,
    step: Step,
}

impl Routine {
    pub fn new(options: RoutineOptions) -> Self {
        Self {
            options,
            step: Step::ResetEncoders,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn is_done(&self) -> bool {
        self.step == Step::Done
    }

    /// Encoder target for the straight move
    pub fn target_counts(&self) -> i32 {
        (self.options.inches * COUNTS_PER_INCH).round() as i32
    }

    /// Stage this cycle's commands. Call once per cycle, before `periodic`.
    pub fn advance(&mut self, robot: &mut Robot) {
        let next = match self.step {
            Step::ResetEncoders => {
                robot.drive.set_tank_power(0.0, 0.0);
                robot.drive.set_run_mode(RunMode::StopAndResetEncoder);
                Step::StartMove
            }
            Step::StartMove => {
                let target = self.target_counts();
                info!(
                    "Driving {} in ({} counts) at power {}",
                    self.options.inches, target, self.options.drive_power
                );
                robot.drive.set_targets(target, target, target, target);
                robot.drive.set_run_mode(RunMode::RunToPosition);
                let power = self.options.drive_power;
                robot.drive.set_tank_power(power, power);
                Step::WaitForMove
            }
            Step::WaitForMove if robot.drive.is_busy() => Step::WaitForMove,
            Step::WaitForMove => {
                info!("Move finished at {:?}", robot.drive.current_positions());
                robot.drive.set_tank_power(0.0, 0.0);
                robot.drive.set_run_mode(RunMode::RunUsingEncoder);
                robot.shooter.set_power_level(self.options.power_level);
                robot.shooter.set_armed(true);
                Step::SpinUp {
                    remaining: SPIN_UP_CYCLES,
                }
            }
            Step::SpinUp { remaining } if remaining > 0 => Step::SpinUp {
                remaining: remaining - 1,
            },
            Step::SpinUp { .. } => self.next_kick(robot, 0),
            Step::KickOut { fired, remaining } if remaining > 0 => Step::KickOut {
                fired,
                remaining: remaining - 1,
            },
            Step::KickOut { fired, .. } => {
                robot.kicker.toggle_pos();
                Step::KickIn {
                    fired: fired + 1,
                    remaining: KICK_DWELL_CYCLES,
                }
            }
            Step::KickIn { fired, remaining } if remaining > 0 => Step::KickIn {
                fired,
                remaining: remaining - 1,
            },
            Step::KickIn { fired, .. } => self.next_kick(robot, fired),
            Step::Disarm => {
                robot.shooter.set_armed(false);
                info!("Autonomous routine complete");
                Step::Done
            }
            Step::Done => Step::Done,
        };
        self.step = next;
    }

    fn next_kick(&self, robot: &mut Robot, fired: u32) -> Step {
        if fired >= self.options.rings {
            return Step::Disarm;
        }
        info!("Firing ring {}/{}", fired + 1, self.options.rings);
        robot.kicker.toggle_pos();
        Step::KickOut {
            fired,
            remaining: KICK_DWELL_CYCLES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RobotConfig;
    use crate::hardware::{ServoPort, SimHardwareMap};

    fn run(options: RoutineOptions, max_cycles: u32) -> (Robot, Routine, SimHardwareMap, u32) {
        let mut map = SimHardwareMap::standard();
        let mut robot = Robot::bind(&mut map, &RobotConfig::default()).unwrap();
        let mut routine = Routine::new(options);
        let mut cycles = 0;
        while !routine.is_done() && cycles < max_cycles {
            routine.advance(&mut robot);
            robot.periodic();
            map.step();
            cycles += 1;
        }
        (robot, routine, map, cycles)
    }

    #[test]
    fn test_target_counts() {
        let routine = Routine::new(RoutineOptions {
            inches: 48.0,
            ..RoutineOptions::default()
        });
        assert_eq!(routine.target_counts(), 2000);
    }

    #[test]
    fn test_routine_completes() {
        let (robot, routine, _map, _cycles) = run(RoutineOptions::default(), 1000);
        assert!(routine.is_done());
        assert_eq!(robot.drive.current_positions(), [1000; 4]);
        assert!(!robot.drive.is_busy());
        assert!(!robot.shooter.is_armed());
        assert_eq!(robot.shooter.power(), 0.85);
        // Even number of toggles leaves the kicker back in
        assert_eq!(robot.kicker.target_pos(), 0.60);
    }

    #[test]
    fn test_waits_while_drive_is_busy() {
        let mut map = SimHardwareMap::standard();
        let wheels = ["fl_drive", "fr_drive", "rl_drive", "rr_drive"]
            .map(|name| map.motor_probe(name).unwrap());
        let mut robot = Robot::bind(&mut map, &RobotConfig::default()).unwrap();
        let mut routine = Routine::new(RoutineOptions::default());

        for wheel in &wheels {
            wheel.force_busy(Some(false));
        }
        wheels[2].force_busy(Some(true));
        for _ in 0..100 {
            routine.advance(&mut robot);
            robot.periodic();
        }
        assert_eq!(routine.step(), Step::WaitForMove);

        wheels[2].force_busy(Some(false));
        routine.advance(&mut robot);
        assert!(matches!(routine.step(), Step::SpinUp { .. }));
        assert!(robot.shooter.is_armed());
    }

    #[test]
    fn test_zero_rings_skips_kicker() {
        let (robot, routine, map, _cycles) = run(
            RoutineOptions {
                inches: 0.0,
                rings: 0,
                ..RoutineOptions::default()
            },
            200,
        );
        assert!(routine.is_done());
        assert_eq!(map.servo_probe("kicker").unwrap().position(), 0.60);
        assert_eq!(robot.kicker.target_pos(), 0.60);
    }
}
