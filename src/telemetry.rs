// Serializable snapshot of the robot's staged and committed state

use serde::Serialize;

use crate::hardware::{Direction, RunMode};
use crate::robot::Robot;
use crate::subsystems::{SpeedMode, WheelPowers};

#[derive(Debug, Clone, Serialize)]
pub struct DriveTelemetry {
    pub powers: WheelPowers,
    pub speed_mode: SpeedMode,
    pub run_mode: RunMode,
    pub positions: [i32; 4],
    /// Staged run-to-position targets, absent until first set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<[i32; 4]>,
    pub busy: bool,
    /// Absent when the drive was bound without an orientation sensor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntakeTelemetry {
    pub power: f64,
    pub reversed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShooterTelemetry {
    pub power: f64,
    pub armed: bool,
    pub direction: Direction,
}

#[derive(Debug, Clone, Serialize)]
pub struct KickerTelemetry {
    pub target: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RobotTelemetry {
    pub cycle: u64,
    pub drive: DriveTelemetry,
    pub intake: IntakeTelemetry,
    pub shooter: ShooterTelemetry,
    pub kicker: KickerTelemetry,
}

impl RobotTelemetry {
    pub fn capture(robot: &Robot) -> Self {
        let drive = &robot.drive;
        Self {
            cycle: robot.scheduler().cycle(),
            drive: DriveTelemetry {
                powers: drive.staged_powers(),
                speed_mode: drive.speed_mode(),
                run_mode: drive.run_mode(),
                positions: drive.current_positions(),
                targets: drive.staged_targets(),
                busy: drive.is_busy(),
                heading: drive.heading().ok(),
            },
            intake: IntakeTelemetry {
                power: robot.intake.power(),
                reversed: robot.intake.is_reversed(),
            },
            shooter: ShooterTelemetry {
                power: robot.shooter.power(),
                armed: robot.shooter.is_armed(),
                direction: robot.shooter.direction(),
            },
            kicker: KickerTelemetry {
                target: robot.kicker.target_pos(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RobotConfig;
    use crate::hardware::SimHardwareMap;

    #[test]
    fn test_json_shape() {
        let mut map = SimHardwareMap::standard();
        let config = RobotConfig {
            use_imu: true,
            ..RobotConfig::default()
        };
        let mut robot = Robot::bind(&mut map, &config).unwrap();
        robot.drive.set_mecanum_power(0.5, 0.0, 0.0, true);
        robot.periodic();

        let json = serde_json::to_value(robot.telemetry()).unwrap();
        assert_eq!(json["cycle"], 1);
        assert_eq!(json["drive"]["speed_mode"], "slow");
        assert_eq!(json["drive"]["run_mode"], "run_without_encoder");
        assert_eq!(json["drive"]["heading"], 0.0);
        assert!(json["drive"].get("targets").is_none());
        assert_eq!(json["shooter"]["direction"], "forward");
        assert_eq!(json["kicker"]["target"], 0.6);
    }

    #[test]
    fn test_staged_targets_reported() {
        let mut map = SimHardwareMap::standard();
        let mut robot = Robot::bind(&mut map, &RobotConfig::default()).unwrap();
        robot.drive.set_targets(100, 200, 300, 400);

        let json = serde_json::to_value(robot.telemetry()).unwrap();
        assert_eq!(json["drive"]["targets"], serde_json::json!([100, 200, 300, 400]));
    }

    #[test]
    fn test_heading_omitted_without_imu() {
        let mut map = SimHardwareMap::standard();
        let robot = Robot::bind(&mut map, &RobotConfig::default()).unwrap();
        let json = serde_json::to_value(robot.telemetry()).unwrap();
        assert!(json["drive"].get("heading").is_none());
    }
}
