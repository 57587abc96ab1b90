// Four-wheel mecanum drive
//
// Stages wheel powers, position targets and the run mode, and commits them
// together in `update`: targets first, then the mode, then all four powers.

use tracing::{debug, info, warn};

use super::Subsystem;
use super::kinematics::{SpeedMode, WheelPowers};
use crate::config::RobotConfig;
use crate::hardware::{
    Direction, HardwareError, HardwareMap, ImuParameters, MotorPort, OrientationSensor, RunMode,
    ZeroPowerBehavior,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DriveError {
    #[error("Drive was bound without an orientation sensor")]
    SensorUnavailable,
}

pub struct Drive {
    front_left: Box<dyn MotorPort>,
    front_right: Box<dyn MotorPort>,
    rear_left: Box<dyn MotorPort>,
    rear_right: Box<dyn MotorPort>,
    imu: Option<Box<dyn OrientationSensor>>,

    powers: WheelPowers,
    speed_mode: SpeedMode,
    targets: Option<[i32; 4]>,
    run_mode: Option<RunMode>,
}

impl Subsystem for Drive {
    fn bind(hardware: &mut dyn HardwareMap, config: &RobotConfig) -> Result<Self, HardwareError> {
        let ports = &config.ports;
        let front_left = hardware.motor(&ports.fl_drive)?;
        let front_right = hardware.motor(&ports.fr_drive)?;
        let rear_left = hardware.motor(&ports.rl_drive)?;
        let rear_right = hardware.motor(&ports.rr_drive)?;

        let imu = if config.use_imu {
            let mut imu = hardware.imu(&ports.imu)?;
            imu.initialize(&ImuParameters::default());
            info!("Orientation sensor '{}' initialized", ports.imu);
            Some(imu)
        } else {
            None
        };

        let mut drive = Self {
            front_left,
            front_right,
            rear_left,
            rear_right,
            imu,
            powers: WheelPowers::zero(),
            speed_mode: SpeedMode::Fast,
            targets: None,
            run_mode: None,
        };

        // Front right is mounted mirrored
        drive.front_right.set_direction(Direction::Reverse);
        for motor in drive.motors_mut() {
            motor.set_zero_power_behavior(ZeroPowerBehavior::Brake);
        }

        info!("Drive bound (imu: {})", drive.has_imu());
        Ok(drive)
    }

    fn name(&self) -> &'static str {
        "drive"
    }

    fn update(&mut self) {
        if let Some(targets) = self.targets {
            for (motor, target) in self.motors_mut().into_iter().zip(targets) {
                motor.set_target_position(target);
            }
        }
        if let Some(mode) = self.run_mode {
            for motor in self.motors_mut() {
                motor.set_mode(mode);
            }
        }

        let powers = self.powers.as_array();
        for (motor, power) in self.motors_mut().into_iter().zip(powers) {
            motor.set_power(power);
        }
    }
}

impl Drive {
    fn motors(&self) -> [&dyn MotorPort; 4] {
        [
            self.front_left.as_ref(),
            self.front_right.as_ref(),
            self.rear_left.as_ref(),
            self.rear_right.as_ref(),
        ]
    }

    fn motors_mut(&mut self) -> [&mut dyn MotorPort; 4] {
        [
            self.front_left.as_mut(),
            self.front_right.as_mut(),
            self.rear_left.as_mut(),
            self.rear_right.as_mut(),
        ]
    }

    /// Stage the same power for both wheels on each side
    pub fn set_tank_power(&mut self, left: f64, right: f64) {
        self.powers = WheelPowers::tank(left, right);
        debug!("Staged tank power: left={}, right={}", left, right);
    }

    /// Stage powers for opposite corners: front-left and rear-right take
    /// `fl_rr`, front-right and rear-left take `fr_rl`
    pub fn set_diagonal_power(&mut self, fl_rr: f64, fr_rl: f64) {
        self.powers = WheelPowers::diagonal(fl_rr, fr_rl);
        debug!("Staged diagonal power: fl_rr={}, fr_rl={}", fl_rr, fr_rl);
    }

    /// Stage wheel powers for a mecanum move
    ///
    /// # Arguments
    /// * `drive` - Forward/backward component
    /// * `strafe` - Sideways component
    /// * `twist` - Rotation component
    /// * `slow` - Scale every wheel by the slow factor instead of the fast one
    pub fn set_mecanum_power(&mut self, drive: f64, strafe: f64, twist: f64, slow: bool) {
        self.speed_mode = SpeedMode::from_slow(slow);
        self.powers = WheelPowers::mecanum(drive, strafe, twist, self.speed_mode);
        debug!(
            "Staged mecanum power: drive={}, strafe={}, twist={}, mode={:?}",
            drive, strafe, twist, self.speed_mode
        );
    }

    /// Stage encoder targets for run-to-position moves. Does not change the
    /// run mode.
    pub fn set_targets(&mut self, fl: i32, fr: i32, rl: i32, rr: i32) {
        self.targets = Some([fl, fr, rl, rr]);
        debug!("Staged targets: {:?}", [fl, fr, rl, rr]);
    }

    /// Stage a run mode for all four motors
    pub fn set_run_mode(&mut self, mode: RunMode) {
        self.run_mode = Some(mode);
        debug!("Staged run mode: {:?}", mode);
    }

    /// Committed run mode, read from the front-left motor. All four motors
    /// always share it.
    pub fn run_mode(&self) -> RunMode {
        self.front_left.mode()
    }

    /// Encoder positions as [front_left, front_right, rear_left, rear_right]
    pub fn current_positions(&self) -> [i32; 4] {
        self.motors().map(|motor| motor.current_position())
    }

    /// True while any wheel is still seeking its target
    pub fn is_busy(&self) -> bool {
        self.motors().iter().any(|motor| motor.is_busy())
    }

    /// Write zero power to every wheel right now, outside the update cycle.
    /// Staged powers are kept, so the next `update` re-applies them.
    pub fn stop(&mut self) {
        warn!("Drive stop: zeroing all wheels (staged powers kept)");
        for motor in self.motors_mut() {
            motor.set_power(0.0);
        }
    }

    /// Yaw in degrees, intrinsic ZYX
    pub fn heading(&self) -> Result<f64, DriveError> {
        let imu = self.imu.as_ref().ok_or(DriveError::SensorUnavailable)?;
        Ok(imu.angular_orientation().yaw)
    }

    pub fn has_imu(&self) -> bool {
        self.imu.is_some()
    }

    pub fn staged_powers(&self) -> WheelPowers {
        self.powers
    }

    pub fn speed_mode(&self) -> SpeedMode {
        self.speed_mode
    }

    pub fn staged_targets(&self) -> Option<[i32; 4]> {
        self.targets
    }
}
