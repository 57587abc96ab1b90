// Hardware access layer
//
// Provides:
// - Typed port traits for motors, servos and the orientation sensor
// - The HardwareMap trait that resolves named ports at bring-up
// - An in-memory simulated hardware map (sim) for tests and the binaries
//
// Port writes are fire-and-forget: none of the setters return errors and
// none of them clamp. Range handling is left to the port implementation.

pub mod sim;

pub use sim::{SimHardwareMap, SimImu, SimMotor, SimServo};

/// Motor rotation direction relative to its mounting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn inverted(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Motor operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    RunWithoutEncoder,
    RunUsingEncoder,
    RunToPosition,
    StopAndResetEncoder,
}

/// What a motor does when commanded zero power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroPowerBehavior {
    Brake,
    #[default]
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Degrees,
    Radians,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelUnit {
    MetersPerSecondSquared,
    MilliEarthGravity,
}

/// Calibration profile handed to the orientation sensor on initialization
#[derive(Debug, Clone, PartialEq)]
pub struct ImuParameters {
    pub angle_unit: AngleUnit,
    pub accel_unit: AccelUnit,
    pub calibration_file: String,
    pub logging_enabled: bool,
    pub logging_tag: String,
}

impl Default for ImuParameters {
    fn default() -> Self {
        Self {
            angle_unit: AngleUnit::Degrees,
            accel_unit: AccelUnit::MetersPerSecondSquared,
            calibration_file: "BNO055IMUCalibration.json".to_string(),
            logging_enabled: true,
            logging_tag: "IMU".to_string(),
        }
    }
}

/// Orientation reading, intrinsic ZYX order, in the unit the sensor was
/// initialized with
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// Motor-like output with an encoder
pub trait MotorPort: Send {
    fn set_power(&mut self, power: f64);
    fn power(&self) -> f64;
    fn set_direction(&mut self, direction: Direction);
    fn direction(&self) -> Direction;
    fn set_mode(&mut self, mode: RunMode);
    fn mode(&self) -> RunMode;
    fn set_target_position(&mut self, target: i32);
    fn current_position(&self) -> i32;
    /// True while the motor is still seeking its target position
    fn is_busy(&self) -> bool;
    fn set_zero_power_behavior(&mut self, behavior: ZeroPowerBehavior);
}

/// Servo-like output on a normalized [0, 1] range
pub trait ServoPort: Send {
    fn set_position(&mut self, position: f64);
    fn position(&self) -> f64;
}

pub trait OrientationSensor: Send {
    fn initialize(&mut self, parameters: &ImuParameters);
    fn angular_orientation(&self) -> Orientation;
}

/// Port capability, used to report resolution failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    Motor,
    Servo,
    Imu,
}

impl std::fmt::Display for PortKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PortKind::Motor => "motor",
            PortKind::Servo => "servo",
            PortKind::Imu => "imu",
        };
        f.write_str(name)
    }
}

/// Failure to resolve a named port during subsystem bring-up
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HardwareError {
    #[error("No hardware port named '{name}'")]
    NotFound { name: String },

    #[error("Port '{name}' is a {found}, expected a {expected}")]
    WrongType {
        name: String,
        expected: PortKind,
        found: PortKind,
    },

    #[error("Port '{name}' is already owned by another subsystem")]
    AlreadyClaimed { name: String },
}

/// Resolves named, typed ports. A resolved port is owned by the caller;
/// the same name cannot be resolved twice.
///
/// Claims are never released, not even when a later resolution in the same
/// bring-up fails. Retrying a failed bring-up needs a fresh map.
pub trait HardwareMap {
    fn motor(&mut self, name: &str) -> Result<Box<dyn MotorPort>, HardwareError>;
    fn servo(&mut self, name: &str) -> Result<Box<dyn ServoPort>, HardwareError>;
    fn imu(&mut self, name: &str) -> Result<Box<dyn OrientationSensor>, HardwareError>;
}
