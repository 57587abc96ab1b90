// In-memory hardware map
//
// Every device is a cloneable handle around shared state. The map hands one
// clone to the subsystem that claims it and keeps another, so tests and the
// binaries can observe committed writes and advance the encoder model.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::{
    Direction, HardwareError, HardwareMap, ImuParameters, MotorPort, Orientation,
    OrientationSensor, PortKind, RunMode, ServoPort, ZeroPowerBehavior,
};
use crate::config::{
    PORT_FL_DRIVE, PORT_FR_DRIVE, PORT_IMU, PORT_INTAKE, PORT_KICKER, PORT_RL_DRIVE,
    PORT_RR_DRIVE, PORT_SHOOTER,
};

/// Encoder counts a motor advances per cycle at full power
pub const COUNTS_PER_CYCLE: f64 = 40.0;

/// How many power writes each motor remembers
const POWER_LOG_LEN: usize = 256;

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Snapshot of a simulated motor
#[derive(Debug, Clone, Default)]
pub struct MotorState {
    pub power: f64,
    pub direction: Direction,
    pub mode: RunMode,
    pub target: i32,
    pub position: i32,
    pub zero_power: ZeroPowerBehavior,
    forced_busy: Option<bool>,
    power_writes: VecDeque<f64>,
}

impl MotorState {
    fn busy(&self) -> bool {
        self.forced_busy
            .unwrap_or(self.mode == RunMode::RunToPosition && self.position != self.target)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimMotor {
    state: Arc<Mutex<MotorState>>,
}

impl SimMotor {
    pub fn state(&self) -> MotorState {
        lock(&self.state).clone()
    }

    /// Every power write since creation (bounded), oldest first
    pub fn power_writes(&self) -> Vec<f64> {
        lock(&self.state).power_writes.iter().copied().collect()
    }

    /// Override the busy flag; `None` restores the encoder model
    pub fn force_busy(&self, busy: Option<bool>) {
        lock(&self.state).forced_busy = busy;
    }

    pub fn set_encoder(&self, position: i32) {
        lock(&self.state).position = position;
    }

    fn step(&self) {
        let mut state = lock(&self.state);
        match state.mode {
            RunMode::StopAndResetEncoder => state.position = 0,
            RunMode::RunToPosition => {
                let max_step = (state.power.abs() * COUNTS_PER_CYCLE).round() as i32;
                let remaining = state.target - state.position;
                state.position += remaining.clamp(-max_step, max_step);
            }
            RunMode::RunWithoutEncoder | RunMode::RunUsingEncoder => {
                state.position += (state.power * COUNTS_PER_CYCLE).round() as i32;
            }
        }
    }
}

impl MotorPort for SimMotor {
    fn set_power(&mut self, power: f64) {
        let mut state = lock(&self.state);
        state.power = power;
        if state.power_writes.len() == POWER_LOG_LEN {
            state.power_writes.pop_front();
        }
        state.power_writes.push_back(power);
    }

    fn power(&self) -> f64 {
        lock(&self.state).power
    }

    fn set_direction(&mut self, direction: Direction) {
        lock(&self.state).direction = direction;
    }

    fn direction(&self) -> Direction {
        lock(&self.state).direction
    }

    fn set_mode(&mut self, mode: RunMode) {
        let mut state = lock(&self.state);
        if mode == RunMode::StopAndResetEncoder {
            state.position = 0;
        }
        state.mode = mode;
    }

    fn mode(&self) -> RunMode {
        lock(&self.state).mode
    }

    fn set_target_position(&mut self, target: i32) {
        lock(&self.state).target = target;
    }

    fn current_position(&self) -> i32 {
        lock(&self.state).position
    }

    fn is_busy(&self) -> bool {
        lock(&self.state).busy()
    }

    fn set_zero_power_behavior(&mut self, behavior: ZeroPowerBehavior) {
        lock(&self.state).zero_power = behavior;
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimServo {
    position: Arc<Mutex<f64>>,
}

impl ServoPort for SimServo {
    fn set_position(&mut self, position: f64) {
        *lock(&self.position) = position;
    }

    fn position(&self) -> f64 {
        *lock(&self.position)
    }
}

#[derive(Debug, Default)]
struct ImuState {
    parameters: Option<ImuParameters>,
    orientation: Orientation,
}

#[derive(Debug, Clone, Default)]
pub struct SimImu {
    state: Arc<Mutex<ImuState>>,
}

impl SimImu {
    pub fn set_orientation(&self, orientation: Orientation) {
        lock(&self.state).orientation = orientation;
    }

    /// Parameters passed to the last `initialize` call
    pub fn parameters(&self) -> Option<ImuParameters> {
        lock(&self.state).parameters.clone()
    }
}

impl OrientationSensor for SimImu {
    fn initialize(&mut self, parameters: &ImuParameters) {
        lock(&self.state).parameters = Some(parameters.clone());
    }

    fn angular_orientation(&self) -> Orientation {
        lock(&self.state).orientation
    }
}

#[derive(Debug, Clone)]
enum SimDevice {
    Motor(SimMotor),
    Servo(SimServo),
    Imu(SimImu),
}

impl SimDevice {
    fn kind(&self) -> PortKind {
        match self {
            SimDevice::Motor(_) => PortKind::Motor,
            SimDevice::Servo(_) => PortKind::Servo,
            SimDevice::Imu(_) => PortKind::Imu,
        }
    }
}

/// Simulated hardware map
#[derive(Debug, Default)]
pub struct SimHardwareMap {
    devices: HashMap<String, SimDevice>,
    claimed: HashSet<String>,
}

impl SimHardwareMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map with every port the robot expects, under the default names
    pub fn standard() -> Self {
        let mut map = Self::new();
        for name in [
            PORT_FL_DRIVE,
            PORT_FR_DRIVE,
            PORT_RL_DRIVE,
            PORT_RR_DRIVE,
            PORT_INTAKE,
            PORT_SHOOTER,
        ] {
            map.add_motor(name);
        }
        map.add_servo(PORT_KICKER);
        map.add_imu(PORT_IMU);
        map
    }

    pub fn add_motor(&mut self, name: &str) -> SimMotor {
        let motor = SimMotor::default();
        self.devices
            .insert(name.to_string(), SimDevice::Motor(motor.clone()));
        motor
    }

    pub fn add_servo(&mut self, name: &str) -> SimServo {
        let servo = SimServo::default();
        self.devices
            .insert(name.to_string(), SimDevice::Servo(servo.clone()));
        servo
    }

    pub fn add_imu(&mut self, name: &str) -> SimImu {
        let imu = SimImu::default();
        self.devices
            .insert(name.to_string(), SimDevice::Imu(imu.clone()));
        imu
    }

    pub fn motor_probe(&self, name: &str) -> Option<SimMotor> {
        match self.devices.get(name) {
            Some(SimDevice::Motor(motor)) => Some(motor.clone()),
            _ => None,
        }
    }

    pub fn servo_probe(&self, name: &str) -> Option<SimServo> {
        match self.devices.get(name) {
            Some(SimDevice::Servo(servo)) => Some(servo.clone()),
            _ => None,
        }
    }

    pub fn imu_probe(&self, name: &str) -> Option<SimImu> {
        match self.devices.get(name) {
            Some(SimDevice::Imu(imu)) => Some(imu.clone()),
            _ => None,
        }
    }

    /// Advance every motor's encoder by one cycle
    pub fn step(&self) {
        for device in self.devices.values() {
            if let SimDevice::Motor(motor) = device {
                motor.step();
            }
        }
    }

    fn claim(&mut self, name: &str, expected: PortKind) -> Result<SimDevice, HardwareError> {
        let device = self
            .devices
            .get(name)
            .ok_or_else(|| HardwareError::NotFound {
                name: name.to_string(),
            })?;
        if device.kind() != expected {
            return Err(HardwareError::WrongType {
                name: name.to_string(),
                expected,
                found: device.kind(),
            });
        }
        if !self.claimed.insert(name.to_string()) {
            return Err(HardwareError::AlreadyClaimed {
                name: name.to_string(),
            });
        }
        debug!("Claimed {} port '{}'", expected, name);
        Ok(device.clone())
    }
}

impl HardwareMap for SimHardwareMap {
    fn motor(&mut self, name: &str) -> Result<Box<dyn MotorPort>, HardwareError> {
        match self.claim(name, PortKind::Motor)? {
            SimDevice::Motor(motor) => Ok(Box::new(motor)),
            other => Err(HardwareError::WrongType {
                name: name.to_string(),
                expected: PortKind::Motor,
                found: other.kind(),
            }),
        }
    }

    fn servo(&mut self, name: &str) -> Result<Box<dyn ServoPort>, HardwareError> {
        match self.claim(name, PortKind::Servo)? {
            SimDevice::Servo(servo) => Ok(Box::new(servo)),
            other => Err(HardwareError::WrongType {
                name: name.to_string(),
                expected: PortKind::Servo,
                found: other.kind(),
            }),
        }
    }

    fn imu(&mut self, name: &str) -> Result<Box<dyn OrientationSensor>, HardwareError> {
        match self.claim(name, PortKind::Imu)? {
            SimDevice::Imu(imu) => Ok(Box::new(imu)),
            other => Err(HardwareError::WrongType {
                name: name.to_string(),
                expected: PortKind::Imu,
                found: other.kind(),
            }),
        }
    }
}
