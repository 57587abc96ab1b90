use tracing::{debug, info};

use super::Subsystem;
use crate::config::RobotConfig;
use crate::hardware::{HardwareError, HardwareMap, MotorPort};

/// Intake roller: one motor, a staged power and a reverse flag
pub struct Intake {
    motor: Box<dyn MotorPort>,
    power: f64,
    reverse: bool,
}

impl Subsystem for Intake {
    fn bind(hardware: &mut dyn HardwareMap, config: &RobotConfig) -> Result<Self, HardwareError> {
        let motor = hardware.motor(&config.ports.intake)?;
        info!("Intake bound to '{}'", config.ports.intake);
        Ok(Self {
            motor,
            power: 0.0,
            reverse: false,
        })
    }

    fn name(&self) -> &'static str {
        "intake"
    }

    fn update(&mut self) {
        let sign = if self.reverse { -1.0 } else { 1.0 };
        self.motor.set_power(self.power * sign);
    }
}

impl Intake {
    pub fn set_power(&mut self, power: f64) {
        self.power = power;
        debug!("Intake power staged: {}", power);
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
    }

    /// Flip the reverse flag, keeping the staged power
    pub fn reverse(&mut self) {
        self.reverse = !self.reverse;
        debug!("Intake reverse: {}", self.reverse);
    }

    pub fn is_reversed(&self) -> bool {
        self.reverse
    }
}
