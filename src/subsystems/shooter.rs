use tracing::{debug, info};

use super::Subsystem;
use crate::config::{PowerLevel, RobotConfig, ShooterPresets};
use crate::hardware::{Direction, HardwareError, HardwareMap, MotorPort};

/// Flywheel shooter
///
/// The staged power is only applied while the shooter is armed. Disarming
/// keeps the power, so re-arming resumes at the last set level. Motor
/// direction is staged separately and is unrelated to arming.
pub struct Shooter {
    motor: Box<dyn MotorPort>,
    presets: ShooterPresets,
    power: f64,
    armed: bool,
    direction: Direction,
}

impl Subsystem for Shooter {
    fn bind(hardware: &mut dyn HardwareMap, config: &RobotConfig) -> Result<Self, HardwareError> {
        let mut motor = hardware.motor(&config.ports.shooter)?;
        motor.set_direction(Direction::Forward);
        info!("Shooter bound to '{}'", config.ports.shooter);
        Ok(Self {
            motor,
            presets: config.shooter,
            power: config.shooter.power(PowerLevel::Far),
            armed: false,
            direction: Direction::Forward,
        })
    }

    fn name(&self) -> &'static str {
        "shooter"
    }

    fn update(&mut self) {
        let gate = if self.armed { 1.0 } else { 0.0 };
        self.motor.set_direction(self.direction);
        self.motor.set_power(self.power * gate);
    }
}

impl Shooter {
    pub fn set_power(&mut self, power: f64) {
        self.power = power;
        debug!("Shooter power staged: {}", power);
    }

    /// Stage the power of a named preset
    pub fn set_power_level(&mut self, level: PowerLevel) {
        self.set_power(self.presets.power(level));
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn set_armed(&mut self, armed: bool) {
        self.armed = armed;
        debug!("Shooter armed: {}", armed);
    }

    pub fn toggle_armed(&mut self) {
        self.set_armed(!self.armed);
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Invert the staged motor direction
    pub fn reverse(&mut self) {
        self.direction = self.direction.inverted();
        debug!("Shooter direction: {:?}", self.direction);
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::{SimHardwareMap, SimMotor};

    fn setup() -> (Shooter, SimMotor) {
        let mut map = SimHardwareMap::standard();
        let probe = map.motor_probe("shooter").unwrap();
        let shooter = Shooter::bind(&mut map, &RobotConfig::default()).unwrap();
        (shooter, probe)
    }

    #[test]
    fn test_defaults_to_far_and_disarmed() {
        let (mut shooter, probe) = setup();
        assert_eq!(shooter.power(), 0.85);
        assert!(!shooter.is_armed());
        shooter.update();
        assert_eq!(probe.state().power, 0.0);
    }

    #[test]
    fn test_arming_gates_power() {
        let (mut shooter, probe) = setup();
        shooter.set_power(0.85);
        shooter.set_armed(false);
        shooter.update();
        assert_eq!(probe.state().power, 0.0);

        shooter.set_armed(true);
        shooter.update();
        assert_eq!(probe.state().power, 0.85);
    }

    #[test]
    fn test_rearm_resumes_last_power() {
        let (mut shooter, probe) = setup();
        shooter.set_power_level(PowerLevel::PowerShot);
        shooter.toggle_armed();
        shooter.update();
        shooter.toggle_armed();
        shooter.update();
        assert_eq!(probe.state().power, 0.0);

        shooter.toggle_armed();
        shooter.update();
        assert_eq!(probe.state().power, 0.60);
    }

    #[test]
    fn test_reverse_flips_direction_not_arming() {
        let (mut shooter, probe) = setup();
        shooter.set_armed(true);
        shooter.reverse();
        assert_eq!(probe.state().direction, Direction::Forward);
        shooter.update();
        assert_eq!(probe.state().direction, Direction::Reverse);
        assert!(shooter.is_armed());
        assert_eq!(probe.state().power, 0.85);

        shooter.reverse();
        shooter.update();
        assert_eq!(probe.state().direction, Direction::Forward);
    }

    #[test]
    fn test_power_level_presets() {
        let (mut shooter, _probe) = setup();
        shooter.set_power_level(PowerLevel::Short);
        assert_eq!(shooter.power(), 0.75);
        // Any power is accepted, preset or not
        shooter.set_power(0.123);
        assert_eq!(shooter.power(), 0.123);
    }
}
