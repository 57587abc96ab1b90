use tracing::{debug, info};

use super::Subsystem;
use crate::config::{KickerPosition, KickerPresets, RobotConfig};
use crate::hardware::{HardwareError, HardwareMap, ServoPort};

/// Ring kicker on a servo, moved between the "in" and "out" presets
pub struct Kicker {
    servo: Box<dyn ServoPort>,
    presets: KickerPresets,
    target: f64,
}

impl Subsystem for Kicker {
    fn bind(hardware: &mut dyn HardwareMap, config: &RobotConfig) -> Result<Self, HardwareError> {
        let servo = hardware.servo(&config.ports.kicker)?;
        info!("Kicker bound to '{}'", config.ports.kicker);
        Ok(Self {
            servo,
            presets: config.kicker,
            target: config.kicker.position(KickerPosition::In),
        })
    }

    fn name(&self) -> &'static str {
        "kicker"
    }

    fn update(&mut self) {
        self.servo.set_position(self.target);
    }
}

impl Kicker {
    pub fn set_target_pos(&mut self, target: f64) {
        self.target = target;
        debug!("Kicker target staged: {}", target);
    }

    pub fn set_preset(&mut self, preset: KickerPosition) {
        self.set_target_pos(self.presets.position(preset));
    }

    pub fn target_pos(&self) -> f64 {
        self.target
    }

    /// Last position written to the servo
    pub fn current_pos(&self) -> f64 {
        self.servo.position()
    }

    /// Move to the preset farther from the staged target: a target nearer
    /// "in" goes "out", anything else goes "in"
    pub fn toggle_pos(&mut self) {
        let to_in = (self.target - self.presets.in_pos).abs();
        let to_out = (self.target - self.presets.out_pos).abs();
        let next = if to_in < to_out {
            KickerPosition::Out
        } else {
            KickerPosition::In
        };
        self.set_preset(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::{SimHardwareMap, SimServo};

    fn setup() -> (Kicker, SimServo) {
        let mut map = SimHardwareMap::standard();
        let probe = map.servo_probe("kicker").unwrap();
        let kicker = Kicker::bind(&mut map, &RobotConfig::default()).unwrap();
        (kicker, probe)
    }

    #[test]
    fn test_starts_in() {
        let (mut kicker, probe) = setup();
        assert_eq!(kicker.target_pos(), 0.60);
        kicker.update();
        assert_eq!(probe.position(), 0.60);
        assert_eq!(kicker.current_pos(), 0.60);
    }

    #[test]
    fn test_toggle_alternates() {
        let (mut kicker, _probe) = setup();
        kicker.toggle_pos();
        assert_eq!(kicker.target_pos(), 0.40);
        kicker.toggle_pos();
        assert_eq!(kicker.target_pos(), 0.60);
        kicker.toggle_pos();
        assert_eq!(kicker.target_pos(), 0.40);
    }

    #[test]
    fn test_toggle_from_arbitrary_target() {
        let (mut kicker, _probe) = setup();
        kicker.set_target_pos(0.9);
        kicker.toggle_pos();
        assert_eq!(kicker.target_pos(), 0.40);

        kicker.set_target_pos(0.1);
        kicker.toggle_pos();
        assert_eq!(kicker.target_pos(), 0.60);
    }

    #[test]
    fn test_target_only_reaches_servo_on_update() {
        let (mut kicker, probe) = setup();
        kicker.set_preset(KickerPosition::Out);
        assert_eq!(probe.position(), 0.0);
        kicker.update();
        assert_eq!(probe.position(), 0.40);
    }
}
