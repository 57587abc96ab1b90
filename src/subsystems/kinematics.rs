// Mecanum drive kinematics for a four-wheel chassis
// Converts drive/strafe/twist components into individual wheel powers.
//
// Wheel powers are not normalized or clamped: a command whose components sum
// past 1.0 produces out-of-range powers and the motor layer decides what to do
// with them.

use serde::Serialize;

use crate::config::{FAST, SLOW};

/// Drive speed mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedMode {
    Slow,
    #[default]
    Fast,
}

impl SpeedMode {
    pub fn from_slow(slow: bool) -> Self {
        if slow { SpeedMode::Slow } else { SpeedMode::Fast }
    }

    /// Multiplier applied to every wheel power
    pub fn factor(self) -> f64 {
        match self {
            SpeedMode::Slow => SLOW,
            SpeedMode::Fast => FAST,
        }
    }
}

/// Power for each of the four drive wheels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WheelPowers {
    pub front_left: f64,
    pub front_right: f64,
    pub rear_left: f64,
    pub rear_right: f64,
}

impl WheelPowers {
    pub fn new(front_left: f64, front_right: f64, rear_left: f64, rear_right: f64) -> Self {
        Self {
            front_left,
            front_right,
            rear_left,
            rear_right,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Both wheels on a side get the same power
    pub fn tank(left: f64, right: f64) -> Self {
        Self::new(left, right, left, right)
    }

    /// Opposite corners get the same power: front-left and rear-right take
    /// `fl_rr`, front-right and rear-left take `fr_rl`
    pub fn diagonal(fl_rr: f64, fr_rl: f64) -> Self {
        Self::new(fl_rr, fr_rl, fr_rl, fl_rr)
    }

    /// Holonomic mapping from body motion to wheel powers
    ///
    /// # Arguments
    /// * `drive` - Forward/backward component (positive = forward)
    /// * `strafe` - Sideways component (positive = right)
    /// * `twist` - Rotation component (positive = clockwise)
    /// * `mode` - Speed mode whose factor scales every wheel
    pub fn mecanum(drive: f64, strafe: f64, twist: f64, mode: SpeedMode) -> Self {
        let k = mode.factor();
        Self {
            front_left: (drive + strafe + twist) * k,
            front_right: (drive - strafe - twist) * k,
            rear_left: (drive - strafe + twist) * k,
            rear_right: (drive + strafe - twist) * k,
        }
    }

    /// Returns powers as array [front_left, front_right, rear_left, rear_right]
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.front_left,
            self.front_right,
            self.rear_left,
            self.rear_right,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_motion() {
        assert_eq!(
            WheelPowers::mecanum(0.0, 0.0, 0.0, SpeedMode::Fast),
            WheelPowers::zero()
        );
    }

    #[test]
    fn test_pure_drive_moves_all_wheels_together() {
        let wheels = WheelPowers::mecanum(0.5, 0.0, 0.0, SpeedMode::Fast);
        assert_eq!(wheels.as_array(), [0.5; 4]);
    }

    #[test]
    fn test_pure_strafe_pairs_diagonals() {
        // Strafing right: front-left/rear-right forward, the other diagonal back
        let wheels = WheelPowers::mecanum(0.0, 0.5, 0.0, SpeedMode::Fast);
        assert_eq!(wheels, WheelPowers::diagonal(0.5, -0.5));
    }

    #[test]
    fn test_pure_twist_spins_sides_against_each_other() {
        let wheels = WheelPowers::mecanum(0.0, 0.0, 0.5, SpeedMode::Fast);
        assert_eq!(wheels, WheelPowers::tank(0.5, -0.5));
    }

    #[test]
    fn test_linear_equations_hold_for_sampled_inputs() {
        let samples = [-1.0, -0.35, 0.0, 0.2, 0.75, 1.0];
        for &drive in &samples {
            for &strafe in &samples {
                for &twist in &samples {
                    for mode in [SpeedMode::Slow, SpeedMode::Fast] {
                        let k = if mode == SpeedMode::Slow { 0.4 } else { 1.0 };
                        let w = WheelPowers::mecanum(drive, strafe, twist, mode);
                        assert_eq!(w.front_left, (drive + strafe + twist) * k);
                        assert_eq!(w.front_right, (drive - strafe - twist) * k);
                        assert_eq!(w.rear_left, (drive - strafe + twist) * k);
                        assert_eq!(w.rear_right, (drive + strafe - twist) * k);
                    }
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_sums_are_not_clamped() {
        let wheels = WheelPowers::mecanum(1.0, 1.0, 1.0, SpeedMode::Fast);
        assert_eq!(wheels.front_left, 3.0);
        assert_eq!(wheels.front_right, -1.0);
    }

    #[test]
    fn test_speed_mode_factors() {
        assert_eq!(SpeedMode::from_slow(true).factor(), 0.4);
        assert_eq!(SpeedMode::from_slow(false).factor(), 1.0);
        assert_eq!(SpeedMode::default(), SpeedMode::Fast);
    }
}
