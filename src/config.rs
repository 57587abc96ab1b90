// Loop rate, port names, speed factors and preset values
use std::path::Path;

use serde::Deserialize;

// Runtime loop frequency
pub const LOOP_HZ: u64 = 50;

// Fastest loop the scheduler can time (1 ms period)
pub const MAX_LOOP_HZ: u64 = 1000;

// Named hardware ports
pub const PORT_FL_DRIVE: &str = "fl_drive";
pub const PORT_FR_DRIVE: &str = "fr_drive";
pub const PORT_RL_DRIVE: &str = "rl_drive";
pub const PORT_RR_DRIVE: &str = "rr_drive";
pub const PORT_IMU: &str = "imu";
pub const PORT_INTAKE: &str = "intake";
pub const PORT_SHOOTER: &str = "shooter";
pub const PORT_KICKER: &str = "kicker";

// Drive speed multipliers
pub const SLOW: f64 = 0.4;
pub const FAST: f64 = 1.0;

/// Encoder counts per inch of travel, measured as 1000 counts every 24 inches
pub const COUNTS_PER_INCH: f64 = 1000.0 / 24.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Loop rate {0} Hz is outside 1..={MAX_LOOP_HZ} Hz")]
    InvalidLoopRate(u64),
}

/// Names under which each subsystem resolves its ports
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortNames {
    pub fl_drive: String,
    pub fr_drive: String,
    pub rl_drive: String,
    pub rr_drive: String,
    pub imu: String,
    pub intake: String,
    pub shooter: String,
    pub kicker: String,
}

impl Default for PortNames {
    fn default() -> Self {
        Self {
            fl_drive: PORT_FL_DRIVE.to_string(),
            fr_drive: PORT_FR_DRIVE.to_string(),
            rl_drive: PORT_RL_DRIVE.to_string(),
            rr_drive: PORT_RR_DRIVE.to_string(),
            imu: PORT_IMU.to_string(),
            intake: PORT_INTAKE.to_string(),
            shooter: PORT_SHOOTER.to_string(),
            kicker: PORT_KICKER.to_string(),
        }
    }
}

/// Named shooter power levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerLevel {
    Far,
    Short,
    PowerShot,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ShooterPresets {
    pub far: f64,
    pub short: f64,
    pub power_shot: f64,
}

impl Default for ShooterPresets {
    fn default() -> Self {
        Self {
            far: 0.85,
            short: 0.75,
            power_shot: 0.60,
        }
    }
}

impl ShooterPresets {
    pub fn power(&self, level: PowerLevel) -> f64 {
        match level {
            PowerLevel::Far => self.far,
            PowerLevel::Short => self.short,
            PowerLevel::PowerShot => self.power_shot,
        }
    }
}

/// Named kicker servo positions on the normalized [0, 1] range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickerPosition {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct KickerPresets {
    #[serde(rename = "in")]
    pub in_pos: f64,
    #[serde(rename = "out")]
    pub out_pos: f64,
}

impl Default for KickerPresets {
    fn default() -> Self {
        Self {
            in_pos: 0.60,
            out_pos: 0.40,
        }
    }
}

impl KickerPresets {
    pub fn position(&self, preset: KickerPosition) -> f64 {
        match preset {
            KickerPosition::In => self.in_pos,
            KickerPosition::Out => self.out_pos,
        }
    }
}

/// Full robot configuration. Every field falls back to its default when
/// missing from the JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub loop_hz: u64,
    pub ports: PortNames,
    pub use_imu: bool,
    pub shooter: ShooterPresets,
    pub kicker: KickerPresets,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            loop_hz: LOOP_HZ,
            ports: PortNames::default(),
            use_imu: false,
            shooter: ShooterPresets::default(),
            kicker: KickerPresets::default(),
        }
    }
}

impl RobotConfig {
    /// Load a config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_LOOP_HZ).contains(&self.loop_hz) {
            return Err(ConfigError::InvalidLoopRate(self.loop_hz));
        }
        Ok(())
    }
}
