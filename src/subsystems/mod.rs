// Robot subsystems
//
// Each subsystem owns the ports it resolved at bind time and keeps a staged
// copy of its desired state. Mutators only overwrite the staged state; the
// single `update` call per cycle commits it to hardware. Staged state is never
// cleared by `update`, so committing twice writes the same values twice.

mod drive;
mod intake;
mod kicker;
pub mod kinematics;
mod shooter;

pub use drive::{Drive, DriveError};
pub use intake::Intake;
pub use kicker::Kicker;
pub use kinematics::{SpeedMode, WheelPowers};
pub use shooter::Shooter;

use crate::config::RobotConfig;
use crate::hardware::{HardwareError, HardwareMap};

/// Lifecycle shared by every subsystem
pub trait Subsystem {
    /// Resolve ports and run one-time hardware configuration
    fn bind(hardware: &mut dyn HardwareMap, config: &RobotConfig) -> Result<Self, HardwareError>
    where
        Self: Sized;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Commit the staged state to hardware. Called exactly once per cycle.
    fn update(&mut self);
}
