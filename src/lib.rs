// Actuator control for a mecanum-drive robot: subsystems that stage commands
// and commit them to hardware once per control cycle.

pub mod autonomous;
pub mod config;
pub mod hardware;
pub mod robot;
pub mod runtime;
pub mod scheduler;
pub mod subsystems;
pub mod telemetry;
