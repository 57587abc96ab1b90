// Keyboard teleop on simulated hardware
// W/S drive, A/D strafe, Z/X twist, C slow mode, Space stop,
// I intake on/off, R intake reverse, F shooter arm, V shooter reverse,
// K kicker, 1/2/3 shooter preset, Q quit
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mecanum_runtime::config::{PowerLevel, RobotConfig};
use mecanum_runtime::hardware::SimHardwareMap;
use mecanum_runtime::robot::Robot;

const MOTION: f64 = 0.8;
const INTAKE_POWER: f64 = 1.0;
const INPUT_TIMEOUT_MS: u64 = 100; // Reset motion after this much time with no input
const TELEMETRY_EVERY: u64 = 50;

/// Motion components held between key events
#[derive(Default)]
struct Motion {
    drive: f64,
    strafe: f64,
    twist: f64,
    slow: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // The sim carries an orientation sensor, so report heading
    let config = RobotConfig {
        use_imu: true,
        ..RobotConfig::default()
    };
    let mut hardware = SimHardwareMap::standard();
    let mut robot = Robot::bind(&mut hardware, &config)?;

    info!("Controls: WASD=move, Z/X=twist, C=slow, Space=stop, I/R=intake, F/V=shooter, K=kicker, 1-3=preset, Q=quit");

    enable_raw_mode()?;
    let result = run_teleop(&mut robot, &hardware).await;
    disable_raw_mode()?;

    robot.drive.stop();
    result
}

async fn run_teleop(
    robot: &mut Robot,
    hardware: &SimHardwareMap,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut tick = interval(robot.scheduler().period());
    let mut motion = Motion::default();
    let mut last_movement_input = Instant::now();

    loop {
        tick.tick().await;

        // Drain every pending key without blocking the cycle
        while event::poll(Duration::ZERO)? {
            let Event::Key(KeyEvent { code, kind, .. }) = event::read()? else {
                continue;
            };
            if kind != KeyEventKind::Press && kind != KeyEventKind::Repeat {
                continue;
            }

            match code {
                // Movement - update motion and refresh timestamp
                KeyCode::Char('w') => {
                    motion.drive = MOTION;
                    last_movement_input = Instant::now();
                }
                KeyCode::Char('s') => {
                    motion.drive = -MOTION;
                    last_movement_input = Instant::now();
                }
                KeyCode::Char('a') => {
                    motion.strafe = -MOTION;
                    last_movement_input = Instant::now();
                }
                KeyCode::Char('d') => {
                    motion.strafe = MOTION;
                    last_movement_input = Instant::now();
                }
                KeyCode::Char('z') => {
                    motion.twist = -MOTION;
                    last_movement_input = Instant::now();
                }
                KeyCode::Char('x') => {
                    motion.twist = MOTION;
                    last_movement_input = Instant::now();
                }
                KeyCode::Char('c') => {
                    motion.slow = !motion.slow;
                    info!("Slow mode: {}", motion.slow);
                }
                KeyCode::Char(' ') => {
                    motion = Motion {
                        slow: motion.slow,
                        ..Motion::default()
                    };
                    robot.drive.stop();
                }

                // Mechanisms
                KeyCode::Char('i') => {
                    let power = if robot.intake.power() == 0.0 { INTAKE_POWER } else { 0.0 };
                    robot.intake.set_power(power);
                }
                KeyCode::Char('r') => robot.intake.reverse(),
                KeyCode::Char('f') => robot.shooter.toggle_armed(),
                KeyCode::Char('v') => robot.shooter.reverse(),
                KeyCode::Char('k') => robot.kicker.toggle_pos(),
                KeyCode::Char('1') => robot.shooter.set_power_level(PowerLevel::Far),
                KeyCode::Char('2') => robot.shooter.set_power_level(PowerLevel::Short),
                KeyCode::Char('3') => robot.shooter.set_power_level(PowerLevel::PowerShot),

                // Quit
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),

                _ => {}
            }
        }

        // Reset motion if no movement input for INPUT_TIMEOUT_MS
        if last_movement_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS) {
            motion.drive = 0.0;
            motion.strafe = 0.0;
            motion.twist = 0.0;
        }

        robot
            .drive
            .set_mecanum_power(motion.drive, motion.strafe, motion.twist, motion.slow);
        robot.periodic();
        hardware.step();

        let cycle = robot.scheduler().cycle();
        if cycle % TELEMETRY_EVERY == 0 {
            info!("telemetry {}", serde_json::to_string(&robot.telemetry())?);
        }
    }
}
