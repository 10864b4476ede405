use super::Env;
use crate::{car::PiCar, errors::ProbeError};
use tokio::time;

/// Drive forward briefly and stop.
pub async fn run(env: &mut Env<'_>) -> Result<(), ProbeError> {
    let config = env.config;
    let mut car = PiCar::connect(&mut *env.board, &config.hat, &config.servo)
        .await?;
    env.printer
        .pass(format!("Robot HAT found on {}", car.location()))?;
    env.printer.pass("PiCar-X initialized successfully")?;

    env.printer.line("Testing basic movement...")?;
    car.forward(config.chassis.speed)?;
    time::sleep(config.chassis.drive_time()).await;
    car.stop()?;
    env.printer.pass("Basic movement test completed")?;
    Ok(())
}
