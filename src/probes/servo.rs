use super::Env;
use crate::{
    car::{Joint, PiCar},
    errors::ProbeError,
};
use tokio::time;

/// Move the pan, tilt and steering servos to the configured angle.
pub async fn run(env: &mut Env<'_>) -> Result<(), ProbeError> {
    env.printer.blank()?;
    env.printer.line("Testing servo functionality...")?;
    let config = env.config;
    let mut car = PiCar::connect(&mut *env.board, &config.hat, &config.servo)
        .await?;

    for joint in Joint::ALL.iter().copied() {
        env.printer
            .line(format!("Testing {} servo...", joint.label()))?;
        car.set_angle(joint, f32::from(config.servo.angle))?;
        time::sleep(config.servo.settle_time()).await;
        env.printer
            .pass(format!("{} servo test completed", capitalize(joint.label())))?;
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::capitalize;

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("camera pan"), "Camera pan");
        assert_eq!(capitalize(""), "");
    }
}
