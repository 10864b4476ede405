use super::{pwm, Bus};
use crate::errors::ProbeError;

const PERIOD: u16 = 4095;
const FREQ: u32 = 50;
/// Pulse width range for -90..=90 degrees, in microseconds.
const MIN_PULSE_US: f32 = 500.0;
const MAX_PULSE_US: f32 = 2500.0;
const FRAME_US: f32 = 20_000.0;

/// A hobby servo on one HAT PWM channel.
#[derive(Debug, Clone, Copy)]
pub struct Servo {
    pwm: pwm::Pwm,
}

impl Servo {
    /// Configure `channel`'s timer for 50 Hz servo frames.
    pub fn attach(bus: &mut dyn Bus, channel: u8) -> Result<Self, ProbeError> {
        let mut pwm = pwm::Pwm::new(channel)?;
        pwm.set_period(bus, PERIOD)?;
        pwm.set_prescaler(bus, prescaler())?;
        Ok(Self { pwm })
    }

    pub fn channel(&self) -> u8 {
        self.pwm.channel()
    }

    /// Move to `degrees`, clamped to [-90, 90].
    pub fn angle(
        &self,
        bus: &mut dyn Bus,
        degrees: f32,
    ) -> Result<(), ProbeError> {
        self.pwm.pulse_width(bus, duty_for_angle(degrees))
    }
}

fn prescaler() -> u16 {
    (pwm::CLOCK as f32 / FREQ as f32 / f32::from(PERIOD)) as u16
}

/// Duty register value for an angle.
pub fn duty_for_angle(degrees: f32) -> u16 {
    let degrees = degrees.max(-90.0).min(90.0);
    let pulse_us =
        (degrees + 90.0) / 180.0 * (MAX_PULSE_US - MIN_PULSE_US) + MIN_PULSE_US;
    (pulse_us / FRAME_US * f32::from(PERIOD)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hat::pwm::tests::RecordingBus;

    #[test]
    fn servo_frames_are_fifty_hertz() {
        assert_eq!(prescaler(), 351);
    }

    #[test]
    fn angle_to_duty() {
        assert_eq!(duty_for_angle(0.0), 307);
        assert_eq!(duty_for_angle(-90.0), 102);
        assert_eq!(duty_for_angle(90.0), 511);
    }

    #[test]
    fn angles_are_clamped() {
        assert_eq!(duty_for_angle(-200.0), duty_for_angle(-90.0));
        assert_eq!(duty_for_angle(135.0), duty_for_angle(90.0));
    }

    #[test]
    fn attach_then_center() {
        let mut bus = RecordingBus::default();
        let servo = Servo::attach(&mut bus, 2).unwrap();
        servo.angle(&mut bus, 0.0).unwrap();
        assert_eq!(
            bus.writes,
            vec![
                vec![0x44, 0x0f, 0xfe],
                vec![0x40, 0x01, 0x5e],
                vec![0x22, 0x01, 0x33],
            ]
        );
    }
}
