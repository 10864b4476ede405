use super::{pwm, Bus, OutputLine};
use crate::errors::ProbeError;

const PERIOD: u16 = 4095;
const PRESCALER: u16 = 10;

/// A DC motor: one PWM channel for speed, one GPIO line for direction.
pub struct Motor {
    pwm: pwm::Pwm,
    direction: Box<dyn OutputLine>,
    /// `1` or `-1`; flips the meaning of forward for motors wired backwards.
    calibration: i8,
}

impl Motor {
    pub fn attach(
        bus: &mut dyn Bus,
        channel: u8,
        direction: Box<dyn OutputLine>,
        calibration: i8,
    ) -> Result<Self, ProbeError> {
        let mut pwm = pwm::Pwm::new(channel)?;
        pwm.set_period(bus, PERIOD)?;
        pwm.set_prescaler(bus, PRESCALER)?;
        Ok(Self {
            pwm,
            direction,
            calibration: if calibration < 0 { -1 } else { 1 },
        })
    }

    /// Drive at `speed` in [-100, 100]. Negative runs the motor in reverse.
    pub fn speed(
        &mut self,
        bus: &mut dyn Bus,
        speed: i16,
    ) -> Result<(), ProbeError> {
        let speed = speed.max(-100).min(100);
        let reverse = (speed < 0) != (self.calibration < 0);
        self.direction.set(reverse)?;
        self.pwm.pulse_width_percent(bus, duty_percent(speed))
    }
}

/// The motors barely turn below half duty, so any non-zero speed is mapped
/// into the 50-100 % band.
pub fn duty_percent(speed: i16) -> f32 {
    match speed.saturating_abs() {
        0 => 0.0,
        s => f32::from(s / 2 + 50),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hat::pwm::tests::RecordingBus;
    use std::{cell::RefCell, rc::Rc};

    struct Line(Rc<RefCell<Vec<bool>>>);

    impl OutputLine for Line {
        fn set(&mut self, high: bool) -> Result<(), ProbeError> {
            self.0.borrow_mut().push(high);
            Ok(())
        }
    }

    #[test]
    fn speed_scaling() {
        assert_eq!(duty_percent(0), 0.0);
        assert_eq!(duty_percent(10), 55.0);
        assert_eq!(duty_percent(-10), 55.0);
        assert_eq!(duty_percent(100), 100.0);
        assert_eq!(duty_percent(1), 50.0);
    }

    #[test]
    fn direction_follows_sign_and_calibration() {
        let levels = Rc::new(RefCell::new(vec![]));
        let mut bus = RecordingBus::default();
        let mut motor =
            Motor::attach(&mut bus, 13, Box::new(Line(levels.clone())), 1)
                .unwrap();
        motor.speed(&mut bus, 10).unwrap();
        motor.speed(&mut bus, -10).unwrap();

        let mut flipped =
            Motor::attach(&mut bus, 12, Box::new(Line(levels.clone())), -1)
                .unwrap();
        flipped.speed(&mut bus, 10).unwrap();

        assert_eq!(*levels.borrow(), vec![false, true, true]);
    }

    #[test]
    fn speed_writes_scaled_duty() {
        let mut bus = RecordingBus::default();
        let line = Box::new(Line(Rc::new(RefCell::new(vec![]))));
        let mut motor = Motor::attach(&mut bus, 13, line, 1).unwrap();
        motor.speed(&mut bus, 10).unwrap();
        assert_eq!(bus.writes.last().unwrap(), &vec![0x2d, 0x08, 0xcc]);
    }
}
