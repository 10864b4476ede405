//! The PiCar-X as wired on the Robot HAT.
use crate::{
    config::{HatConfig, ServoConfig},
    errors::ProbeError,
    hat::{motor::Motor, servo::Servo, Board, Bus, OutputLine},
};
use log::{debug, warn};
use std::time::Duration;
use tokio::time;

/// How long the MCU reset line is held in each state.
const RESET_HOLD: Duration = Duration::from_millis(10);

/// The three servos on a PiCar-X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Joint {
    Pan,
    Tilt,
    Steering,
}

impl Joint {
    pub const ALL: [Joint; 3] = [Joint::Pan, Joint::Tilt, Joint::Steering];

    pub fn label(self) -> &'static str {
        match self {
            Joint::Pan => "camera pan",
            Joint::Tilt => "camera tilt",
            Joint::Steering => "steering",
        }
    }
}

/// A connected car. Dropping it stops the motors.
pub struct PiCar {
    bus: Box<dyn Bus>,
    /// Held high while the car is in use.
    _reset: Box<dyn OutputLine>,
    i2c_bus: u8,
    left: Motor,
    right: Motor,
    pan: Servo,
    tilt: Servo,
    steering: Servo,
}

impl PiCar {
    /// Reset the HAT MCU, find it on the bus and configure every motor and
    /// servo channel. Nothing moves yet.
    pub async fn connect(
        board: &mut dyn Board,
        hat: &HatConfig,
        servos: &ServoConfig,
    ) -> Result<Self, ProbeError> {
        let mut reset = board.line(hat.reset_pin)?;
        reset.set(false)?;
        time::sleep(RESET_HOLD).await;
        reset.set(true)?;
        time::sleep(RESET_HOLD).await;
        debug!("reset robot hat mcu");

        let mut bus = board.bus()?;
        let [left_pwm, right_pwm] = hat.motor_pwm_channels;
        let [left_dir, right_dir] = hat.motor_dir_pins;
        let [left_cal, right_cal] = hat.motor_calibration;
        let left =
            Motor::attach(&mut *bus, left_pwm, board.line(left_dir)?, left_cal)?;
        let right = Motor::attach(
            &mut *bus,
            right_pwm,
            board.line(right_dir)?,
            right_cal,
        )?;
        let pan = Servo::attach(&mut *bus, servos.pan_channel)?;
        let tilt = Servo::attach(&mut *bus, servos.tilt_channel)?;
        let steering = Servo::attach(&mut *bus, servos.steering_channel)?;

        Ok(Self {
            bus,
            _reset: reset,
            i2c_bus: board.bus_number(),
            left,
            right,
            pan,
            tilt,
            steering,
        })
    }

    /// Where the HAT was found, as `i2c-<bus> at 0x<addr>`.
    pub fn location(&self) -> String {
        format!("i2c-{} at {:#04x}", self.i2c_bus, self.bus.address())
    }

    /// Drive straight ahead. The right motor is mounted mirrored, so it turns
    /// the opposite way.
    pub fn forward(&mut self, speed: u8) -> Result<(), ProbeError> {
        let speed = i16::from(speed);
        self.left.speed(&mut *self.bus, speed)?;
        self.right.speed(&mut *self.bus, -speed)
    }

    pub fn stop(&mut self) -> Result<(), ProbeError> {
        // The MCU occasionally drops a write right after a speed change.
        for _ in 0..2 {
            self.left.speed(&mut *self.bus, 0)?;
            self.right.speed(&mut *self.bus, 0)?;
        }
        Ok(())
    }

    pub fn set_angle(
        &mut self,
        joint: Joint,
        degrees: f32,
    ) -> Result<(), ProbeError> {
        let servo = match joint {
            Joint::Pan => self.pan,
            Joint::Tilt => self.tilt,
            Joint::Steering => self.steering,
        };
        debug!("{} servo on P{} -> {}", joint.label(), servo.channel(), degrees);
        servo.angle(&mut *self.bus, degrees)
    }
}

impl Drop for PiCar {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!("failed to stop motors: {}", err);
        }
    }
}
