//! Driver for the Robot HAT that carries the PiCar-X motors and servos.
//!
//! The HAT's MCU sits on I2C and exposes twenty PWM channels (P0-P19) as
//! 16-bit registers. Motor direction and the MCU reset line are plain GPIO
//! outputs on the Pi itself.

pub mod motor;
pub mod pwm;
pub mod servo;
mod rpi;

pub use rpi::RpiBoard;

use crate::errors::ProbeError;

/// Raw byte writes to the HAT MCU.
pub trait Bus {
    /// I2C address the bus is talking to.
    fn address(&self) -> u16;

    fn write(&mut self, bytes: &[u8]) -> Result<(), ProbeError>;
}

/// A single GPIO output line.
pub trait OutputLine {
    fn set(&mut self, high: bool) -> Result<(), ProbeError>;
}

/// Source of HAT resources. Implemented by [RpiBoard] on real hardware and by
/// recording fakes in tests.
pub trait Board {
    /// Open the I2C bus and locate the HAT MCU on it.
    fn bus(&mut self) -> Result<Box<dyn Bus>, ProbeError>;

    /// Claim a GPIO line, numbered by BCM pin.
    fn line(&mut self, bcm: u8) -> Result<Box<dyn OutputLine>, ProbeError>;

    /// The I2C bus number, for diagnostics.
    fn bus_number(&self) -> u8;
}
