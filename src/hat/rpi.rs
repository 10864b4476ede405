use super::{Board, Bus, OutputLine};
use crate::errors::ProbeError;
use log::{debug, trace};
use rppal::{
    gpio::{Gpio, OutputPin},
    i2c::I2c,
};

/// Robot HAT resources on a Raspberry Pi, through `/dev/i2c-*` and the GPIO
/// character device.
pub struct RpiBoard {
    /// I2C bus number. The HAT is on bus 1 on every supported Pi.
    i2c_bus: u8,
    /// Candidate MCU addresses, tried in order.
    addresses: Vec<u16>,
}

impl RpiBoard {
    pub fn new(i2c_bus: u8, addresses: Vec<u16>) -> Self {
        Self { i2c_bus, addresses }
    }
}

impl Board for RpiBoard {
    fn bus(&mut self) -> Result<Box<dyn Bus>, ProbeError> {
        let mut i2c = I2c::with_bus(self.i2c_bus)?;
        for &addr in &self.addresses {
            i2c.set_slave_address(addr)?;
            // The MCU answers a plain receive; an absent address NACKs.
            match i2c.smbus_receive_byte() {
                Ok(_) => {
                    debug!("robot hat answered at {:#04x}", addr);
                    return Ok(Box::new(RpiBus { i2c, addr }));
                }
                Err(err) => trace!("no answer at {:#04x}: {}", addr, err),
            }
        }
        let tried = self
            .addresses
            .iter()
            .map(|a| format!("{:#04x}", a))
            .collect::<Vec<_>>()
            .join(", ");
        Err(ProbeError::Unavailable(format!(
            "no Robot HAT found on i2c-{} (tried {})",
            self.i2c_bus, tried
        )))
    }

    fn line(&mut self, bcm: u8) -> Result<Box<dyn OutputLine>, ProbeError> {
        let pin = Gpio::new()?.get(bcm)?.into_output();
        debug!("claimed gpio {}", bcm);
        Ok(Box::new(RpiLine { pin }))
    }

    fn bus_number(&self) -> u8 {
        self.i2c_bus
    }
}

struct RpiBus {
    i2c: I2c,
    addr: u16,
}

impl Bus for RpiBus {
    fn address(&self) -> u16 {
        self.addr
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), ProbeError> {
        let written = self.i2c.write(bytes)?;
        if written != bytes.len() {
            return Err(ProbeError::Fault(format!(
                "short i2c write: {} of {} bytes",
                written,
                bytes.len()
            )));
        }
        Ok(())
    }
}

struct RpiLine {
    pin: OutputPin,
}

impl OutputLine for RpiLine {
    fn set(&mut self, high: bool) -> Result<(), ProbeError> {
        if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
        Ok(())
    }
}
