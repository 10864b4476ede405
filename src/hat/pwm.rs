//! PWM channels of the Robot HAT MCU.
//!
//! Channels share timers: P0-P15 in groups of four on timers 0-3, P16/P17 on
//! timer 4, P18 on timer 5 and P19 on timer 6. Prescaler and period are per
//! timer, duty is per channel. Every write is `[register, high, low]`.
use super::Bus;
use crate::errors::ProbeError;
use log::trace;

/// MCU timer clock in Hz.
pub const CLOCK: u32 = 72_000_000;
/// Highest PWM channel on the HAT.
pub const MAX_CHANNEL: u8 = 19;

const REG_CHN: u8 = 0x20;
const REG_PSC: u8 = 0x40;
const REG_ARR: u8 = 0x44;
const REG_PSC2: u8 = 0x50;
const REG_ARR2: u8 = 0x54;

/// One PWM output, identified by its channel number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pwm {
    channel: u8,
    /// Auto-reload value last written to this channel's timer.
    period: u16,
}

impl Pwm {
    pub fn new(channel: u8) -> Result<Self, ProbeError> {
        if channel > MAX_CHANNEL {
            return Err(ProbeError::Fault(format!(
                "PWM channel P{} does not exist",
                channel
            )));
        }
        Ok(Self { channel, period: 0 })
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Timer driving this channel.
    pub fn timer(&self) -> u8 {
        timer_of(self.channel)
    }

    fn prescaler_register(&self) -> u8 {
        match self.timer() {
            t @ 0..=3 => REG_PSC + t,
            t => REG_PSC2 + t - 4,
        }
    }

    fn period_register(&self) -> u8 {
        match self.timer() {
            t @ 0..=3 => REG_ARR + t,
            t => REG_ARR2 + t - 4,
        }
    }

    /// Set the timer period (auto-reload value).
    pub fn set_period(
        &mut self,
        bus: &mut dyn Bus,
        period: u16,
    ) -> Result<(), ProbeError> {
        self.period = period;
        write_register(bus, self.period_register(), period.saturating_sub(1))
    }

    pub fn set_prescaler(
        &mut self,
        bus: &mut dyn Bus,
        prescaler: u16,
    ) -> Result<(), ProbeError> {
        write_register(
            bus,
            self.prescaler_register(),
            prescaler.saturating_sub(1),
        )
    }

    /// Set the raw duty value for this channel.
    pub fn pulse_width(
        &self,
        bus: &mut dyn Bus,
        value: u16,
    ) -> Result<(), ProbeError> {
        write_register(bus, REG_CHN + self.channel, value)
    }

    /// Set the duty as a percentage of the period.
    pub fn pulse_width_percent(
        &self,
        bus: &mut dyn Bus,
        percent: f32,
    ) -> Result<(), ProbeError> {
        let value = (percent / 100.0 * f32::from(self.period)) as u16;
        self.pulse_width(bus, value)
    }
}

/// Timer shared by `channel` and its neighbours. Channels on the same timer
/// share prescaler and period.
pub fn timer_of(channel: u8) -> u8 {
    match channel {
        0..=15 => channel / 4,
        16 | 17 => 4,
        18 => 5,
        _ => 6,
    }
}

fn write_register(
    bus: &mut dyn Bus,
    register: u8,
    value: u16,
) -> Result<(), ProbeError> {
    trace!("i2c {:#04x}: reg {:#04x} <- {}", bus.address(), register, value);
    bus.write(&[register, (value >> 8) as u8, (value & 0xff) as u8])
}
