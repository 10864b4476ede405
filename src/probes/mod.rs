//! The four subsystem checks. Each acquires its driver, makes one or two
//! hardware calls, waits for the hardware to settle and releases everything
//! before returning.

pub mod audio;
pub mod camera;
pub mod chassis;
pub mod servo;

use crate::{config::Config, hat::Board, printer::Printer};

/// What a probe gets to work with.
pub struct Env<'a> {
    pub config: &'a Config,
    pub board: &'a mut dyn Board,
    pub printer: &'a mut Printer,
}
