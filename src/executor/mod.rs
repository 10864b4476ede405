//! An executor runs the selected probes one after another and turns their
//! outcomes into a summary and an exit code.

pub mod plan;
pub mod results;
mod context;
mod probe;

pub use context::{run_until, Context};
pub use probe::Probe;
