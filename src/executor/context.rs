use super::{
    plan::Plan,
    results::{self, Summary},
};
use crate::{
    config::Config,
    errors::PicarError,
    hat::Board,
    printer::{self, Printer},
    probes::Env,
};
use colored::*;
use futures::future::{self, Either};
use log::warn;
use std::{future::Future, io};

/// An execution context owns everything a run needs and executes the
/// planned probes strictly in order.
pub struct Context {
    plan: Plan,
    config: Config,
    board: Box<dyn Board>,
    printer: Printer,
}

impl Context {
    pub fn new(
        plan: Plan,
        config: Config,
        board: Box<dyn Board>,
        printer: Printer,
    ) -> Self {
        Self {
            plan,
            config,
            board,
            printer,
        }
    }

    /// Run every planned probe, whatever happened to the earlier ones, and
    /// print the summary.
    pub async fn run(&mut self) -> Result<Summary, PicarError> {
        self.printer.line("🚗 PiCar-X Comprehensive Test Suite")?;
        self.printer.line(printer::rule())?;

        let mut summary = Summary::default();
        for probe in self.plan.probes.clone() {
            let mut env = Env {
                config: &self.config,
                board: &mut *self.board,
                printer: &mut self.printer,
            };
            summary.push(probe.execute(&mut env).await?);
        }

        self.printer.line(summary.report_str())?;
        Ok(summary)
    }

    fn interrupted(&mut self) -> Result<(), PicarError> {
        self.printer.blank()?;
        self.printer.blank()?;
        self.printer.line("⚠️  Test interrupted by user".yellow())?;
        Ok(())
    }
}

/// Run the context until every probe has finished or `interrupt` resolves,
/// and return the process exit code.
///
/// An interrupted run is dropped where it stands, which stops the motors and
/// kills any running tool, and exits with [results::EXIT_INTERRUPTED]. If
/// `interrupt` fails the run continues uninterruptible.
pub async fn run_until<I>(
    mut ctx: Context,
    interrupt: I,
) -> Result<i32, PicarError>
where
    I: Future<Output = io::Result<()>> + Unpin,
{
    let finished = {
        let run = Box::pin(ctx.run());
        match future::select(run, interrupt).await {
            Either::Left((summary, _)) => Some(summary?.exit_code()),
            Either::Right((Ok(()), _run)) => None,
            Either::Right((Err(err), run)) => {
                warn!("cannot listen for interrupts: {}", err);
                Some(run.await?.exit_code())
            }
        }
    };
    match finished {
        Some(code) => Ok(code),
        None => {
            ctx.interrupted()?;
            Ok(results::EXIT_INTERRUPTED)
        }
    }
}
