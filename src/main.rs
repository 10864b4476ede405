use picar_check::{
    cli::Opts,
    config::Config,
    errors::PicarError,
    executor::{plan::Plan, run_until, Context, Probe},
    hat::RpiBoard,
    printer::Printer,
};

use colored::*;
use regex::Regex;
use structopt::StructOpt;
use tokio::{runtime, signal};

fn dry_run(probes: &[Probe]) {
    for probe in probes {
        println!("{}{} {}", probe.name().blue(), ":".blue(), probe.touches());
    }
}

fn init_logging(opts: &Opts) {
    env_logger::Builder::new()
        .filter_level(opts.log_level())
        .parse_env("PICAR_LOG")
        .format_timestamp(None)
        .init();
}

fn run() -> Result<i32, PicarError> {
    let opts = Opts::from_args();
    init_logging(&opts);
    if opts.no_color {
        colored::control::set_override(false);
    }

    let config = Config::discover(opts.config.as_deref())?;

    // Get the include and exclude regexes.
    let include = opts
        .include_filter
        .as_deref()
        .map(Regex::new)
        .transpose()?;
    let exclude = opts
        .exclude_filter
        .as_deref()
        .map(Regex::new)
        .transpose()?;
    let plan = Plan::default().with_filters(include.as_ref(), exclude.as_ref())?;

    // Print out the probes without running them in dry run mode.
    if opts.dry_run {
        dry_run(&plan.probes);
        return Ok(0);
    }

    let board = RpiBoard::new(config.hat.i2c_bus, config.hat.addresses.clone());
    let ctx = Context::new(plan, config, Box::new(board), Printer::stdout());
    let runtime = runtime::Builder::new_current_thread().enable_all().build()?;

    runtime.block_on(run_until(ctx, Box::pin(signal::ctrl_c())))
}

fn main() {
    std::process::exit(match run() {
        Err(PicarError(msg)) => {
            println!("error: {}", msg);
            1
        }
        Ok(code) => code,
    })
}
