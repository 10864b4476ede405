use std::path::PathBuf;
use structopt::StructOpt;

/// Options for the CLI.
#[derive(StructOpt, Debug)]
#[structopt(name = "picar-check", about = "PiCar-X hardware self-test.")]
pub struct Opts {
    /// Configuration file. Defaults to ./picar.toml when it exists.
    #[structopt(short, long, parse(from_os_str))]
    pub config: Option<PathBuf>,

    /// Only run probes whose name or key matches this regex.
    #[structopt(short, long = "include")]
    pub include_filter: Option<String>,

    /// Skip probes whose name or key matches this regex.
    #[structopt(short, long = "exclude")]
    pub exclude_filter: Option<String>,

    /// List the probes that would run without touching the hardware.
    #[structopt(short = "n", long)]
    pub dry_run: bool,

    /// Disable colored output.
    #[structopt(long)]
    pub no_color: bool,

    /// Log more. Repeat for more detail.
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,
}

impl Opts {
    /// Log level implied by the number of `-v` flags.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_runs_everything() {
        let opts = Opts::from_iter(&["picar-check"]);
        assert!(opts.config.is_none());
        assert!(opts.include_filter.is_none());
        assert!(!opts.dry_run);
        assert_eq!(opts.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn flags() {
        let opts = Opts::from_iter(&[
            "picar-check",
            "-c",
            "car.toml",
            "-i",
            "servo",
            "-n",
            "-vv",
        ]);
        assert_eq!(opts.config, Some(PathBuf::from("car.toml")));
        assert_eq!(opts.include_filter.as_deref(), Some("servo"));
        assert!(opts.dry_run);
        assert_eq!(opts.log_level(), log::LevelFilter::Debug);
    }
}
