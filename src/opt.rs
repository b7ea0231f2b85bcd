use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[clap(name = "autograder-maker", version)]
pub struct Opt {
    /// Path of the JSON configuration file
    #[clap(short = 'c', long = "config")]
    pub config: PathBuf,

    /// Directory where autograder.zip is written
    #[clap(short = 'o', long = "output", default_value = "./output")]
    pub output: PathBuf,

    /// Validate the configuration and exit without generating the bundle
    #[clap(long = "validate-only")]
    pub validate_only: bool,

    #[clap(flatten)]
    pub logger: LoggerOpt,
}

#[derive(Parser, Debug, Clone)]
pub struct LoggerOpt {
    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl LoggerOpt {
    /// Initialize the global logger based on the verbosity level.
    pub fn enable_log(&self) {
        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
        better_panic::install();
    }
}
