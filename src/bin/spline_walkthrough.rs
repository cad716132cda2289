use std::{
    io::{self, Write},
    path::PathBuf,
    process,
};

use clap::Parser;
use splinefit::{
    config::{Config, ImageFormat, RunMode},
    error::Result,
    knots::KnotSet,
    walkthrough::Walkthrough,
};

#[derive(Parser, Debug)]
#[command(
    name = "spline_walkthrough",
    about = "Fit linear, cubic and natural splines to simulated data and plot the results",
    long_about = "Draws a seeded noisy sample around a known mean, fits a linear spline, a cubic \
                  polynomial, a cubic spline and a natural spline by least squares, prints a \
                  regression summary for each, and plots every fit over the data."
)]
struct Cli {
    /// TOML configuration file; command line flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show figures in the terminal instead of writing files
    #[arg(long)]
    interactive: bool,

    /// Directory to write figures to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Image format for written figures (svg or png)
    #[arg(long, value_name = "FORMAT")]
    format: Option<ImageFormat>,

    /// Seed for the noise generator
    #[arg(long)]
    seed: Option<u64>,

    /// Number of observations
    #[arg(long, value_name = "N")]
    length: Option<usize>,

    /// Comma separated knot locations, e.g. 6,12,18
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    knots: Option<Vec<f64>>,

    /// Print the model comparison as JSON
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}
impl Cli {
    /// Loads the configuration file, if any, then applies command line overrides
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if self.interactive {
            config.output.mode = RunMode::Interactive;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory.clone_from(dir);
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(seed) = self.seed {
            config.sample.seed = seed;
        }
        if let Some(length) = self.length {
            config.sample.length = length;
        }
        if let Some(knots) = &self.knots {
            config.knots = KnotSet::new(knots.iter().copied())?;
        }

        Ok(config)
    }

    fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let code = exit_code(run(&cli), &mut io::stderr().lock());
    if code != 0 {
        process::exit(code);
    }
}

/// Reports a fatal error on `stderr`, independent of the log level
fn exit_code(result: Result<()>, stderr: &mut impl Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(stderr, "Fatal error: {e}");
            1
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config()?;
    let walkthrough = Walkthrough::new(config).json_comparison(cli.json);

    let mut stdout = io::stdout().lock();
    walkthrough.run(&mut stdout)?;
    Ok(())
}
