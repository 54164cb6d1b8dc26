//! dashboard: record step invocations into an HTML report.

mod demo;
mod exit_codes;
mod logging;

use clap::{Args, Parser, Subcommand};
use dash_report::{Dashboard, DashboardConfig, FailurePolicy, Invocation, ReportError, Result};
use exit_codes::ExitCode;
use logging::{init_logging, LogConfig, LogFormat, LogLevel};
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Dashboard - record report steps into a self-contained HTML page
#[derive(Parser)]
#[command(name = "dashboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Report configuration file (JSON)
    #[arg(long, global = true, env = "DASH_CONFIG")]
    config: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(long, short = 'o', global = true)]
    output: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available report steps and their signatures
    Steps,
    /// Dispatch step invocations and write the HTML report
    Run(RunArgs),
    /// Print the effective configuration as JSON
    Config,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Invocations such as "stats [1,2,3] precision=1"; runs the sample script when omitted
    invocations: Vec<String>,

    /// Override the report title
    #[arg(long)]
    title: Option<String>,

    /// Minify the rendered HTML
    #[arg(long)]
    minify: bool,

    /// Stop at the first failing step and exit non-zero
    #[arg(long)]
    fail_fast: bool,
}

impl GlobalOpts {
    fn log_level(&self) -> Option<LogLevel> {
        if self.quiet {
            return Some(LogLevel::Error);
        }
        match self.verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }

    fn load_config(&self) -> Result<DashboardConfig> {
        match &self.config {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration");
                DashboardConfig::load(path)
            }
            None => Ok(DashboardConfig::default()),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_env(
        cli.global.log_level(),
        cli.global.log_format,
    ));

    let exit_code = match dispatch(&cli) {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "dashboard failed");
            eprintln!("error: {err}");
            ExitCode::from(&err)
        }
    };
    std::process::exit(exit_code.as_i32());
}

fn dispatch(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Steps => run_steps(&cli.global),
        Commands::Run(args) => run_report(&cli.global, args),
        Commands::Config => run_config(&cli.global),
    }
}

fn run_steps(global: &GlobalOpts) -> Result<ExitCode> {
    let mut dash = Dashboard::new(global.load_config()?)?;
    demo::register_all(&mut dash)?;
    for step in dash.steps().iter() {
        println!(
            "{:<36} {}",
            step.signature().to_string(),
            step.description().unwrap_or("")
        );
    }
    Ok(ExitCode::Clean)
}

fn run_config(global: &GlobalOpts) -> Result<ExitCode> {
    let config = global.load_config()?;
    config.validate()?;
    println!("{}", config.to_json()?);
    Ok(ExitCode::Clean)
}

fn run_report(global: &GlobalOpts, args: &RunArgs) -> Result<ExitCode> {
    let mut config = global.load_config()?;
    if let Some(title) = &args.title {
        config = config.with_title(title.clone());
    }
    if args.minify {
        config = config.with_minify(true);
    }
    if args.fail_fast {
        config = config.with_failure_policy(FailurePolicy::RecordAndPropagate);
    }

    let invocations: Vec<Invocation> = if args.invocations.is_empty() {
        info!("No invocations given; recording the sample script");
        demo::DEFAULT_SCRIPT
            .iter()
            .map(|text| text.parse())
            .collect::<Result<_>>()?
    } else {
        args.invocations
            .iter()
            .map(|text| text.parse())
            .collect::<Result<_>>()?
    };

    let mut dash = Dashboard::new(config)?;
    demo::register_all(&mut dash)?;

    // A propagated step failure still leaves a report worth writing.
    let exit_code = match dash.run(&invocations) {
        Ok(_) => ExitCode::Clean,
        Err(err @ ReportError::InstrumentedCallFailure { .. }) => {
            error!(error = %err, "Stopped at failing step");
            ExitCode::StepFailed
        }
        Err(err) => return Err(err),
    };

    match &global.output {
        Some(path) => {
            dash.write_to(path)?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{}", dash.show()),
    }
    Ok(exit_code)
}
