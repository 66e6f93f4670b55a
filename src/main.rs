use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tldsgen::Config;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Generate a sorted list of public top-level domains as Go source
#[derive(Debug, Parser)]
#[command(name = "tldsgen", version, about)]
struct Cli {
    /// TOML configuration file; flags below override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where to write the generated file [default: tlds.go]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Go package name of the generated file [default: xurls]
    #[arg(long, value_name = "NAME")]
    package: Option<String>,

    /// Truncate and write the destination in place instead of renaming a temp file over it
    #[arg(long)]
    no_atomic: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }

    fn load_config(&self) -> tldsgen::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(package) = &self.package {
            config.output.package = package.clone();
        }
        if self.no_atomic {
            config.output.atomic = false;
        }
        Ok(config)
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match tldsgen::generate(&config).await {
        Ok(list) => {
            info!(
                tlds = list.tlds.len(),
                path = %config.output.path.display(),
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
