use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use trackpack_core::Visibility;

mod bed;
mod commands;
mod config;
mod error;
mod region;

use config::Config;
use error::CliError;

#[derive(Parser)]
#[command(name = "trackpack")]
#[command(about = "trackpack - genome browser track layout")]
#[command(version)]
#[command(long_about = "
trackpack assigns the features of genome browser tracks to rows and picks
the most detailed visibility level (full, pack, squish, dense) that fits each
track's pixel budget.

Examples:
  trackpack layout --bed genes.bed --region chr1:1,000,001-1,100,000
  trackpack layout --bed reads.bed --region chr2:5M-5.1M --budget 60 --overflow
  trackpack plan --config trackpack.toml --format json
  trackpack config --example > trackpack.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of threads to use
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lay out one BED track and print its rows
    Layout {
        /// BED file with the track's features
        #[arg(long, required = true)]
        bed: PathBuf,

        /// Region to lay out (e.g., 'chr1:10,000-20,000' or 'chrX:1.5M-2M')
        #[arg(short, long, required = true)]
        region: String,

        /// Pixel budget for the track's rows
        #[arg(short, long)]
        budget: Option<u32>,

        /// Visibility level to start from
        #[arg(long, default_value = "pack")]
        vis: VisArg,

        /// Fold items past the row cap into an overflow row
        #[arg(long)]
        overflow: bool,

        /// Track type tag (e.g., 'bed 12', 'bam', 'bigWig')
        #[arg(long = "type", default_value = "bed")]
        track_type: String,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Lay out every configured track and stack them into one image
    Plan {
        /// Region to lay out; defaults to general.region in the configuration
        #[arg(short, long)]
        region: Option<String>,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Print the effective configuration or an example one
    Config {
        /// Print an example configuration instead
        #[arg(long)]
        example: bool,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum VisArg {
    Full,
    Pack,
    Squish,
    Dense,
    Hide,
}

impl From<VisArg> for Visibility {
    fn from(arg: VisArg) -> Self {
        match arg {
            VisArg::Full => Visibility::Full,
            VisArg::Pack => Visibility::Pack,
            VisArg::Squish => Visibility::Squish,
            VisArg::Dense => Visibility::Dense,
            VisArg::Hide => Visibility::Hide,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parse the `general.format` setting
    pub fn from_config(name: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(name, true)
            .map_err(|_| anyhow!(CliError::config(format!("unknown output format '{}'", name))))
    }
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Set global thread count if specified
    if let Some(threads) = cli.threads {
        if threads == 0 {
            return Err(CliError::validation("--threads must be at least 1").into());
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to set thread count")?;
    }

    // Execute the requested command
    match cli.command {
        Commands::Layout {
            bed,
            region,
            budget,
            vis,
            overflow,
            track_type,
            format,
        } => {
            commands::layout::execute(&config, bed, region, budget, vis.into(), overflow, track_type, format)?;
        }

        Commands::Plan { region, format } => {
            commands::plan::execute(&config, region, format)?;
        }

        Commands::Config { example, output } => {
            commands::config::execute(&config, example, output)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = setup_logging(cli.verbose, cli.quiet) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }

    if let Err(err) = run(cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            error::print_error_and_exit(cli_err);
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_layout_arguments_parse() {
        let cli = Cli::try_parse_from([
            "trackpack", "layout", "--bed", "genes.bed", "--region", "chr1:1-1000", "--vis", "full", "--type",
            "bam", "--overflow",
        ])
        .unwrap();
        match cli.command {
            Commands::Layout { vis, track_type, overflow, format, .. } => {
                assert_eq!(Visibility::from(vis), Visibility::Full);
                assert_eq!(track_type, "bam");
                assert!(overflow);
                assert_eq!(format, None);
            }
            _ => panic!("expected layout command"),
        }
    }

    #[test]
    fn test_output_format_from_config() {
        assert_eq!(OutputFormat::from_config("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_config("TEXT").unwrap(), OutputFormat::Text);
        assert!(OutputFormat::from_config("xml").is_err());
    }
}
