//! jobvac CLI

mod figures;
mod inputs;
mod models;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use figures::FigureOptions;
use inputs::Inputs;

#[derive(Parser)]
#[command(name = "jobvac")]
#[command(about = "jobvac - weekly job-vacancy models and figures")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

/// Input tables (Stata `.dta` or `.csv`).
#[derive(Args, Clone)]
struct InputArgs {
    /// Aggregate table: year, week, job_postings_count
    #[arg(long, default_value = "BGT_totals.dta")]
    totals: PathBuf,

    /// Industry table: year, week, group_name, job_postings_count
    #[arg(long, default_value = "BGT_industries.dta")]
    industries: PathBuf,
}

/// Figure output options.
#[derive(Args, Clone)]
struct RenderArgs {
    /// Output directory for Figure1/2/3
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Image format: png, svg or pdf (pdf needs the `pdf` feature)
    #[arg(long, default_value = "png")]
    format: String,

    /// Rendering config (YAML); missing keys keep the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Figure 3 data: published or computed (from the model fits)
    #[arg(long, default_value = "published")]
    figure3_source: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Render Figure 1, Figure 2 and Figure 3
    Figures {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        render: RenderArgs,

        /// Covariance estimator for computed Figure 3 (unadjusted, debiased, clustered)
        #[arg(long, default_value = "unadjusted")]
        cov: String,
    },

    /// Fit every model and print the regression tables
    Models {
        #[command(flatten)]
        input: InputArgs,

        /// Covariance estimator (unadjusted, debiased, clustered)
        #[arg(long, default_value = "unadjusted")]
        cov: String,

        /// Also write all results as pretty JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Fit the models, then render the figures
    All {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        render: RenderArgs,

        /// Covariance estimator (unadjusted, debiased, clustered)
        #[arg(long, default_value = "unadjusted")]
        cov: String,

        /// Also write all results as pretty JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Write a figure's plot artifact (JSON)
    Artifact {
        /// figure1, figure2 or figure3
        kind: String,

        #[command(flatten)]
        input: InputArgs,

        /// Figure 3 data: published or computed
        #[arg(long, default_value = "published")]
        figure3_source: String,

        /// Covariance estimator for computed Figure 3
        #[arg(long, default_value = "unadjusted")]
        cov: String,

        /// Output file. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Figures { input, render, cov } => {
            let opts = FigureOptions::from_args(&render, &cov)?;
            figures::cmd_figures(&Inputs::load(&input)?, &opts, None)
        }
        Commands::Models { input, cov, json } => {
            let cov = models::parse_cov(&cov)?;
            models::cmd_models(&Inputs::load(&input)?, cov, json.as_ref()).map(|_| ())
        }
        Commands::All { input, render, cov, json } => {
            let opts = FigureOptions::from_args(&render, &cov)?;
            let inputs = Inputs::load(&input)?;
            let results = models::cmd_models(&inputs, opts.cov, json.as_ref())?;
            figures::cmd_figures(&inputs, &opts, Some(&results))
        }
        Commands::Artifact { kind, input, figure3_source, cov, output } => {
            let source = figures::parse_source(&figure3_source)?;
            let cov = models::parse_cov(&cov)?;
            let value = figures::artifact_json(&kind, &input, source, cov)?;
            write_json(output.as_ref(), value)
        }
        Commands::Version => {
            println!("jobvac {}", jv_core::VERSION);
            Ok(())
        }
    }
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
