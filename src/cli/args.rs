use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prsa-processor")]
#[command(about = "Multi-station PRSA air quality data processor")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Suppress progress output")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assess raw station files (missing values, types, duplicates, stats)
    Assess {
        #[arg(short, long, help = "Input directory containing PRSA csv files")]
        input_dir: PathBuf,

        #[arg(long, default_value = "false", help = "Emit the report as JSON")]
        json: bool,
    },

    /// Load, assess and clean every station file in a directory
    Process {
        #[arg(short, long, help = "Input directory containing PRSA csv files")]
        input_dir: PathBuf,

        #[arg(
            long,
            default_value = "false",
            help = "Abort the whole batch on the first station failure"
        )]
        strict: bool,

        #[arg(long, default_value = "false", help = "Emit the report as JSON")]
        json: bool,
    },

    /// Monthly and yearly average levels for a particulate pollutant
    Monthly {
        #[arg(short, long, help = "Input directory containing PRSA csv files")]
        input_dir: PathBuf,

        #[arg(short, long, help = "Pollutant: PM2.5 or PM10")]
        pollutant: String,

        #[arg(long, default_value = "false", help = "Emit the report as JSON")]
        json: bool,
    },

    /// Pearson correlation between two numeric columns of one station
    Correlate {
        #[arg(short, long, help = "Input directory containing PRSA csv files")]
        input_dir: PathBuf,

        #[arg(short, long, help = "Station name, e.g. Aotizhongxin")]
        station: String,

        #[arg(short = 'x', long = "x-column", help = "First column, e.g. TEMP")]
        x: String,

        #[arg(short = 'y', long = "y-column", help = "Second column, e.g. PM2.5")]
        y: String,

        #[arg(long, help = "Window start date (YYYY-MM-DD, inclusive)")]
        start: Option<NaiveDate>,

        #[arg(long, help = "Window end date (YYYY-MM-DD, exclusive)")]
        end: Option<NaiveDate>,

        #[arg(
            long,
            default_value = "false",
            help = "Also print the full correlation matrix for the station"
        )]
        matrix: bool,
    },
}
