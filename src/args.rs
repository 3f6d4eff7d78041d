use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::model::structures::{division::Division, ranking_metric::RankingMetric};

#[derive(Parser, Clone)]
#[command(
    display_name = "racegrade",
    author = "racegrade",
    long_about = "Age grades race results and tabulates overall, gender and division places"
)]
pub struct Args {
    /// Age grade table snapshot written by `configure`
    #[arg(
        short,
        long,
        global = true,
        env = "AGEGRADE_SNAPSHOT",
        help = "Path of the age grade table snapshot"
    )]
    pub snapshot: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// does not hold a filter
    #[arg(
        short,
        long,
        global = true,
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Subcommand, Clone)]
pub enum Command {
    /// Builds the age grade table snapshot from the workbook's sheets, or
    /// validates an existing snapshot and copies it
    Configure {
        /// Men's sheet exported to CSV
        #[arg(long, requires = "women", conflicts_with = "from")]
        men: Option<PathBuf>,

        /// Women's sheet exported to CSV
        #[arg(long, requires = "men", conflicts_with = "from")]
        women: Option<PathBuf>,

        /// Existing snapshot to validate
        #[arg(long, required_unless_present = "men")]
        from: Option<PathBuf>,

        /// Where the snapshot is written
        #[arg(short, long)]
        output: PathBuf
    },

    /// Age grades a single performance
    Grade {
        #[arg(long)]
        age: f64,

        #[arg(long)]
        gender: String,

        /// Race distance in miles
        #[arg(long)]
        distance: f64,

        /// Elapsed time, h:mm:ss, m:ss or seconds
        #[arg(long)]
        time: String
    },

    /// Age grades and places a race results file
    Tabulate {
        /// Results CSV: name,gender,age,time[,dob][,id]
        results: PathBuf,

        /// Race distance in miles
        #[arg(long)]
        distance: f64,

        /// Race date, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,

        #[arg(long, default_value = "Race")]
        name: String,

        #[arg(long, default_value = "Overall")]
        series: String,

        #[arg(long, default_value = "time", value_parser = parse_metric)]
        order_by: RankingMetric,

        /// Order values from high to low (always on for agpercent)
        #[arg(long, action = clap::ArgAction::SetTrue)]
        high_to_low: bool,

        /// Tied competitors share the average of their places rather than
        /// the best one
        #[arg(long, action = clap::ArgAction::SetTrue)]
        average_tie: bool,

        /// Comma separated inclusive age bands, e.g. 0-19,20-29,30-39
        #[arg(long, value_delimiter = ',', value_parser = parse_division)]
        divisions: Option<Vec<Division>>,

        /// Tabulated CSV, standard output when absent
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Writes every age grade computation to this CSV
        #[arg(long)]
        agdebug: Option<PathBuf>
    },

    /// Writes tables of the times required for age grade percentages
    Targets {
        #[arg(long)]
        gender: String,

        /// Percentage range, e.g. 60-80
        #[arg(long, value_parser = parse_range)]
        percentages: (u32, u32),

        /// Age range, e.g. 20-80
        #[arg(long, value_parser = parse_range)]
        ages: (u32, u32),

        /// Years between ages
        #[arg(long, default_value_t = 1)]
        step: usize,

        #[arg(long, default_value = ".")]
        output_dir: PathBuf
    }
}

fn parse_metric(value: &str) -> Result<RankingMetric, String> {
    value.parse::<RankingMetric>().map_err(|e| e.to_string())
}

fn parse_division(value: &str) -> Result<Division, String> {
    value.parse::<Division>().map_err(|e| e.to_string())
}

/// Parses `first-last`, an inclusive range
pub fn parse_range(value: &str) -> Result<(u32, u32), String> {
    let division = parse_division(value)?;
    Ok((division.low, division.high))
}
