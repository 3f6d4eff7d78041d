use std::{
    fs::File,
    io::{self, BufWriter},
    path::PathBuf,
    process::ExitCode,
    sync::Arc
};

use clap::Parser;
use racegrade::{
    args::{Args, Command},
    env::{get_env, EnvironmentVariables},
    files::{
        readers::read_results_file,
        writers::{write_results, write_results_file, write_targets_files}
    },
    model::{
        age_grade_calculator::AgeGradeCalculator,
        age_grade_table::{AgeGradeTable, TableSource},
        error::Result,
        precision::{parse_time, precision_for_distance, render_time},
        structures::{gender::Gender, race::Race, series::Series},
        tabulation::Tabulator
    }
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let env = get_env();
    let args = Args::parse();

    init_tracing(&args.log_level);

    match run(args, env) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(args: Args, env: EnvironmentVariables) -> Result<()> {
    let snapshot = args.snapshot.or(env.snapshot_path);

    match args.command {
        Command::Configure {
            men,
            women,
            from,
            output
        } => {
            let source = match (men, women, from) {
                (Some(men), Some(women), _) => TableSource::Sheets { men, women },
                (_, _, Some(from)) => TableSource::Snapshot(from),
                _ => TableSource::None
            };

            let table = AgeGradeTable::load(&source)?;
            table.save_snapshot(&output)
        }
        Command::Grade {
            age,
            gender,
            distance,
            time
        } => {
            let calculator = AgeGradeCalculator::new(load_table(snapshot)?);
            let time = parse_time(&time)?;
            let grade = calculator.compute(age, &gender, distance, time)?;
            let precision = precision_for_distance(distance);

            println!("age grade: {:.2}%", grade.percentage);
            println!("age graded time: {}", render_time(grade.graded_time, precision.ag_time));
            println!("factor: {:.4}", grade.factor);
            Ok(())
        }
        Command::Tabulate {
            results,
            distance,
            date,
            name,
            series,
            order_by,
            high_to_low,
            average_tie,
            divisions,
            output,
            agdebug
        } => {
            let table = load_table(snapshot)?;
            let calculator = match agdebug {
                Some(path) => AgeGradeCalculator::with_debug_sink(table, BufWriter::new(File::create(path)?))?,
                None => AgeGradeCalculator::new(table)
            };

            let race = Race {
                id: 1,
                name,
                date,
                distance
            };

            let mut series = Series::new(&series, order_by)
                .with_high_to_low(high_to_low || order_by.default_high_to_low())
                .with_average_tie(average_tie);
            if let Some(divisions) = divisions {
                series = series.with_divisions(divisions);
            }

            let mut results = read_results_file(&results, &race)?;
            let summary = Tabulator::new(&calculator).tabulate(&race, &series, &mut results)?;
            info!(
                "{} entries, {} age graded, {} without age",
                summary.entries, summary.graded, summary.ungraded
            );

            match output {
                Some(path) => write_results_file(&path, &race, &results),
                None => write_results(io::stdout().lock(), &race, &results)
            }
        }
        Command::Targets {
            gender,
            percentages,
            ages,
            step,
            output_dir
        } => {
            let gender = Gender::try_from(gender.as_str())?;
            let calculator = AgeGradeCalculator::new(load_table(snapshot)?);

            let percentages: Vec<u32> = (percentages.0..=percentages.1).collect();
            let ages: Vec<u32> = (ages.0..=ages.1).step_by(step.max(1)).collect();

            write_targets_files(&output_dir, &calculator, gender, &percentages, &ages)?;
            Ok(())
        }
    }
}

fn load_table(snapshot: Option<PathBuf>) -> Result<Arc<AgeGradeTable>> {
    let source = snapshot.map_or(TableSource::None, TableSource::Snapshot);
    Ok(Arc::new(AgeGradeTable::load(&source)?))
}
