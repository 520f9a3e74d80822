use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use serde::Serialize;
use time::{Month, OffsetDateTime};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sales_hub::{
    Config, Error, MonthComparison, Report, ReportKind, SelectedMonth,
    aggregation::filter_in_range, build_report, calendar::month_range, compare,
    interchange::{self, SkippedRow},
};

/// Builds a monthly sales report from a backup file and prints it as JSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to a sales backup in the delimited text format.
    #[arg(long)]
    backup: PathBuf,

    /// The year of the report, defaults to the current year.
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=9999))]
    year: Option<i32>,

    /// The month of the report (1-12), defaults to the current month.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
    month: Option<u8>,

    /// Which sections to include.
    #[arg(long, value_enum, default_value_t = KindArg::Master)]
    kind: KindArg,

    /// File path to a JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// A canonical timezone name, overrides the configuration file.
    #[arg(long)]
    timezone: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Matrix,
    PriceSegment,
    Detailed,
    Master,
}

impl From<KindArg> for ReportKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Matrix => ReportKind::MatrixOnly,
            KindArg::PriceSegment => ReportKind::PriceSegmentOnly,
            KindArg::Detailed => ReportKind::Detailed,
            KindArg::Master => ReportKind::Master,
        }
    }
}

#[derive(Serialize)]
struct Output {
    report: Report,
    comparison: MonthComparison,
    imported: usize,
    skipped: Vec<SkippedRow>,
    low_confidence: Vec<u64>,
}

fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    let output = match run(args) {
        Ok(output) => output,
        Err(error) => {
            tracing::error!("{error}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!("Could not serialize the report: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<Output, Error> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(timezone) = args.timezone {
        config.timezone = timezone;
    }

    let local_timezone = config.local_offset()?;
    let now = OffsetDateTime::now_utc();
    let today = now.to_offset(local_timezone).date();

    let month = match args.month {
        Some(month) => Month::try_from(month)
            .map_err(|error| Error::InvalidConfig(format!("invalid month: {error}")))?,
        None => today.month(),
    };
    let year = args.year.unwrap_or(today.year());
    let selected = SelectedMonth::new(year, month)
        .ok_or_else(|| Error::InvalidConfig(format!("{month} {year} is out of range")))?;

    let text = std::fs::read_to_string(&args.backup).map_err(|error| {
        Error::InvalidCsv(format!("could not read {}: {error}", args.backup.display()))
    })?;

    let summary = interchange::import(&text, now, local_timezone);
    tracing::info!(
        "Imported {} sales from {}",
        summary.imported(),
        args.backup.display()
    );

    let month_sales = filter_in_range(&summary.records, month_range(selected, local_timezone));

    let report = build_report(
        args.kind.into(),
        &month_sales,
        selected,
        &config.outlet_settings(),
        local_timezone,
    );
    let comparison = compare(&summary.records, selected, now, local_timezone);

    Ok(Output {
        report,
        comparison,
        imported: summary.imported(),
        skipped: summary.skipped,
        low_confidence: summary.low_confidence,
    })
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
