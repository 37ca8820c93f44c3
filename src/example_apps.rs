use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Parser, error::ErrorKind};
use serde::Serialize;

use crate::analytics::IssueIndexAnalytics;
use crate::chart::{
    ChartPoint, NodeEmphasis, ScoreRange, SegmentSlope, classify_segments, node_emphasis,
    score_range,
};
use crate::config::{AnalyticsConfig, DateCollisionPolicy};
use crate::constants::analytics::DEFAULT_SURGE_THRESHOLD;
use crate::constants::feed::DATE_FORMAT;
use crate::keywords::KeywordFrequency;
use crate::metrics::Statistics;
use crate::period::Period;
use crate::source::JsonFileSource;
use crate::surge::{SurgeEvent, SurgeKind};

#[derive(Debug, Parser)]
#[command(
    name = "issue_index_report",
    disable_help_subcommand = true,
    about = "Summarize an issue index feed",
    long_about = "Merge regular and emergency issue index updates and print statistics, surges, keyword frequency, and chart classification for a period.",
    after_help = "Unknown --period values fall back to 3months."
)]
struct IssueIndexReportCli {
    #[arg(
        long = "regular",
        value_name = "PATH",
        help = "JSON file holding {\"regular_updates\": [...]}"
    )]
    regular_path: PathBuf,
    #[arg(
        long = "emergency",
        value_name = "PATH",
        help = "JSON file holding {\"emergency_updates\": [...]}"
    )]
    emergency_path: PathBuf,
    #[arg(
        long,
        default_value = "3months",
        help = "Period key: 3months, 6months, 1year, or all"
    )]
    period: String,
    #[arg(
        long,
        default_value_t = DEFAULT_SURGE_THRESHOLD,
        value_parser = parse_threshold_arg,
        help = "Minimum absolute percent change reported as a surge or drop"
    )]
    threshold: f64,
    #[arg(
        long = "as-of",
        value_name = "YYYY-MM-DD",
        value_parser = parse_date_arg,
        help = "Reference date for period windows (default: today)"
    )]
    as_of: Option<NaiveDate>,
    #[arg(
        long = "top-keywords",
        default_value_t = 5,
        value_parser = parse_positive_usize,
        help = "Number of keywords to list"
    )]
    top_keywords: usize,
    #[arg(
        long = "reject-collisions",
        help = "Fail when two updates share an index_date"
    )]
    reject_collisions: bool,
    #[arg(long, help = "Emit the report as JSON")]
    json: bool,
}

/// Chart point with its display classification.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ChartRow {
    /// Plotted values.
    #[serde(flatten)]
    pub point: ChartPoint,
    /// Slope of the segment ending here.
    pub segment: SegmentSlope,
    /// Node emphasis.
    pub emphasis: NodeEmphasis,
}

/// Everything the issue index screen needs for one period.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueIndexReport {
    /// Period key the report covers.
    pub period: &'static str,
    /// Reference date the period was evaluated on.
    pub as_of: NaiveDate,
    /// Latest update of the whole timeline.
    pub latest: Option<ChartPoint>,
    /// Period statistics; `None` for an empty window.
    pub statistics: Option<Statistics>,
    /// Surges and drops inside the window.
    pub surges: Vec<SurgeEvent>,
    /// Most frequent keywords, truncated to the requested count.
    pub keywords: Vec<KeywordFrequency>,
    /// Score range of the plotted points.
    pub score_range: Option<ScoreRange>,
    /// Classified chart rows.
    pub chart: Vec<ChartRow>,
}

/// Assemble a report for `period` as seen on `as_of`.
///
/// Surges are scanned over the period's updates with the engine's configured
/// threshold; `top_keywords` caps the keyword list.
pub fn build_report(
    engine: &IssueIndexAnalytics,
    period: Period,
    as_of: NaiveDate,
    top_keywords: usize,
) -> IssueIndexReport {
    let updates = engine.updates_by_period_as_of(period, as_of);
    let points = engine.chart_data_as_of(period, as_of);
    let threshold = engine.config().surge_threshold;
    let chart = points
        .iter()
        .zip(classify_segments(&points))
        .map(|(point, segment)| ChartRow {
            point: point.clone(),
            segment,
            emphasis: node_emphasis(point, threshold),
        })
        .collect();
    let mut keywords = engine.keyword_frequency_as_of(period, as_of);
    keywords.truncate(top_keywords);

    IssueIndexReport {
        period: period.as_str(),
        as_of,
        latest: engine.latest_update().map(ChartPoint::from),
        statistics: engine.statistics_as_of(period, as_of),
        surges: engine.detect_surge_periods(Some(updates), None),
        keywords,
        score_range: score_range(&points),
        chart,
    }
}

/// Run the `issue_index_report` CLI with `args_iter` (program name excluded).
pub fn run_issue_index_report<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_issue_index_report_to(args_iter, &mut out)
}

/// Same as `run_issue_index_report`, writing to `out`.
pub fn run_issue_index_report_to<I, W>(args_iter: I, out: &mut W) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
    W: Write,
{
    let Some(cli) = parse_cli::<IssueIndexReportCli, _>(
        std::iter::once("issue_index_report".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let policy = if cli.reject_collisions {
        DateCollisionPolicy::Reject
    } else {
        DateCollisionPolicy::Permit
    };
    let config = AnalyticsConfig::default()
        .with_surge_threshold(cli.threshold)
        .with_collision_policy(policy);
    let source = JsonFileSource::new(&cli.regular_path, &cli.emergency_path);
    let engine = IssueIndexAnalytics::from_source(&source, config)?;

    let period = Period::parse(&cli.period);
    let as_of = cli.as_of.unwrap_or_else(|| Local::now().date_naive());
    let report = build_report(&engine, period, as_of, cli.top_keywords);

    if cli.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        write_text_report(out, &report)?;
    }
    Ok(())
}

/// Append `--regular`/`--emergency` pointing into `data_dir` for whichever
/// of the two is missing from `args`, in either `--flag value` or `--flag=value` form.
pub fn with_default_feed_paths(mut args: Vec<String>, data_dir: &Path) -> Vec<String> {
    for (flag, file) in [
        ("--regular", "regular_updates.json"),
        ("--emergency", "emergency_updates.json"),
    ] {
        if !has_flag(&args, flag) {
            args.push(flag.to_string());
            args.push(data_dir.join(file).display().to_string());
        }
    }
    args
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| {
        arg == flag
            || arg
                .strip_prefix(flag)
                .is_some_and(|rest| rest.starts_with('='))
    })
}

fn write_text_report<W: Write>(out: &mut W, report: &IssueIndexReport) -> std::io::Result<()> {
    writeln!(
        out,
        "=== issue index ({} as of {}) ===",
        report.period,
        report.as_of.format(DATE_FORMAT)
    )?;
    match &report.latest {
        Some(latest) => writeln!(
            out,
            "latest: {} score={} change={:+.2}% [{}] {}",
            latest.date,
            latest.score,
            latest.comparison_percentage,
            latest.update_type.as_str(),
            latest.main_keyword
        )?,
        None => writeln!(out, "latest: no updates")?,
    }

    writeln!(out, "\n--- statistics ---")?;
    match &report.statistics {
        Some(stats) => {
            writeln!(
                out,
                "updates: {} (regular={}, emergency={})",
                stats.total_updates, stats.regular_updates, stats.emergency_updates
            )?;
            writeln!(
                out,
                "max: {} on {} ({})",
                stats.max_score.score, stats.max_score.date, stats.max_score.keyword
            )?;
            writeln!(
                out,
                "min: {} on {} ({})",
                stats.min_score.score, stats.min_score.date, stats.min_score.keyword
            )?;
            writeln!(
                out,
                "avg: {}  current: {}  trend: {}",
                stats.avg_score,
                stats.current_score,
                stats.trend.as_str()
            )?;
        }
        None => writeln!(out, "no updates in period")?,
    }

    writeln!(out, "\n--- surges ---")?;
    if report.surges.is_empty() {
        writeln!(out, "none")?;
    }
    for event in &report.surges {
        let label = match event.kind {
            SurgeKind::Surge => "surge",
            SurgeKind::Drop => "drop",
        };
        writeln!(
            out,
            "{} {:<5} {:+.2}% score={} {}",
            event.date, label, event.change, event.score, event.keyword
        )?;
    }

    writeln!(out, "\n--- keywords ---")?;
    for keyword in &report.keywords {
        writeln!(
            out,
            "{:<24} x{}  avg={:.2}  level={}",
            keyword.keyword,
            keyword.frequency,
            keyword.avg_contribution,
            keyword.trend_level.as_str()
        )?;
    }

    writeln!(out, "\n--- chart ---")?;
    for row in &report.chart {
        writeln!(
            out,
            "{} {:>6} {:?} {:?}",
            row.point.date, row.point.score, row.segment, row.emphasis
        )?;
    }
    Ok(())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw
        .parse::<usize>()
        .map_err(|_| format!("Could not parse '{}' as a positive integer", raw))?;
    if parsed == 0 {
        return Err("value must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_threshold_arg(raw: &str) -> Result<f64, String> {
    let parsed = raw
        .parse::<f64>()
        .map_err(|_| format!("Could not parse --threshold value '{}' as a number", raw))?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err("--threshold must be a non-negative number".to_string());
    }
    Ok(parsed)
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|err| format!("Could not parse --as-of value '{}' as YYYY-MM-DD: {}", raw, err))
}
