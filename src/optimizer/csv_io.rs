//! Shared row encoding between `checkpoint` and `compiled`: both write the
//! same schema (§6 "Checkpoint CSV... columns = all parameter names + all
//! metric names + `error` (nullable)"; "Compiled results CSV: same schema
//! as checkpoint"), so the column layout and row (de)serialization live
//! here once.

use crate::analyzer::metrics::PerformanceReport;
use crate::error::CheckpointError;
use crate::optimizer::param::ParamSet;
use crate::optimizer::trial::TrialResult;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Metric columns in a fixed order, matching `PerformanceReport`'s field
/// set (§4.6).
pub const METRIC_COLUMNS: &[&str] = &[
    "total_return",
    "cagr",
    "max_drawdown",
    "max_drawdown_duration_days",
    "sharpe",
    "sortino",
    "calmar",
    "win_rate",
    "avg_win",
    "avg_loss",
    "profit_factor",
    "payoff_ratio",
    "total_trades",
];

/// The union of every trial's parameter names, sorted for a stable
/// header regardless of row order. All trials in one optimizer run share
/// the same `ParamSpec` set, so in practice this is just trial 0's keys,
/// but a union keeps `write_rows` correct even if callers mix trials from
/// more than one run (the compiled-results case).
pub fn param_columns(trials: &[TrialResult]) -> Vec<String> {
    let mut names: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();
    for trial in trials {
        names.extend(trial.params.keys().cloned());
    }
    names.into_iter().collect()
}

pub fn header(param_columns: &[String]) -> Vec<String> {
    let mut header: Vec<String> = param_columns.to_vec();
    header.extend(METRIC_COLUMNS.iter().map(|s| s.to_string()));
    header.push("error".to_string());
    header
}

fn metric_value(report: &PerformanceReport, column: &str) -> String {
    match column {
        "total_return" => report.total_return.to_string(),
        "cagr" => report.cagr.to_string(),
        "max_drawdown" => report.max_drawdown.to_string(),
        "max_drawdown_duration_days" => report.max_drawdown_duration_days.to_string(),
        "sharpe" => report.sharpe.to_string(),
        "sortino" => report.sortino.to_string(),
        "calmar" => report.calmar.to_string(),
        "win_rate" => report.win_rate.to_string(),
        "avg_win" => report.avg_win.to_string(),
        "avg_loss" => report.avg_loss.to_string(),
        "profit_factor" => report.profit_factor.to_string(),
        "payoff_ratio" => report.payoff_ratio.to_string(),
        "total_trades" => report.total_trades.to_string(),
        other => unreachable!("unknown metric column '{other}'"),
    }
}

pub fn row(trial: &TrialResult, param_columns: &[String]) -> Vec<String> {
    let mut row: Vec<String> = param_columns.iter().map(|name| trial.params.get(name).map(|v| v.to_string()).unwrap_or_default()).collect();
    match &trial.metrics {
        Some(report) => row.extend(METRIC_COLUMNS.iter().map(|c| metric_value(report, c))),
        None => row.extend(METRIC_COLUMNS.iter().map(|_| String::new())),
    }
    row.push(trial.error.clone().unwrap_or_default());
    row
}

/// Parses one CSV row back into a `TrialResult`. The checkpoint format
/// never round-trips a full `PerformanceReport` struct back from its
/// scalar columns into trial-time types that need it (nothing downstream
/// reconstructs a `PerformanceReport` from a checkpoint row — compiled
/// results are read for ranking and resume-dedup, both of which only need
/// `params`, `error`, and the `sharpe` column), so `metrics` stays `None`
/// on load; `ranking_metric` for a loaded row is read from the raw
/// `sharpe` column instead.
pub fn parse_row(header: &[String], record: &csv::StringRecord, row_index: usize) -> Result<(TrialResult, Decimal), CheckpointError> {
    let mut params = ParamSet::new();
    let mut sharpe = crate::optimizer::trial::SENTINEL_SHARPE;
    let mut error = None;

    let param_names: Vec<&String> = header.iter().filter(|h| !METRIC_COLUMNS.contains(&h.as_str()) && h.as_str() != "error").collect();

    for (col, value) in header.iter().zip(record.iter()) {
        if param_names.iter().any(|n| n.as_str() == col.as_str()) {
            if !value.is_empty() {
                let parsed = Decimal::from_str(value).map_err(|e| CheckpointError::MalformedRow { index: row_index, reason: e.to_string() })?;
                params.insert(col.clone(), parsed);
            }
        } else if col == "sharpe" && !value.is_empty() {
            sharpe = Decimal::from_str(value).map_err(|e| CheckpointError::MalformedRow { index: row_index, reason: e.to_string() })?;
        } else if col == "error" && !value.is_empty() {
            error = Some(value.to_string());
        }
    }

    let trial = TrialResult { params, metrics: None, error };
    Ok((trial, sharpe))
}
