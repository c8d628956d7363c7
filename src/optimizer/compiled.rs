//! The compiled master results CSV per (strategy, date-range) (§4.5
//! "a compiled CSV... merges every checkpoint ever produced for that
//! strategy and date range, deduplicated by parameter tuple (most
//! recent wins), sorted by the ranking metric descending").

use crate::error::CheckpointError;
use crate::optimizer::csv_io;
use crate::optimizer::param::tuple_key;
use crate::optimizer::trial::{SENTINEL_SHARPE, TrialResult};
use csv::WriterBuilder;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The filename for a strategy's compiled master CSV, scoped by date
/// range so two backtests over different windows never share a file.
pub fn compiled_filename(strategy_name: &str, start_date: &str, end_date: &str) -> String {
    format!("{strategy_name}_{start_date}_{end_date}_compiled.csv")
}

/// Merges `batches` (one `Vec<TrialResult>` per checkpoint or live run)
/// into a single deduplicated, descending-by-Sharpe list. Later batches
/// in `batches` win ties on the same parameter tuple, matching "most
/// recent wins" when batches are passed oldest-first.
pub fn merge(batches: &[Vec<TrialResult>]) -> Vec<TrialResult> {
    let mut by_tuple: HashMap<Vec<(String, String)>, TrialResult> = HashMap::new();
    for batch in batches {
        for trial in batch {
            by_tuple.insert(tuple_key(&trial.params), trial.clone());
        }
    }
    let mut merged: Vec<TrialResult> = by_tuple.into_values().collect();
    merged.sort_by(|a, b| b.ranking_metric().cmp(&a.ranking_metric()));
    merged
}

/// Writes the merged, sorted trial list to `dir/compiled_filename(...)`
/// via the same temp-then-rename pattern as checkpoints, so a reader
/// never observes a half-written master file.
pub fn write_compiled(dir: &Path, strategy_name: &str, start_date: &str, end_date: &str, trials: &[TrialResult]) -> Result<PathBuf, CheckpointError> {
    let final_path = dir.join(compiled_filename(strategy_name, start_date, end_date));
    let tmp_path = dir.join(format!(".{}.tmp", compiled_filename(strategy_name, start_date, end_date)));

    let param_columns = csv_io::param_columns(trials);
    let header = csv_io::header(&param_columns);

    let write_result = (|| -> Result<(), CheckpointError> {
        let mut writer = WriterBuilder::new()
            .from_path(&tmp_path)
            .map_err(|e| CheckpointError::WriteFailed { path: tmp_path.display().to_string(), reason: e.to_string() })?;
        writer
            .write_record(&header)
            .map_err(|e| CheckpointError::WriteFailed { path: tmp_path.display().to_string(), reason: e.to_string() })?;
        for trial in trials {
            writer
                .write_record(csv_io::row(trial, &param_columns))
                .map_err(|e| CheckpointError::WriteFailed { path: tmp_path.display().to_string(), reason: e.to_string() })?;
        }
        writer.flush().map_err(|e| CheckpointError::WriteFailed { path: tmp_path.display().to_string(), reason: e.to_string() })
    })();

    write_result?;
    std::fs::rename(&tmp_path, &final_path).map_err(|e| CheckpointError::WriteFailed { path: final_path.display().to_string(), reason: e.to_string() })?;
    Ok(final_path)
}

/// The best trial in a compiled set, or `None` if every trial failed
/// (all sentinel Sharpe).
pub fn best(trials: &[TrialResult]) -> Option<&TrialResult> {
    trials.iter().filter(|t| t.ranking_metric() != SENTINEL_SHARPE).max_by(|a, b| a.ranking_metric().cmp(&b.ranking_metric()))
}
