//! Per-run checkpointing (§4.5 "every N completed trials... and on
//! SIGINT, atomically write a CSV to a checkpoint directory under a
//! filename encoding strategy name + ISO timestamp"). A checkpoint is
//! write-once: the coordinator opens the file only during a flush (§5
//! "the checkpoint file is opened for write only during flushes, not
//! held open"), never incrementally appended to.

use crate::error::CheckpointError;
use crate::optimizer::csv_io;
use crate::optimizer::param::{ParamSet, tuple_key};
use crate::optimizer::trial::TrialResult;
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Builds the checkpoint's filename: strategy name + ISO-8601 timestamp,
/// so concurrent runs of different strategies (or re-runs of the same
/// one) never collide on disk.
pub fn checkpoint_filename(strategy_name: &str, iso_timestamp: &str) -> String {
    format!("{strategy_name}_{iso_timestamp}.csv")
}

/// Writes `trials` to `dir/checkpoint_filename(strategy_name, timestamp)`
/// by writing to a sibling temp file and renaming over the final path
/// (§5 "write to temp + rename") — a reader never observes a
/// partially-written checkpoint.
pub fn write_checkpoint(dir: &Path, strategy_name: &str, iso_timestamp: &str, trials: &[TrialResult]) -> Result<PathBuf, CheckpointError> {
    let final_path = dir.join(checkpoint_filename(strategy_name, iso_timestamp));
    let tmp_path = dir.join(format!(".{}.tmp", checkpoint_filename(strategy_name, iso_timestamp)));

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

/// Loads a previously-written checkpoint. `metrics` on every returned
/// `TrialResult` is `None` — only `params`, `error`, and the raw
/// `sharpe` scalar survive the round trip (see `csv_io::parse_row`) —
/// which is all `already_tested` and compiled-results ranking need.
pub fn load_checkpoint(path: &Path) -> Result<Vec<(TrialResult, rust_decimal::Decimal)>, CheckpointError> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .map_err(|e| CheckpointError::ReadFailed { path: path.display().to_string(), reason: e.to_string() })?;
    let header: Vec<String> = reader
        .headers()
        .map_err(|e| CheckpointError::ReadFailed { path: path.display().to_string(), reason: e.to_string() })?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| CheckpointError::MalformedRow { index, reason: e.to_string() })?;
        rows.push(csv_io::parse_row(&header, &record, index)?);
    }
    Ok(rows)
}

/// The order-independent parameter tuples already present in `trials`
/// (§4.5 "build a set of already-tested parameter tuples... and skip
/// them" on resume).
pub fn already_tested(trials: &[(TrialResult, rust_decimal::Decimal)]) -> HashSet<Vec<(String, String)>> {
    trials.iter().map(|(t, _)| tuple_key(&t.params)).collect()
}

pub fn has_been_tested(tested: &HashSet<Vec<(String, String)>>, params: &ParamSet) -> bool {
    tested.contains(&tuple_key(params))
}
