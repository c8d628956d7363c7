use thiserror::Error;

/// Any error inside a single optimizer trial. Caught by the driver,
/// recorded as a row with sentinel metrics (`sharpe = -999`) and an
/// `error` column; optimization continues with the next trial.
#[derive(Error, Debug)]
pub enum TrialError {
    #[error(transparent)]
    Config(#[from] crate::error::ConfigError),

    #[error(transparent)]
    Data(#[from] crate::error::DataError),

    #[error("strategy '{strategy}' failed during trial: {reason}")]
    StrategyFailure { strategy: String, reason: String },

    #[error("trial exceeded its wall-clock budget of {budget_secs}s")]
    TimedOut { budget_secs: u64 },
}

/// Raised on checkpoint write failure. Logged; the trial results stay in
/// memory and are retried on the next checkpoint tick rather than lost.
#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("failed to write checkpoint to '{path}': {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("failed to read checkpoint from '{path}': {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("checkpoint row at index {index} could not be parsed: {reason}")]
    MalformedRow { index: usize, reason: String },
}
