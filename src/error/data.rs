use thiserror::Error;

/// Malformed input dataset. Fatal at dataset construction: a backtest run
/// against an inconsistent dataset would be meaningless, so these are
/// never downgraded to a skipped day the way pricing/strategy errors are.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("missing mandatory column '{0}'")]
    MissingColumn(String),

    #[error("dates are not sorted ascending: {prev} appears before {next}")]
    UnsortedDates { prev: chrono::NaiveDate, next: chrono::NaiveDate },

    #[error(
        "duplicate option row for (quote_date={quote_date}, expiration={expiration}, strike={strike}, type={option_type:?})"
    )]
    DuplicateRow {
        quote_date: String,
        expiration: String,
        strike: String,
        option_type: crate::model::types::OptionType,
    },

    #[error("empty dataset: no trading days present")]
    EmptyDataset,

    #[error("failed to read '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse row {row}: {reason}")]
    RowParse { row: usize, reason: String },
}
