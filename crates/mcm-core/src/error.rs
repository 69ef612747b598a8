//! Error types shared by the evidence engine, gauge transform, and search code.

use thiserror::Error;

/// Everything that can go wrong building or running a [`crate::model::Model`].
#[derive(Debug, Error)]
pub enum McmError {
    /// `n`, `q`, or `max_order` fell outside the bounds this system accepts.
    #[error("{what} is out of range: {value} (expected {bound})")]
    InputOutOfRange {
        what: &'static str,
        value: i64,
        bound: &'static str,
    },

    /// The dataset file could not be opened or read.
    #[error("io: {0}")]
    IoFailure(#[from] std::io::Error),

    /// A dataset line could not be parsed into `n` digit values.
    #[error("malformed observation on line {line}: {detail}")]
    MalformedObservation { line: usize, detail: String },

    /// Exhaustive search was requested for an `n` whose dense evidence cache
    /// (2^n - 1 `f64`s) would exceed the configured memory threshold.
    #[error(
        "exhaustive search refused for n={n}: dense cache would need 2^{n}-1 entries, above the threshold of {threshold}"
    )]
    NumericLimit { n: usize, threshold: usize },
}

pub type Result<T> = std::result::Result<T, McmError>;
