use std::error::Error as StdError;

use thiserror::Error;

/// Compile-time failures: features the target backend cannot express, and
/// malformed inputs caught before anything reaches the driver.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{feature} is not supported by the {dialect} dialect: {message}")]
    UnsupportedFeature {
        feature: String,
        message: String,
        dialect: String,
    },
    #[error("programming error in {context}: {message}")]
    Programming { context: String, message: String },
}

/// Driver-boundary failures. The source is the driver's own error, boxed so
/// integrity, operational, and transient RPC errors all travel unchanged.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("statement failed: {sql}")]
    StatementFailed {
        sql: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("column `{column}` missing from result row for: {sql}")]
    MissingColumn { column: String, sql: String },
}

impl ExecutionError {
    pub fn statement_failed<E>(sql: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        ExecutionError::StatementFailed {
            sql: sql.into(),
            source: Box::new(source),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Execute(#[from] ExecutionError),
}

pub type Result<T> = std::result::Result<T, Error>;
