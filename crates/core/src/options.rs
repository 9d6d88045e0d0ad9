use std::time::Duration;

use crate::error::{GenerateError, Result};

/// Transaction isolation as the host toolkit names it. `Autocommit` is not a
/// real isolation level; it switches the connection to per-statement commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    #[default]
    Serializable,
    RepeatableRead,
    Autocommit,
}

impl IsolationLevel {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "SERIALIZABLE" => Ok(IsolationLevel::Serializable),
            "REPEATABLE READ" => Ok(IsolationLevel::RepeatableRead),
            "AUTOCOMMIT" => Ok(IsolationLevel::Autocommit),
            other => Err(GenerateError::Programming {
                context: "isolation_level".to_string(),
                message: format!("unknown isolation level `{other}`"),
            }
            .into()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IsolationLevel::Serializable => "SERIALIZABLE",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Autocommit => "AUTOCOMMIT",
        }
    }
}

/// Read-staleness bound for read-only transactions and single-use reads.
/// Timestamps are RFC 3339 strings; durations are wall-clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    Strong,
    ReadTimestamp(String),
    MinReadTimestamp(String),
    ExactStaleness(Duration),
    MaxStaleness(Duration),
}

impl Staleness {
    /// Bounds valid only for single-use reads. Multi-use read-only
    /// transactions accept the remaining variants.
    pub fn single_use_only(&self) -> bool {
        matches!(
            self,
            Staleness::MaxStaleness(_) | Staleness::MinReadTimestamp(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutocommitDmlMode {
    #[default]
    Transactional,
    PartitionedNonAtomic,
}

/// Per-connection and per-statement options supplied by the host toolkit.
/// Unset fields leave the connection's current state untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionOptions {
    pub isolation_level: Option<IsolationLevel>,
    pub read_only: Option<bool>,
    pub staleness: Option<Staleness>,
    pub request_priority: Option<RequestPriority>,
    pub request_tag: Option<String>,
    pub transaction_tag: Option<String>,
    pub autocommit_dml_mode: Option<AutocommitDmlMode>,
    pub ignore_transaction_warnings: Option<bool>,
}

impl ExecutionOptions {
    pub fn isolation(level: IsolationLevel) -> Self {
        Self {
            isolation_level: Some(level),
            ..Self::default()
        }
    }
}
