use crate::config::ConnectionConfig;
use crate::error::{ExecutionError, Result};
use crate::ir::Value;
use crate::options::{IsolationLevel, RequestPriority, Staleness};

/// How a request attaches to a transaction, mirroring the selector the wire
/// protocol carries on every read/write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionSelector {
    /// One-shot read outside any transaction; autocommit reads use this.
    SingleUse(ReadOnlySnapshot),
    /// Begin a transaction with these options as part of this request.
    Begin(TransactionOptions),
    /// Continue the transaction already begun on this connection.
    Existing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOptions {
    ReadWrite { isolation: IsolationLevel },
    ReadOnly(ReadOnlySnapshot),
    PartitionedDml,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOnlySnapshot {
    pub staleness: Staleness,
    pub return_read_timestamp: bool,
}

impl ReadOnlySnapshot {
    pub fn strong() -> Self {
        Self {
            staleness: Staleness::Strong,
            return_read_timestamp: true,
        }
    }

    pub fn bounded(staleness: Staleness) -> Self {
        Self {
            staleness,
            return_read_timestamp: true,
        }
    }
}

/// One statement crossing the driver boundary: SQL with `@a<N>` markers,
/// parameters in marker order, and the per-request options the dialect
/// resolved for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteRequest {
    pub sql: String,
    pub params: Vec<Value>,
    pub transaction: TransactionSelector,
    pub priority: Option<RequestPriority>,
    pub request_tag: Option<String>,
    pub transaction_tag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub rows: Vec<Row>,
    /// Exact count for transactional DML, lower bound for partitioned DML.
    pub row_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

impl Row {
    pub fn value(&self, column: &str, sql: &str) -> Result<&Value> {
        self.columns
            .iter()
            .position(|name| name == column)
            .and_then(|index| self.values.get(index))
            .ok_or_else(|| {
                ExecutionError::MissingColumn {
                    column: column.to_string(),
                    sql: sql.to_string(),
                }
                .into()
            })
    }

    pub fn str_value(&self, column: &str, sql: &str) -> Result<String> {
        match self.value(column, sql)? {
            Value::String(text) => Ok(text.clone()),
            other => Err(ExecutionError::MissingColumn {
                column: format!("{column} (expected string, got {other:?})"),
                sql: sql.to_string(),
            }
            .into()),
        }
    }

    pub fn opt_str_value(&self, column: &str, sql: &str) -> Result<Option<String>> {
        match self.value(column, sql)? {
            Value::String(text) => Ok(Some(text.clone())),
            Value::Null => Ok(None),
            other => Err(ExecutionError::MissingColumn {
                column: format!("{column} (expected string or null, got {other:?})"),
                sql: sql.to_string(),
            }
            .into()),
        }
    }

    pub fn bool_value(&self, column: &str, sql: &str) -> Result<bool> {
        match self.value(column, sql)? {
            Value::Bool(flag) => Ok(*flag),
            // information_schema yields STRING 'YES'/'NO' for some flags.
            Value::String(text) => Ok(text == "YES" || text == "TRUE" || text == "true"),
            other => Err(ExecutionError::MissingColumn {
                column: format!("{column} (expected bool, got {other:?})"),
                sql: sql.to_string(),
            }
            .into()),
        }
    }
}

/// The seam between the dialect and the Spanner RPC client. All network I/O
/// happens behind this trait; the dialect never constructs wire messages
/// itself. One connection is owned by at most one thread at a time.
pub trait DriverConnection {
    fn execute(&mut self, request: &ExecuteRequest) -> Result<ResultSet>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;

    /// Whether the driver already rolled the current transaction back, e.g.
    /// after an aborted statement. A dialect-level rollback is then a no-op.
    fn is_rolled_back(&self) -> bool;

    /// A single-use strong read outside any transaction. Reflection queries
    /// go through here so they never join the caller's transaction.
    fn snapshot_query(&mut self, sql: &str, params: &[Value]) -> Result<ResultSet>;

    fn close(&mut self) -> Result<()>;
}

/// Constructs driver connections. Injected into the dialect so the RPC
/// client stays an external collaborator.
pub trait DriverFactory {
    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn DriverConnection>>;

    /// The project a pre-built client is bound to, when one was supplied.
    /// The dialect refuses to connect when it disagrees with the URL.
    fn client_project(&self) -> Option<&str> {
        None
    }
}
