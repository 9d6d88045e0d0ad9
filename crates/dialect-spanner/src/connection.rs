//! The dialect-level connection: owns the driver handle, applies host
//! execution options, and enforces the commit/rollback semantics autocommit
//! and read-only modes change.

use bridgeql_core::{
    AutocommitDmlMode, ColumnDescriptor, CompiledSql, DriverConnection, ExecuteRequest,
    ExecutionOptions, ForeignKeyDescriptor, IndexDescriptor, IsolationLevel,
    PrimaryKeyDescriptor, Result, ResultSet, SequenceDescriptor,
};
use tracing::warn;

use crate::execution::{resolve_request, ConnectionState, StatementKind};
use crate::introspect;
use crate::trace::TraceShim;

pub struct SpannerConnection {
    driver: Box<dyn DriverConnection>,
    state: ConnectionState,
    trace: TraceShim,
}

impl std::fmt::Debug for SpannerConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpannerConnection").finish_non_exhaustive()
    }
}

impl SpannerConnection {
    pub fn new(driver: Box<dyn DriverConnection>, trace: TraceShim) -> Self {
        Self {
            driver,
            state: ConnectionState::new(),
            trace,
        }
    }

    /// Applies host-level execution options. Options that affect the whole
    /// transaction take effect at the next begin; request-scoped options are
    /// consumed by the next statement.
    pub fn apply_options(&mut self, options: &ExecutionOptions) -> Result<()> {
        if let Some(level) = options.isolation_level {
            if level == IsolationLevel::Autocommit {
                self.state.autocommit = true;
            } else {
                self.state.autocommit = false;
                self.state.isolation = level;
            }
        }
        if let Some(read_only) = options.read_only {
            if read_only && self.state.in_transaction && !self.state.ignore_transaction_warnings {
                warn!("read_only set while a transaction is open; applies to the next transaction");
            }
            self.state.read_only = read_only;
        }
        if let Some(staleness) = &options.staleness {
            self.state.staleness = Some(staleness.clone());
        }
        if let Some(priority) = options.request_priority {
            self.state.priority = Some(priority);
        }
        if let Some(tag) = &options.request_tag {
            self.state.request_tag = Some(tag.clone());
        }
        if let Some(tag) = &options.transaction_tag {
            self.state.transaction_tag = Some(tag.clone());
        }
        if let Some(mode) = options.autocommit_dml_mode {
            self.state.autocommit_dml_mode = mode;
        }
        if let Some(flag) = options.ignore_transaction_warnings {
            self.state.ignore_transaction_warnings = flag;
        }

        Ok(())
    }

    pub fn autocommit(&self) -> bool {
        self.state.autocommit
    }

    pub fn execute(&mut self, compiled: &CompiledSql, kind: StatementKind) -> Result<ResultSet> {
        let request = self.build_request(compiled, kind)?;
        let commit_after = self.commits_per_statement(kind);

        let guard = self.trace.start("execute");
        let result = self.driver.execute(&request);
        guard.finish(&result);
        let result_set = result?;

        // Autocommit DML opens its own transaction; close it immediately.
        if commit_after {
            self.driver.commit()?;
        }
        Ok(result_set)
    }

    /// Executes a batch of compiled statements, one request per statement,
    /// preserving order. Used for the executemany path. Under autocommit each
    /// DML statement begins its own implicit transaction, so each one is
    /// committed before the next is sent.
    pub fn execute_many(
        &mut self,
        statements: &[CompiledSql],
        kind: StatementKind,
    ) -> Result<Vec<ResultSet>> {
        let commit_each = self.commits_per_statement(kind);

        let guard = self.trace.start("executemany");
        let mut results = Vec::with_capacity(statements.len());
        for compiled in statements {
            let request = self.build_request(compiled, kind)?;
            match self.driver.execute(&request) {
                Ok(result_set) => results.push(result_set),
                Err(error) => {
                    guard.error(&error);
                    return Err(error);
                }
            }
            if commit_each {
                if let Err(error) = self.driver.commit() {
                    guard.error(&error);
                    return Err(error);
                }
            }
        }
        guard.ok();

        Ok(results)
    }

    /// Autocommit DML closes its implicit transaction after every statement.
    /// Partitioned DML has no commit step; the driver applies it as it runs.
    fn commits_per_statement(&self, kind: StatementKind) -> bool {
        self.state.autocommit
            && kind == StatementKind::Dml
            && self.state.autocommit_dml_mode == AutocommitDmlMode::Transactional
    }

    pub fn commit(&mut self) -> Result<()> {
        if self.state.autocommit {
            return Ok(());
        }
        let guard = self.trace.start("commit");
        let result = self.driver.commit();
        guard.finish(&result);
        self.state.in_transaction = false;
        result
    }

    /// No-op when autocommit is on or when the driver already rolled the
    /// transaction back after a failed statement.
    pub fn rollback(&mut self) -> Result<()> {
        if self.state.autocommit {
            return Ok(());
        }
        if self.driver.is_rolled_back() {
            self.state.in_transaction = false;
            return Ok(());
        }
        let guard = self.trace.start("rollback");
        let result = self.driver.rollback();
        guard.finish(&result);
        self.state.in_transaction = false;
        result
    }

    pub fn close(&mut self) -> Result<()> {
        let guard = self.trace.start("close");
        let result = self.driver.close();
        guard.finish(&result);
        result
    }

    pub(crate) fn driver_mut(&mut self) -> &mut dyn DriverConnection {
        self.driver.as_mut()
    }

    // Reflection runs through the driver's single-use snapshot path, so it
    // never joins or begins this connection's transaction.

    pub fn get_columns(
        &mut self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ColumnDescriptor>> {
        introspect::get_columns(self.driver_mut(), table, schema)
    }

    pub fn get_indexes(
        &mut self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<IndexDescriptor>> {
        introspect::get_indexes(self.driver_mut(), table, schema)
    }

    pub fn get_unique_constraints(
        &mut self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<IndexDescriptor>> {
        introspect::get_unique_constraints(self.driver_mut(), table, schema)
    }

    pub fn get_pk_constraint(
        &mut self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<PrimaryKeyDescriptor> {
        introspect::get_pk_constraint(self.driver_mut(), table, schema)
    }

    pub fn get_foreign_keys(
        &mut self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ForeignKeyDescriptor>> {
        introspect::get_foreign_keys(self.driver_mut(), table, schema)
    }

    pub fn get_schema_names(&mut self) -> Result<Vec<String>> {
        introspect::get_schema_names(self.driver_mut())
    }

    pub fn get_table_names(&mut self, schema: Option<&str>) -> Result<Vec<String>> {
        introspect::get_table_names(self.driver_mut(), schema)
    }

    pub fn get_view_names(&mut self, schema: Option<&str>) -> Result<Vec<String>> {
        introspect::get_view_names(self.driver_mut(), schema)
    }

    pub fn get_view_definition(
        &mut self,
        view: &str,
        schema: Option<&str>,
    ) -> Result<Option<String>> {
        introspect::get_view_definition(self.driver_mut(), view, schema)
    }

    pub fn has_table(&mut self, table: &str, schema: Option<&str>) -> Result<bool> {
        introspect::has_table(self.driver_mut(), table, schema)
    }

    pub fn has_sequence(&mut self, name: &str, schema: Option<&str>) -> Result<bool> {
        introspect::has_sequence(self.driver_mut(), name, schema)
    }

    pub fn get_sequence_names(
        &mut self,
        schema: Option<&str>,
    ) -> Result<Vec<SequenceDescriptor>> {
        introspect::get_sequence_names(self.driver_mut(), schema)
    }

    fn build_request(&mut self, compiled: &CompiledSql, kind: StatementKind) -> Result<ExecuteRequest> {
        let resolved = resolve_request(&mut self.state, kind)?;
        Ok(ExecuteRequest {
            sql: compiled.sql.clone(),
            params: compiled.params.clone(),
            transaction: resolved.selector,
            priority: resolved.priority,
            request_tag: resolved.request_tag,
            transaction_tag: resolved.transaction_tag,
        })
    }
}
