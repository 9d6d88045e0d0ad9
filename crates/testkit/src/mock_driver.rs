use std::{
    collections::VecDeque,
    error::Error as StdError,
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

use bridgeql_core::{
    ConnectionConfig, DriverConnection, DriverFactory, ExecuteRequest, ExecutionError, Result,
    ResultSet, Value,
};

/// A scripted driver connection. Clones share state, so a test keeps one
/// handle for assertions while the connection under test owns another.
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    requests: Vec<ExecuteRequest>,
    results: VecDeque<ResultSet>,
    snapshot_requests: Vec<(String, Vec<Value>)>,
    snapshot_results: VecDeque<ResultSet>,
    commits: usize,
    rollbacks: usize,
    rolled_back: bool,
    closed: bool,
    fail_next: Option<String>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Box<dyn DriverConnection> {
        Box::new(self.clone())
    }

    /// Queues a result for the next `execute` call. When the queue runs dry,
    /// `execute` answers with an empty result set.
    pub fn push_result(&self, result: ResultSet) {
        self.state_guard().results.push_back(result);
    }

    /// Queues a result for the next `snapshot_query` call.
    pub fn push_snapshot_result(&self, result: ResultSet) {
        self.state_guard().snapshot_results.push_back(result);
    }

    /// Makes the next `execute` call fail with the given message and leaves
    /// the connection rolled back, the way an aborted statement does.
    pub fn fail_next_execute(&self, message: &str) {
        self.state_guard().fail_next = Some(message.to_string());
    }

    pub fn mark_rolled_back(&self) {
        self.state_guard().rolled_back = true;
    }

    pub fn requests(&self) -> Vec<ExecuteRequest> {
        self.state_guard().requests.clone()
    }

    pub fn snapshot_requests(&self) -> Vec<(String, Vec<Value>)> {
        self.state_guard().snapshot_requests.clone()
    }

    pub fn commit_count(&self) -> usize {
        self.state_guard().commits
    }

    pub fn rollback_count(&self) -> usize {
        self.state_guard().rollbacks
    }

    pub fn is_closed(&self) -> bool {
        self.state_guard().closed
    }

    fn state_guard(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("mock driver mutex should lock")
    }
}

impl DriverConnection for MockDriver {
    fn execute(&mut self, request: &ExecuteRequest) -> Result<ResultSet> {
        let mut state = self.state_guard();
        state.requests.push(request.clone());

        if let Some(message) = state.fail_next.take() {
            state.rolled_back = true;
            return Err(
                ExecutionError::statement_failed(request.sql.clone(), ScriptedFailure(message))
                    .into(),
            );
        }
        Ok(state.results.pop_front().unwrap_or_default())
    }

    fn commit(&mut self) -> Result<()> {
        let mut state = self.state_guard();
        state.commits += 1;
        state.rolled_back = false;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        let mut state = self.state_guard();
        state.rollbacks += 1;
        state.rolled_back = false;
        Ok(())
    }

    fn is_rolled_back(&self) -> bool {
        self.state_guard().rolled_back
    }

    fn snapshot_query(&mut self, sql: &str, params: &[Value]) -> Result<ResultSet> {
        let mut state = self.state_guard();
        state
            .snapshot_requests
            .push((sql.to_string(), params.to_vec()));
        Ok(state.snapshot_results.pop_front().unwrap_or_default())
    }

    fn close(&mut self) -> Result<()> {
        self.state_guard().closed = true;
        Ok(())
    }
}

/// Hands out clones of one shared [`MockDriver`], optionally pinned to a
/// project the way a pre-built client would be.
#[derive(Debug, Clone, Default)]
pub struct MockFactory {
    driver: MockDriver,
    project: Option<String>,
}

impl MockFactory {
    pub fn new(driver: MockDriver) -> Self {
        Self {
            driver,
            project: None,
        }
    }

    pub fn bound_to_project(driver: MockDriver, project: &str) -> Self {
        Self {
            driver,
            project: Some(project.to_string()),
        }
    }
}

impl DriverFactory for MockFactory {
    fn connect(&self, _config: &ConnectionConfig) -> Result<Box<dyn DriverConnection>> {
        Ok(self.driver.handle())
    }

    fn client_project(&self) -> Option<&str> {
        self.project.as_deref()
    }
}

#[derive(Debug)]
struct ScriptedFailure(String);

impl fmt::Display for ScriptedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for ScriptedFailure {}
