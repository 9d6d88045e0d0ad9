//! Per-statement resolution of connection state into driver-level request
//! settings: which transaction selector a statement rides on, and which
//! tags and priority it carries.

use bridgeql_core::{
    AutocommitDmlMode, GenerateError, IsolationLevel, ReadOnlySnapshot, RequestPriority, Result,
    Staleness, TransactionOptions, TransactionSelector,
};

/// Whether a statement reads or mutates; decides the selector shape under
/// autocommit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Query,
    Dml,
}

/// Connection-scoped state the resolver reads. Owned by the connection and
/// mutated only through its execution path.
#[derive(Debug, Clone)]
pub(crate) struct ConnectionState {
    pub autocommit: bool,
    pub isolation: IsolationLevel,
    pub read_only: bool,
    pub staleness: Option<Staleness>,
    pub priority: Option<RequestPriority>,
    pub request_tag: Option<String>,
    pub transaction_tag: Option<String>,
    pub autocommit_dml_mode: AutocommitDmlMode,
    pub ignore_transaction_warnings: bool,
    pub in_transaction: bool,
}

impl ConnectionState {
    pub(crate) fn new() -> Self {
        Self {
            autocommit: false,
            isolation: IsolationLevel::Serializable,
            read_only: false,
            staleness: None,
            priority: None,
            request_tag: None,
            transaction_tag: None,
            autocommit_dml_mode: AutocommitDmlMode::Transactional,
            ignore_transaction_warnings: false,
            in_transaction: false,
        }
    }
}

/// The driver-facing settings resolved for one statement. `request_tag` is
/// consumed from the connection; it applies to this statement only.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub selector: TransactionSelector,
    pub priority: Option<RequestPriority>,
    pub request_tag: Option<String>,
    pub transaction_tag: Option<String>,
}

pub(crate) fn resolve_request(
    state: &mut ConnectionState,
    kind: StatementKind,
) -> Result<ResolvedRequest> {
    let selector = resolve_selector(state, kind)?;

    Ok(ResolvedRequest {
        selector,
        priority: state.priority,
        request_tag: state.request_tag.take(),
        transaction_tag: state.transaction_tag.clone(),
    })
}

fn resolve_selector(
    state: &mut ConnectionState,
    kind: StatementKind,
) -> Result<TransactionSelector> {
    if state.autocommit {
        return Ok(match kind {
            StatementKind::Query => {
                TransactionSelector::SingleUse(snapshot_bounds(state.staleness.clone()))
            }
            StatementKind::Dml => match state.autocommit_dml_mode {
                AutocommitDmlMode::Transactional => {
                    TransactionSelector::Begin(TransactionOptions::ReadWrite {
                        isolation: state.isolation,
                    })
                }
                AutocommitDmlMode::PartitionedNonAtomic => {
                    TransactionSelector::Begin(TransactionOptions::PartitionedDml)
                }
            },
        });
    }

    // Bounds that only make sense for one-shot reads conflict with any
    // multi-use transaction.
    if let Some(staleness) = &state.staleness {
        if staleness.single_use_only() {
            return Err(GenerateError::Programming {
                context: "staleness".to_string(),
                message: format!(
                    "{staleness:?} applies to single-use reads and requires autocommit"
                ),
            }
            .into());
        }
    }

    if state.in_transaction {
        return Ok(TransactionSelector::Existing);
    }
    state.in_transaction = true;

    if state.read_only {
        return Ok(TransactionSelector::Begin(TransactionOptions::ReadOnly(
            snapshot_bounds(state.staleness.clone()),
        )));
    }

    Ok(TransactionSelector::Begin(TransactionOptions::ReadWrite {
        isolation: state.isolation,
    }))
}

fn snapshot_bounds(staleness: Option<Staleness>) -> ReadOnlySnapshot {
    match staleness {
        Some(staleness) => ReadOnlySnapshot::bounded(staleness),
        None => ReadOnlySnapshot::strong(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bridgeql_core::{
        IsolationLevel, Staleness, TransactionOptions, TransactionSelector,
    };

    use super::{resolve_request, ConnectionState, StatementKind};

    #[test]
    fn default_state_begins_serializable_read_write() {
        let mut state = ConnectionState::new();
        let resolved = resolve_request(&mut state, StatementKind::Dml).unwrap();
        assert_eq!(
            resolved.selector,
            TransactionSelector::Begin(TransactionOptions::ReadWrite {
                isolation: IsolationLevel::Serializable,
            })
        );

        let next = resolve_request(&mut state, StatementKind::Dml).unwrap();
        assert_eq!(next.selector, TransactionSelector::Existing);
    }

    #[test]
    fn autocommit_queries_use_single_use_snapshots() {
        let mut state = ConnectionState::new();
        state.autocommit = true;
        state.staleness = Some(Staleness::MaxStaleness(Duration::from_secs(15)));

        for _ in 0..2 {
            let resolved = resolve_request(&mut state, StatementKind::Query).unwrap();
            match resolved.selector {
                TransactionSelector::SingleUse(snapshot) => {
                    assert_eq!(
                        snapshot.staleness,
                        Staleness::MaxStaleness(Duration::from_secs(15))
                    );
                    assert!(snapshot.return_read_timestamp);
                }
                other => panic!("expected single-use selector, got {other:?}"),
            }
        }
        assert!(!state.in_transaction, "single-use reads never open a transaction");
    }

    #[test]
    fn autocommit_dml_keeps_the_configured_isolation() {
        let mut state = ConnectionState::new();
        state.isolation = IsolationLevel::RepeatableRead;
        state.autocommit = true;

        let resolved = resolve_request(&mut state, StatementKind::Dml).unwrap();
        assert_eq!(
            resolved.selector,
            TransactionSelector::Begin(TransactionOptions::ReadWrite {
                isolation: IsolationLevel::RepeatableRead,
            }),
            "switching into autocommit should not reset the isolation level"
        );
    }

    #[test]
    fn single_use_staleness_outside_autocommit_is_rejected() {
        let mut state = ConnectionState::new();
        state.staleness = Some(Staleness::MaxStaleness(Duration::from_secs(10)));

        let error = resolve_request(&mut state, StatementKind::Query)
            .expect_err("max_staleness requires autocommit");
        assert!(error.to_string().contains("autocommit"));
    }

    #[test]
    fn request_tag_is_consumed_once() {
        let mut state = ConnectionState::new();
        state.request_tag = Some("tag-1".to_string());

        let first = resolve_request(&mut state, StatementKind::Query).unwrap();
        assert_eq!(first.request_tag.as_deref(), Some("tag-1"));

        let second = resolve_request(&mut state, StatementKind::Query).unwrap();
        assert_eq!(second.request_tag, None);
    }
}
