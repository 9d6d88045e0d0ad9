use std::time::Duration;

use bridgeql_core::{
    AutocommitDmlMode, CompiledSql, ExecutionOptions, IsolationLevel, Staleness,
    TransactionOptions, TransactionSelector,
};
use bridgeql_dialect_spanner::{SpannerConnection, StatementKind, TraceShim};
use bridgeql_testkit::MockDriver;

fn connection(driver: &MockDriver) -> SpannerConnection {
    SpannerConnection::new(driver.handle(), TraceShim::disabled())
}

fn query(sql: &str) -> CompiledSql {
    CompiledSql {
        sql: sql.to_string(),
        params: Vec::new(),
    }
}

#[test]
fn first_statement_begins_serializable_then_joins() {
    let driver = MockDriver::new();
    let mut connection = connection(&driver);

    connection
        .execute(&query("SELECT 1"), StatementKind::Query)
        .expect("query should execute");
    connection
        .execute(&query("SELECT 2"), StatementKind::Query)
        .expect("query should execute");

    let requests = driver.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].transaction,
        TransactionSelector::Begin(TransactionOptions::ReadWrite {
            isolation: IsolationLevel::Serializable,
        }),
        "the first statement begins the transaction inline"
    );
    assert_eq!(requests[1].transaction, TransactionSelector::Existing);

    connection.commit().expect("commit should succeed");
    assert_eq!(driver.commit_count(), 1);
}

#[test]
fn autocommit_reads_are_single_use_snapshots() {
    let driver = MockDriver::new();
    let mut connection = connection(&driver);

    let mut options = ExecutionOptions::isolation(IsolationLevel::Autocommit);
    options.staleness = Some(Staleness::MaxStaleness(Duration::from_secs(15)));
    connection
        .apply_options(&options)
        .expect("options should apply");
    assert!(connection.autocommit());

    for sql in ["SELECT 1", "SELECT 2"] {
        connection
            .execute(&query(sql), StatementKind::Query)
            .expect("query should execute");
    }

    for request in driver.requests() {
        match &request.transaction {
            TransactionSelector::SingleUse(snapshot) => {
                assert_eq!(
                    snapshot.staleness,
                    Staleness::MaxStaleness(Duration::from_secs(15))
                );
                assert!(snapshot.return_read_timestamp);
            }
            other => panic!("autocommit reads must be single-use, got {other:?}"),
        }
    }
    assert_eq!(
        driver.commit_count(),
        0,
        "single-use reads never open a transaction to commit"
    );

    connection.commit().expect("commit is a no-op under autocommit");
    connection.rollback().expect("rollback is a no-op under autocommit");
    assert_eq!(driver.commit_count(), 0);
    assert_eq!(driver.rollback_count(), 0);
}

#[test]
fn autocommit_dml_commits_after_each_statement() {
    let driver = MockDriver::new();
    let mut connection = connection(&driver);
    connection
        .apply_options(&ExecutionOptions::isolation(IsolationLevel::Autocommit))
        .expect("options should apply");

    connection
        .execute(&query("DELETE FROM singers WHERE TRUE"), StatementKind::Dml)
        .expect("dml should execute");

    let requests = driver.requests();
    assert_eq!(
        requests[0].transaction,
        TransactionSelector::Begin(TransactionOptions::ReadWrite {
            isolation: IsolationLevel::Serializable,
        }),
        "autocommit DML still runs transactionally"
    );
    assert_eq!(driver.commit_count(), 1, "the implicit transaction closes at once");
}

#[test]
fn autocommit_batches_commit_after_every_statement() {
    let driver = MockDriver::new();
    let mut connection = connection(&driver);
    connection
        .apply_options(&ExecutionOptions::isolation(IsolationLevel::Autocommit))
        .expect("options should apply");

    let statements = vec![
        query("INSERT INTO singers (name) VALUES (@a0)"),
        query("INSERT INTO singers (name) VALUES (@a0)"),
    ];
    connection
        .execute_many(&statements, StatementKind::Dml)
        .expect("batch should execute");

    let begins = driver
        .requests()
        .iter()
        .filter(|request| matches!(request.transaction, TransactionSelector::Begin(_)))
        .count();
    assert_eq!(begins, 2, "each autocommit DML statement begins its own transaction");
    assert_eq!(
        driver.commit_count(),
        begins,
        "every begun implicit transaction must be committed, not just the last"
    );
}

#[test]
fn autocommit_keeps_a_previously_set_isolation_level() {
    let driver = MockDriver::new();
    let mut connection = connection(&driver);

    connection
        .apply_options(&ExecutionOptions::isolation(IsolationLevel::RepeatableRead))
        .expect("options should apply");
    connection
        .apply_options(&ExecutionOptions::isolation(IsolationLevel::Autocommit))
        .expect("options should apply");

    connection
        .execute(&query("UPDATE singers SET name = @a0 WHERE TRUE"), StatementKind::Dml)
        .expect("dml should execute");

    assert_eq!(
        driver.requests()[0].transaction,
        TransactionSelector::Begin(TransactionOptions::ReadWrite {
            isolation: IsolationLevel::RepeatableRead,
        }),
        "switching into autocommit should not reset the isolation level"
    );
}

#[test]
fn partitioned_autocommit_dml_never_commits() {
    let driver = MockDriver::new();
    let mut connection = connection(&driver);

    let mut options = ExecutionOptions::isolation(IsolationLevel::Autocommit);
    options.autocommit_dml_mode = Some(AutocommitDmlMode::PartitionedNonAtomic);
    connection
        .apply_options(&options)
        .expect("options should apply");

    connection
        .execute(&query("DELETE FROM singers WHERE TRUE"), StatementKind::Dml)
        .expect("partitioned dml should execute");

    assert_eq!(
        driver.requests()[0].transaction,
        TransactionSelector::Begin(TransactionOptions::PartitionedDml)
    );
    assert_eq!(
        driver.commit_count(),
        0,
        "partitioned DML has no commit step"
    );
}

#[test]
fn read_only_connections_begin_read_only_transactions() {
    let driver = MockDriver::new();
    let mut connection = connection(&driver);

    let mut options = ExecutionOptions::default();
    options.read_only = Some(true);
    options.staleness = Some(Staleness::ExactStaleness(Duration::from_secs(10)));
    connection
        .apply_options(&options)
        .expect("options should apply");

    connection
        .execute(&query("SELECT 1"), StatementKind::Query)
        .expect("query should execute");

    match &driver.requests()[0].transaction {
        TransactionSelector::Begin(TransactionOptions::ReadOnly(snapshot)) => {
            assert_eq!(
                snapshot.staleness,
                Staleness::ExactStaleness(Duration::from_secs(10))
            );
        }
        other => panic!("expected a read-only begin, got {other:?}"),
    }
}

#[test]
fn single_use_staleness_needs_autocommit() {
    let driver = MockDriver::new();
    let mut connection = connection(&driver);

    let mut options = ExecutionOptions::default();
    options.staleness = Some(Staleness::MaxStaleness(Duration::from_secs(15)));
    connection
        .apply_options(&options)
        .expect("options should apply");

    let error = connection
        .execute(&query("SELECT 1"), StatementKind::Query)
        .expect_err("max_staleness outside autocommit must fail");
    assert!(
        error.to_string().contains("autocommit"),
        "error should point at autocommit: {error}"
    );
    assert!(
        driver.requests().is_empty(),
        "nothing should reach the driver"
    );
}

#[test]
fn request_tag_applies_to_one_statement() {
    let driver = MockDriver::new();
    let mut connection = connection(&driver);

    let mut options = ExecutionOptions::default();
    options.request_tag = Some("hot-path".to_string());
    options.transaction_tag = Some("batch-job".to_string());
    connection
        .apply_options(&options)
        .expect("options should apply");

    connection
        .execute(&query("SELECT 1"), StatementKind::Query)
        .expect("query should execute");
    connection
        .execute(&query("SELECT 2"), StatementKind::Query)
        .expect("query should execute");

    let requests = driver.requests();
    assert_eq!(requests[0].request_tag.as_deref(), Some("hot-path"));
    assert_eq!(requests[1].request_tag, None, "request tags are consumed");
    assert_eq!(requests[0].transaction_tag.as_deref(), Some("batch-job"));
    assert_eq!(
        requests[1].transaction_tag.as_deref(),
        Some("batch-job"),
        "transaction tags persist for the transaction"
    );
}

#[test]
fn rollback_after_driver_rollback_is_a_no_op() {
    let driver = MockDriver::new();
    let mut connection = connection(&driver);

    driver.fail_next_execute("already exists");
    connection
        .execute(&query("INSERT INTO singers (name) VALUES (@a0)"), StatementKind::Dml)
        .expect_err("scripted failure should surface");

    connection
        .rollback()
        .expect("rollback after a driver-side rollback should be silent");
    assert_eq!(
        driver.rollback_count(),
        0,
        "no rollback RPC goes out when the driver already rolled back"
    );

    connection.rollback().expect("repeated rollback stays silent");
    assert_eq!(driver.rollback_count(), 0);
}

#[test]
fn execute_many_submits_in_order_and_stops_on_failure() {
    let driver = MockDriver::new();
    let mut connection = connection(&driver);

    let statements = vec![query("UPDATE a SET x = 1 WHERE TRUE"), query("UPDATE b SET x = 2 WHERE TRUE")];
    connection
        .execute_many(&statements, StatementKind::Dml)
        .expect("batch should execute");
    assert_eq!(driver.requests().len(), 2);
    assert_eq!(driver.requests()[0].sql, "UPDATE a SET x = 1 WHERE TRUE");

    driver.fail_next_execute("deadline exceeded");
    let error = connection
        .execute_many(&statements, StatementKind::Dml)
        .expect_err("failure should halt the batch");
    assert!(
        error.to_string().contains("UPDATE a SET x = 1"),
        "the failing statement should be named: {error}"
    );
    assert_eq!(
        driver.requests().len(),
        3,
        "the statement after the failure is never submitted"
    );
}

#[test]
fn close_releases_the_driver() {
    let driver = MockDriver::new();
    let mut connection = connection(&driver);

    connection.close().expect("close should succeed");
    assert!(driver.is_closed());
}
