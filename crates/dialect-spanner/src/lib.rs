//! Google Cloud Spanner dialect for bridgeql: GoogleSQL generation, DDL
//! compilation, `information_schema` reflection, and Spanner's transaction
//! semantics (inline begin, single-use snapshots, autocommit DML).
//!
//! The RPC client stays behind the [`bridgeql_core::DriverConnection`]
//! seam; this crate decides *what* to send, not how it travels.

mod connection;
mod ddl;
mod dialect;
mod execution;
mod introspect;
mod introspect_queries;
mod migrate;
pub mod option_keys;
mod preparer;
mod reserved_words;
mod sql;
mod trace;
mod type_compiler;
mod url;

pub use connection::SpannerConnection;
pub use ddl::{
    create_index, create_sequence, create_table, drop_index, drop_sequence, drop_table,
    next_sequence_value, table_precondition,
};
pub use dialect::{Capabilities, SpannerDialect, DIALECT_NAME, DRIVER_NAME, MAX_IDENTIFIER_LENGTH};
pub use execution::StatementKind;
pub use introspect::{
    generated_column_from, get_columns, get_foreign_keys, get_indexes, get_pk_constraint,
    get_schema_names, get_sequence_names, get_table_names, get_unique_constraints,
    get_view_definition, get_view_names, has_sequence, has_table, DEFAULT_SCHEMA,
};
pub use migrate::{change_type, drop_default, drop_not_null, set_default, set_not_null};
pub use preparer::{quote, requires_quoting, unquote};
pub use reserved_words::is_reserved;
pub use sql::{
    compile_delete, compile_insert, compile_insert_many, compile_select, compile_update,
    empty_set_expr,
};
pub use trace::TraceShim;
pub use type_compiler::{compile_type, parse_type};
pub use url::parse_connection_url;
