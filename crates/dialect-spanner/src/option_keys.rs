//! Dialect option keys recognized on tables, columns, foreign keys, and
//! indexes. All keys are optional.

/// Table scope: names the parent table; emits `INTERLEAVE IN PARENT`.
/// Index scope: appends `, INTERLEAVE IN parent`.
pub const INTERLEAVE_IN: &str = "spanner.interleave_in";
/// Table scope: appends ` ON DELETE CASCADE` to the interleave clause.
pub const INTERLEAVE_ON_DELETE_CASCADE: &str = "spanner.interleave_on_delete_cascade";
/// Column scope: appends ` OPTIONS (allow_commit_timestamp=true)`.
pub const ALLOW_COMMIT_TIMESTAMP: &str = "spanner.allow_commit_timestamp";
/// Column scope: suppresses the column from any THEN RETURN list.
pub const EXCLUDE_FROM_RETURNING: &str = "spanner.exclude_from_returning";
/// Column scope: marks a client-supplied unique value that lets multi-row
/// inserts pair returned rows back to their sources.
pub const INSERT_SENTINEL: &str = "spanner.insert_sentinel";
/// Foreign-key scope: appends ` NOT ENFORCED`.
pub const NOT_ENFORCED: &str = "spanner.not_enforced";
/// Index scope: inserts `NULL_FILTERED` into CREATE INDEX.
pub const NULL_FILTERED: &str = "spanner.null_filtered";
/// Index scope: appends a ` STORING (col, ...)` clause. The value is a
/// comma-separated column list.
pub const STORING: &str = "spanner.storing";
