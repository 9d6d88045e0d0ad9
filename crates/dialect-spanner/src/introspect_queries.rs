//! Fixed-shape reflection queries against `information_schema`. Parameters
//! follow the dialect's `@a<N>` convention: `@a0` is the schema, `@a1` the
//! object name where present.

pub(crate) const COLUMNS_QUERY: &str = r"
SELECT
  column_name,
  spanner_type,
  is_nullable,
  generation_expression,
  column_default
FROM information_schema.columns
WHERE table_schema = @a0
  AND table_name = @a1
ORDER BY ordinal_position
";

pub(crate) const INDEXES_QUERY: &str = r"
SELECT
  i.index_name,
  i.is_unique,
  i.is_null_filtered,
  i.parent_table_name,
  ic.column_name,
  ic.column_ordering,
  ic.ordinal_position
FROM information_schema.indexes AS i
JOIN information_schema.index_columns AS ic
  ON i.table_schema = ic.table_schema
  AND i.table_name = ic.table_name
  AND i.index_name = ic.index_name
WHERE i.table_schema = @a0
  AND i.table_name = @a1
  AND i.index_type != 'PRIMARY_KEY'
ORDER BY i.index_name, ic.ordinal_position
";

pub(crate) const PRIMARY_KEY_QUERY: &str = r"
SELECT ccu.column_name
FROM information_schema.table_constraints AS tc
JOIN information_schema.constraint_column_usage AS ccu
  ON tc.constraint_name = ccu.constraint_name
  AND tc.constraint_schema = ccu.constraint_schema
WHERE tc.table_schema = @a0
  AND tc.table_name = @a1
  AND tc.constraint_type = 'PRIMARY KEY'
";

pub(crate) const FOREIGN_KEYS_QUERY: &str = r"
SELECT
  tc.constraint_name,
  ctu.table_schema AS referred_schema,
  ctu.table_name AS referred_table,
  ccu.column_name AS referred_column,
  kcu.column_name AS constrained_column
FROM information_schema.table_constraints AS tc
JOIN information_schema.constraint_table_usage AS ctu
  ON tc.constraint_name = ctu.constraint_name
  AND tc.constraint_schema = ctu.constraint_schema
JOIN information_schema.constraint_column_usage AS ccu
  ON tc.constraint_name = ccu.constraint_name
  AND tc.constraint_schema = ccu.constraint_schema
JOIN information_schema.key_column_usage AS kcu
  ON tc.constraint_name = kcu.constraint_name
  AND tc.constraint_schema = kcu.constraint_schema
WHERE tc.table_schema = @a0
  AND tc.table_name = @a1
  AND tc.constraint_type = 'FOREIGN KEY'
";

pub(crate) const SCHEMA_NAMES_QUERY: &str = r"
SELECT schema_name
FROM information_schema.schemata
";

pub(crate) const TABLE_NAMES_QUERY: &str = r"
SELECT table_name
FROM information_schema.tables
WHERE table_schema = @a0
  AND table_type = 'BASE TABLE'
";

pub(crate) const VIEW_NAMES_QUERY: &str = r"
SELECT table_name
FROM information_schema.views
WHERE table_schema = @a0
";

pub(crate) const VIEW_DEFINITION_QUERY: &str = r"
SELECT view_definition
FROM information_schema.views
WHERE table_schema = @a0
  AND table_name = @a1
";

pub(crate) const HAS_TABLE_QUERY: &str = r"
SELECT true
FROM information_schema.tables
WHERE table_schema = @a0
  AND table_name = @a1
LIMIT 1
";

pub(crate) const HAS_SEQUENCE_QUERY: &str = r"
SELECT true
FROM information_schema.sequences
WHERE schema = @a0
  AND name = @a1
LIMIT 1
";

pub(crate) const SEQUENCE_NAMES_QUERY: &str = r"
SELECT name
FROM information_schema.sequences
WHERE schema = @a0
";
