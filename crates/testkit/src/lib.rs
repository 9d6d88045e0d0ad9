//! Test support for bridgeql dialects: a scripted in-memory driver that
//! records every request crossing the driver seam, and schema fixtures
//! shared across dialect test suites.

mod fixtures;
mod mock_driver;

pub use fixtures::{albums_table, dml_result, result_set, row, singers_table};
pub use mock_driver::{MockDriver, MockFactory};
