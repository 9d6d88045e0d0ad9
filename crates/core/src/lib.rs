//! Core contracts shared between the host toolkit and its dialects: the
//! schema IR, the DML statement tree, reflection descriptors, execution
//! options, and the driver-connection seam behind which all network I/O
//! lives.

mod config;
mod descriptor;
mod driver;
mod error;
pub mod ir;
mod options;
mod statement;

pub use config::ConnectionConfig;
pub use descriptor::{
    ColumnDescriptor, ForeignKeyDescriptor, IndexDescriptor, PrimaryKeyDescriptor,
    SequenceDescriptor,
};
pub use driver::{
    DriverConnection, DriverFactory, ExecuteRequest, ReadOnlySnapshot, ResultSet, Row,
    TransactionOptions, TransactionSelector,
};
pub use error::{Error, ExecutionError, GenerateError, Result};
pub use ir::{
    BinaryOperator, CheckConstraint, Column, ComparisonOp, DataType, DialectOptions, Expr,
    ForeignKey, GeneratedColumn, Ident, IndexColumn, IndexDef, IsTest, Literal, OrderByItem,
    PrimaryKey, QualifiedName, Sequence, SequenceKind, SortOrder, Table, UnaryOperator,
    UniqueConstraint, Value,
};
pub use options::{
    AutocommitDmlMode, ExecutionOptions, IsolationLevel, RequestPriority, Staleness,
};
pub use statement::{
    CompiledSql, CompoundOp, Delete, Insert, Select, SelectItem, Statement, Update,
};
