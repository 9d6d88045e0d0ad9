mod expr;
mod ident;
mod schema;
mod types;

pub use expr::{
    BinaryOperator, ComparisonOp, Expr, IsTest, Literal, OrderByItem, SortOrder, UnaryOperator,
};
pub use ident::{Ident, QualifiedName};
pub use schema::{
    CheckConstraint, Column, DialectOptions, ForeignKey, GeneratedColumn, IndexColumn, IndexDef,
    PrimaryKey, Sequence, SequenceKind, Table, UniqueConstraint,
};
pub use types::{DataType, Value};
