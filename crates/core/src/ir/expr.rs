use super::{DataType, Ident, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Leaf and fallback expressions
    Literal(Literal),
    Column(Ident),
    QualifiedColumn {
        qualifier: Ident,
        name: Ident,
    },
    /// A bound parameter carrying its value; compilation assigns the marker.
    Parameter(Value),
    Null,
    Raw(String),

    // Operators and logical combinators
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOperator,
        expr: Box<Expr>,
    },
    Comparison {
        left: Box<Expr>,
        op: ComparisonOp,
        right: Box<Expr>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Is {
        expr: Box<Expr>,
        test: IsTest,
    },
    /// `IS [NOT] DISTINCT FROM`. Present in the tree so dialects without the
    /// construct can reject it explicitly.
    IsDistinctFrom {
        left: Box<Expr>,
        right: Box<Expr>,
        negated: bool,
    },
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
        negated: bool,
    },

    // Range and grouping
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },
    In {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
        /// Element type hint used when the list is empty and the dialect
        /// substitutes a typed empty-set probe.
        element_type: Option<DataType>,
    },
    Paren(Box<Expr>),
    Tuple(Vec<Expr>),

    // Function and type operations
    Function {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
        /// Ordering applied inside an aggregate, e.g. ARRAY_AGG(x ORDER BY y).
        order_by: Vec<OrderByItem>,
    },
    Cast {
        expr: Box<Expr>,
        data_type: DataType,
    },

    // Compound expressions
    Case {
        operand: Option<Box<Expr>>,
        when_clauses: Vec<(Expr, Expr)>,
        else_clause: Option<Box<Expr>>,
    },
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(Ident::unquoted(name))
    }

    pub fn param(value: Value) -> Self {
        Expr::Parameter(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(value.into()))
    }

    pub fn integer(value: i64) -> Self {
        Expr::Literal(Literal::Integer(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    StringConcat,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IsTest {
    Null,
    NotNull,
    True,
    NotTrue,
    False,
    NotFalse,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub expr: Expr,
    pub order: Option<SortOrder>,
}

impl OrderByItem {
    pub fn ascending(expr: Expr) -> Self {
        Self {
            expr,
            order: Some(SortOrder::Asc),
        }
    }

    pub fn plain(expr: Expr) -> Self {
        Self { expr, order: None }
    }
}
