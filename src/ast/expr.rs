use serde::{Deserialize, Serialize};

/// Logical connectives (`and` / `or`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    /// The SQL keyword for this connective.
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

/// Comparison operators (`==`, `!=`, `>`, `<`, `>=`, `<=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl ComparisonOp {
    /// The SQL symbol for this operator. KQL `==` becomes SQL `=`;
    /// everything else passes through unchanged.
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Gte => ">=",
            ComparisonOp::Lte => "<=",
        }
    }
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithmeticOp {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
    /// Modulo (%)
    Rem,
}

impl std::fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArithmeticOp::Add => write!(f, "+"),
            ArithmeticOp::Sub => write!(f, "-"),
            ArithmeticOp::Mul => write!(f, "*"),
            ArithmeticOp::Div => write!(f, "/"),
            ArithmeticOp::Rem => write!(f, "%"),
        }
    }
}

/// String predicates between a column and a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringOp {
    Contains,
    StartsWith,
    EndsWith,
    Matches,
    Has,
}

/// Conditional expression flavor: `iff(cond, a, b)` or
/// `case(c1, v1, c2, v2, ..., default)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionalFn {
    Iff,
    Case,
}

/// A column or table name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A general expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Logical conjunction/disjunction (left op right)
    Binary {
        op: LogicalOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Comparison (left op right)
    Comparison {
        op: ComparisonOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Arithmetic (left op right)
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// String predicate (column contains/startswith/... literal)
    String {
        op: StringOp,
        left: Identifier,
        right: String,
    },
    /// Membership test: `col in (lit, lit, ...)`
    In {
        left: Identifier,
        values: Vec<Literal>,
    },
    /// Range test: `col between (lo .. hi)`
    Between {
        left: Identifier,
        min: Box<Expression>,
        max: Box<Expression>,
    },
    /// `( expression )`
    Parenthesized(Box<Expression>),
    /// `iff(...)` / `case(...)` with positionally collected arguments
    Conditional {
        function: ConditionalFn,
        arguments: Vec<Expression>,
    },
    /// `expr :: type` or `to type(expr)`, normalized
    TypeCast {
        expression: Box<Expression>,
        target_type: String,
    },
    /// Function call; arguments may include `Expression::NamedArgument`
    FunctionCall {
        name: Identifier,
        arguments: Vec<Expression>,
    },
    /// `name = value` inside an argument list
    NamedArgument {
        name: Identifier,
        value: Box<Expression>,
    },
    /// Bare column/table reference
    Identifier(Identifier),
    /// `table.column`
    QualifiedIdentifier {
        table: Identifier,
        column: Identifier,
    },
    /// Literal value
    Literal(Literal),
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    /// `dynamic(...)` payload, kept as opaque text
    Dynamic(String),
    /// `datetime(...)` payload, kept as opaque text
    Datetime(String),
    /// Timespan such as `1d`, `2h`, `30m`, `45s`, kept as written
    Timespan(String),
}

/// One entry of a project/extend/distinct/search column list: either a bare
/// column or a `name = expression` assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnExpression {
    Column(Identifier),
    Assignment {
        name: Identifier,
        value: Expression,
    },
}
