//! Expression tree for WHERE clauses and projections.
//!
//! Trees are built from [`field`] references, comparison methods and the `and`/`or`/[`not`]
//! combinators. Field names are the Rust field identifiers; they are resolved to column
//! names only when the tree is compiled against a table descriptor.
//!
//! ```ignore
//! use ormkit::expr::{field, not};
//!
//! // (`id` = ?) AND NOT (`first_name` = ?)
//! let p = field("id").eq(12).and(not(field("first_name").eq("Neo")));
//! ```

use crate::value::Value;

/// Expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to a model field.
    Field(FieldRef),
    /// A bound value, rendered as a placeholder.
    Literal(Value),
    /// Comparison or boolean combination.
    Predicate(Predicate),
    /// Column projection, optionally wrapped in an aggregate function.
    Aggregate(Aggregate),
}

/// Predicate operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    And,
    Or,
    Not,
}

impl Op {
    /// SQL text including the surrounding spaces.
    pub fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => " = ",
            Op::Gt => " > ",
            Op::Gte => " >= ",
            Op::Lt => " < ",
            Op::Lte => " <= ",
            Op::And => " AND ",
            Op::Or => " OR ",
            Op::Not => "NOT ",
        }
    }

    /// `=`, `>`, `>=`, `<`, `<=`.
    pub fn is_comparison(self) -> bool {
        matches!(self, Op::Eq | Op::Gt | Op::Gte | Op::Lt | Op::Lte)
    }
}

/// Aggregate functions for projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFn {
    Avg,
    Max,
    Min,
    Count,
    Sum,
}

impl AggregateFn {
    pub fn as_sql(self) -> &'static str {
        match self {
            AggregateFn::Avg => "AVG",
            AggregateFn::Max => "MAX",
            AggregateFn::Min => "MIN",
            AggregateFn::Count => "COUNT",
            AggregateFn::Sum => "SUM",
        }
    }
}

/// A field identifier, e.g. `field("first_name")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    name: String,
}

/// Create a field reference.
pub fn field(name: impl Into<String>) -> FieldRef {
    FieldRef { name: name.into() }
}

/// Create a literal expression.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

impl FieldRef {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn compare(self, op: Op, value: Value) -> Predicate {
        Predicate::binary(Expr::Field(self), op, Expr::Literal(value))
    }

    /// field = value
    pub fn eq(self, value: impl Into<Value>) -> Predicate {
        self.compare(Op::Eq, value.into())
    }

    /// field > value
    pub fn gt(self, value: impl Into<Value>) -> Predicate {
        self.compare(Op::Gt, value.into())
    }

    /// field >= value
    pub fn gte(self, value: impl Into<Value>) -> Predicate {
        self.compare(Op::Gte, value.into())
    }

    /// field < value
    pub fn lt(self, value: impl Into<Value>) -> Predicate {
        self.compare(Op::Lt, value.into())
    }

    /// field <= value
    pub fn lte(self, value: impl Into<Value>) -> Predicate {
        self.compare(Op::Lte, value.into())
    }
}

/// A predicate node.
///
/// Binary operators carry both operands; `NOT` carries only `right`. The fields are public
/// so trees can be assembled structurally; the compiler rejects shapes that do not fit
/// their operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub left: Option<Box<Expr>>,
    pub op: Op,
    pub right: Box<Expr>,
}

impl Predicate {
    /// `left op right`.
    pub fn binary(left: impl Into<Expr>, op: Op, right: impl Into<Expr>) -> Self {
        Self {
            left: Some(Box::new(left.into())),
            op,
            right: Box::new(right.into()),
        }
    }

    /// self AND other
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::binary(self, Op::And, other)
    }

    /// self OR other
    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::binary(self, Op::Or, other)
    }

    /// NOT self
    pub fn not(self) -> Predicate {
        not(self)
    }
}

/// NOT predicate
pub fn not(inner: Predicate) -> Predicate {
    Predicate {
        left: None,
        op: Op::Not,
        right: Box::new(Expr::Predicate(inner)),
    }
}

/// Fold conditions left to right into one conjunction.
///
/// `[a, b, c]` becomes `(a AND b) AND c`; an empty slice yields `None`.
pub fn conjunction(conditions: &[Predicate]) -> Option<Predicate> {
    conditions.iter().cloned().reduce(Predicate::and)
}

/// A projected column, `FUNC(column)` or the bare column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Aggregate {
    pub field: String,
    pub func: Option<AggregateFn>,
}

impl Aggregate {
    pub fn new(field: impl Into<String>, func: Option<AggregateFn>) -> Self {
        Self {
            field: field.into(),
            func,
        }
    }
}

/// AVG(field)
pub fn avg(field: impl Into<String>) -> Aggregate {
    Aggregate::new(field, Some(AggregateFn::Avg))
}

/// MAX(field)
pub fn max(field: impl Into<String>) -> Aggregate {
    Aggregate::new(field, Some(AggregateFn::Max))
}

/// MIN(field)
pub fn min(field: impl Into<String>) -> Aggregate {
    Aggregate::new(field, Some(AggregateFn::Min))
}

/// COUNT(field)
pub fn count(field: impl Into<String>) -> Aggregate {
    Aggregate::new(field, Some(AggregateFn::Count))
}

/// SUM(field)
pub fn sum(field: impl Into<String>) -> Aggregate {
    Aggregate::new(field, Some(AggregateFn::Sum))
}

/// Plain column projection.
pub fn column(field: impl Into<String>) -> Aggregate {
    Aggregate::new(field, None)
}

impl From<FieldRef> for Expr {
    fn from(f: FieldRef) -> Self {
        Expr::Field(f)
    }
}

impl From<Predicate> for Expr {
    fn from(p: Predicate) -> Self {
        Expr::Predicate(p)
    }
}

impl From<Aggregate> for Expr {
    fn from(a: Aggregate) -> Self {
        Expr::Aggregate(a)
    }
}

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Literal(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_builds_field_literal_predicate() {
        let p = field("id").gte(3);
        assert_eq!(p.op, Op::Gte);
        assert_eq!(p.left.as_deref(), Some(&Expr::Field(field("id"))));
        assert_eq!(*p.right, Expr::Literal(Value::Int(3)));
    }

    #[test]
    fn not_has_no_left_operand() {
        let p = not(field("id").eq(1));
        assert_eq!(p.op, Op::Not);
        assert!(p.left.is_none());
        assert!(matches!(*p.right, Expr::Predicate(_)));
    }

    #[test]
    fn combinators_leave_operands_reusable() {
        let base = field("age").gt(18);
        let a = base.clone().and(field("id").eq(1));
        let b = base.clone().or(field("id").eq(2));
        assert_eq!(a.left.as_deref(), Some(&Expr::Predicate(base.clone())));
        assert_eq!(b.left.as_deref(), Some(&Expr::Predicate(base)));
    }

    #[test]
    fn conjunction_includes_every_condition() {
        assert!(conjunction(&[]).is_none());

        let single = field("id").eq(1);
        assert_eq!(conjunction(std::slice::from_ref(&single)), Some(single.clone()));

        let all = conjunction(&[single.clone(), field("age").gt(2), field("id").lt(9)]).unwrap();
        assert_eq!(all.op, Op::And);
        assert_eq!(*all.right, Expr::Predicate(field("id").lt(9)));
        let Some(inner) = all.left.as_deref() else {
            panic!("missing left operand");
        };
        assert_eq!(
            inner,
            &Expr::Predicate(single.and(field("age").gt(2)))
        );
    }

    #[test]
    fn aggregate_constructors() {
        assert_eq!(avg("age").func, Some(AggregateFn::Avg));
        assert_eq!(count("id").func.map(AggregateFn::as_sql), Some("COUNT"));
        assert_eq!(column("id").func, None);
    }
}
