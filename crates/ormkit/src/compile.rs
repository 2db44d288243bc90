//! Predicate compiler.
//!
//! Walks an [`Expr`] tree against a [`TableDescriptor`], writing back-tick quoted column names
//! and `?` placeholders into one SQL buffer while collecting the bound arguments in the order
//! their placeholders appear.
//!
//! Rendering:
//!
//! - comparisons are always parenthesized: ``(`id` = ?)``
//! - `AND`/`OR` chains are flat at the top level and under the same operator, and are
//!   parenthesized under `NOT` or under the other logical operator
//! - `NOT` is rendered as `NOT ` followed by its operand

use serde::Serialize;

use crate::error::{OrmError, OrmResult};
use crate::expr::{Aggregate, Expr, Op, Predicate, conjunction};
use crate::model::TableDescriptor;
use crate::value::Value;

/// SQL text plus its positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledStatement {
    pub sql: String,
    pub args: Vec<Value>,
}

impl CompiledStatement {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

/// Compile a single expression against `desc`.
pub fn compile<M>(expr: &Expr, desc: &TableDescriptor<M>) -> OrmResult<CompiledStatement> {
    let mut compiler = Compiler::new(desc);
    compiler.compile(expr)?;
    Ok(compiler.finish())
}

/// Accumulates SQL text and arguments for one statement.
pub struct Compiler<'d, M> {
    desc: &'d TableDescriptor<M>,
    sql: String,
    args: Vec<Value>,
}

impl<'d, M> Compiler<'d, M> {
    pub fn new(desc: &'d TableDescriptor<M>) -> Self {
        Self {
            desc,
            sql: String::with_capacity(64),
            args: Vec::new(),
        }
    }

    /// Append raw SQL text.
    pub fn push_sql(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append a back-tick quoted identifier.
    pub fn push_ident(&mut self, ident: &str) -> &mut Self {
        self.sql.push('`');
        self.sql.push_str(ident);
        self.sql.push('`');
        self
    }

    /// Append a `?` placeholder and bind `value` to it.
    pub fn push_bind(&mut self, value: Value) -> &mut Self {
        self.sql.push('?');
        self.args.push(value);
        self
    }

    /// Append the quoted column of a Rust field identifier.
    pub fn push_field(&mut self, name: &str) -> OrmResult<&mut Self> {
        let desc = self.desc;
        let column = desc.require_field(name)?.column();
        Ok(self.push_ident(column))
    }

    /// Append an expression.
    pub fn compile(&mut self, expr: &Expr) -> OrmResult<()> {
        match expr {
            Expr::Field(f) => {
                self.push_field(f.name())?;
            }
            Expr::Literal(v) => {
                self.push_bind(v.clone());
            }
            Expr::Predicate(p) => self.predicate(p, None)?,
            Expr::Aggregate(a) => self.aggregate(a)?,
        }
        Ok(())
    }

    /// Append a projection; only field and aggregate nodes are columns.
    pub fn compile_projection(&mut self, expr: &Expr) -> OrmResult<()> {
        match expr {
            Expr::Field(_) | Expr::Aggregate(_) => self.compile(expr),
            Expr::Literal(_) => Err(OrmError::UnsupportedExpressionKind(
                "literal in a projection list".to_string(),
            )),
            Expr::Predicate(_) => Err(OrmError::UnsupportedExpressionKind(
                "predicate in a projection list".to_string(),
            )),
        }
    }

    /// Append ` WHERE ` and the conjunction of `conditions`; nothing when empty.
    pub fn push_where(&mut self, conditions: &[Predicate]) -> OrmResult<()> {
        if let Some(all) = conjunction(conditions) {
            self.sql.push_str(" WHERE ");
            self.predicate(&all, None)?;
        }
        Ok(())
    }

    /// Terminate the statement with `;`.
    pub fn finish_statement(mut self) -> CompiledStatement {
        self.sql.push(';');
        self.finish()
    }

    /// Take the accumulated fragment as is.
    pub fn finish(self) -> CompiledStatement {
        CompiledStatement {
            sql: self.sql,
            args: self.args,
        }
    }

    fn aggregate(&mut self, agg: &Aggregate) -> OrmResult<()> {
        let desc = self.desc;
        let column = desc.require_field(&agg.field)?.column();
        match agg.func {
            Some(func) => {
                self.sql.push_str(func.as_sql());
                self.sql.push('(');
                self.push_ident(column);
                self.sql.push(')');
            }
            None => {
                self.push_ident(column);
            }
        }
        Ok(())
    }

    fn predicate(&mut self, p: &Predicate, parent: Option<Op>) -> OrmResult<()> {
        match p.op {
            op if op.is_comparison() => {
                let left = p.left.as_deref().ok_or_else(|| missing_left(op))?;
                self.sql.push('(');
                self.operand(left, op)?;
                self.sql.push_str(op.as_sql());
                self.operand(&p.right, op)?;
                self.sql.push(')');
            }
            Op::Not => {
                if p.left.is_some() {
                    return Err(OrmError::UnsupportedExpressionKind(
                        "NOT takes a single operand".to_string(),
                    ));
                }
                let grouped = parent.is_some_and(Op::is_comparison);
                if grouped {
                    self.sql.push('(');
                }
                self.sql.push_str(Op::Not.as_sql());
                self.operand(&p.right, Op::Not)?;
                if grouped {
                    self.sql.push(')');
                }
            }
            op => {
                let left = p.left.as_deref().ok_or_else(|| missing_left(op))?;
                let grouped = matches!(parent, Some(outer) if outer != op);
                if grouped {
                    self.sql.push('(');
                }
                self.operand(left, op)?;
                self.sql.push_str(op.as_sql());
                self.operand(&p.right, op)?;
                if grouped {
                    self.sql.push(')');
                }
            }
        }
        Ok(())
    }

    fn operand(&mut self, expr: &Expr, parent: Op) -> OrmResult<()> {
        match expr {
            Expr::Predicate(p) => self.predicate(p, Some(parent)),
            other => self.compile(other),
        }
    }
}

fn missing_left(op: Op) -> OrmError {
    OrmError::UnsupportedExpressionKind(format!("{} without a left operand", op.as_sql().trim()))
}
