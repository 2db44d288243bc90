//! SELECT builder.

use std::fmt;
use std::marker::PhantomData;

use super::{Build, Querier, StatementKind, table_name};
use crate::compile::{CompiledStatement, Compiler};
use crate::decode::DecoderKind;
use crate::error::OrmResult;
use crate::expr::{Expr, Predicate, field};
use crate::model::{Model, TableDescriptor};

/// SELECT builder.
///
/// Without an explicit projection every declared column is selected in declaration order.
pub struct Select<M> {
    table: Option<String>,
    columns: Vec<Expr>,
    conditions: Vec<Predicate>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Select<M> {
    pub fn new() -> Self {
        Self {
            table: None,
            columns: Vec::new(),
            conditions: Vec::new(),
            _model: PhantomData,
        }
    }

    /// Override the table name.
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table = Some(name.into());
        self
    }

    /// Project the given fields (Rust identifiers).
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns
            .extend(names.into_iter().map(|n| Expr::Field(field(n))));
        self
    }

    /// Project columns or aggregates, e.g. `[avg("age").into(), column("id").into()]`.
    pub fn columns<I, X>(mut self, exprs: I) -> Self
    where
        I: IntoIterator<Item = X>,
        X: Into<Expr>,
    {
        self.columns.extend(exprs.into_iter().map(Into::into));
        self
    }

    /// Add WHERE conditions; all conditions are AND-ed.
    pub fn where_<I>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = Predicate>,
    {
        self.conditions.extend(conditions);
        self
    }
}

impl<M: Model> Default for Select<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for Select<M> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            columns: self.columns.clone(),
            conditions: self.conditions.clone(),
            _model: PhantomData,
        }
    }
}

impl<M> fmt::Debug for Select<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("table", &self.table)
            .field("columns", &self.columns)
            .field("conditions", &self.conditions)
            .finish()
    }
}

impl<M: Model> Build for Select<M> {
    type Model = M;

    const KIND: StatementKind = StatementKind::Select;

    fn build_with(
        &self,
        desc: &TableDescriptor<M>,
        _decoder: DecoderKind,
    ) -> OrmResult<CompiledStatement> {
        let mut c = Compiler::new(desc);
        c.push_sql("SELECT ");
        if self.columns.is_empty() {
            for (i, col) in desc.fields().iter().enumerate() {
                if i > 0 {
                    c.push_sql(", ");
                }
                c.push_ident(col.column());
            }
        } else {
            for (i, expr) in self.columns.iter().enumerate() {
                if i > 0 {
                    c.push_sql(", ");
                }
                c.compile_projection(expr)?;
            }
        }
        c.push_sql(" FROM ");
        c.push_ident(table_name(&self.table, desc));
        c.push_where(&self.conditions)?;
        Ok(c.finish_statement())
    }
}

impl<M: Model> Querier for Select<M> {}
