//! UPDATE builder.

use std::fmt;
use std::marker::PhantomData;

use super::{Build, Executer, StatementKind, table_name};
use crate::compile::{CompiledStatement, Compiler};
use crate::decode::DecoderKind;
use crate::error::{OrmError, OrmResult};
use crate::expr::Predicate;
use crate::model::{Model, TableDescriptor};
use crate::value::Value;

/// UPDATE builder.
///
/// Assignments keep the order of their first `set`; setting a field again replaces its value.
pub struct Update<M> {
    table: Option<String>,
    assignments: Vec<(String, Value)>,
    conditions: Vec<Predicate>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Update<M> {
    pub fn new() -> Self {
        Self {
            table: None,
            assignments: Vec::new(),
            conditions: Vec::new(),
            _model: PhantomData,
        }
    }

    /// Override the table name.
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table = Some(name.into());
        self
    }

    /// SET field = value
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.assignments.iter_mut().find(|(f, _)| *f == field) {
            Some((_, existing)) => *existing = value,
            None => self.assignments.push((field, value)),
        }
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

impl<M: Model> Default for Update<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for Update<M> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            assignments: self.assignments.clone(),
            conditions: self.conditions.clone(),
            _model: PhantomData,
        }
    }
}

impl<M> fmt::Debug for Update<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Update")
            .field("table", &self.table)
            .field("assignments", &self.assignments)
            .field("conditions", &self.conditions)
            .finish()
    }
}

impl<M: Model> Build for Update<M> {
    type Model = M;

    const KIND: StatementKind = StatementKind::Update;

    fn build_with(
        &self,
        desc: &TableDescriptor<M>,
        _decoder: DecoderKind,
    ) -> OrmResult<CompiledStatement> {
        if self.assignments.is_empty() {
            return Err(OrmError::EmptySetClause);
        }

        let mut c = Compiler::new(desc);
        c.push_sql("UPDATE ");
        c.push_ident(table_name(&self.table, desc));
        c.push_sql(" SET ");
        for (i, (field, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                c.push_sql(", ");
            }
            c.push_field(field)?;
            c.push_sql(" = ");
            c.push_bind(value.clone());
        }
        c.push_where(&self.conditions)?;
        Ok(c.finish_statement())
    }
}

impl<M: Model> Executer for Update<M> {}
