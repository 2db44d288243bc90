//! DELETE builder.

use std::fmt;
use std::marker::PhantomData;

use super::{Build, Executer, StatementKind, table_name};
use crate::compile::{CompiledStatement, Compiler};
use crate::decode::DecoderKind;
use crate::error::OrmResult;
use crate::expr::Predicate;
use crate::model::{Model, TableDescriptor};

/// DELETE builder.
///
/// A DELETE without conditions removes every row of the table; it is built as given.
pub struct Delete<M> {
    table: Option<String>,
    conditions: Vec<Predicate>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Delete<M> {
    pub fn new() -> Self {
        Self {
            table: None,
            conditions: Vec::new(),
            _model: PhantomData,
        }
    }

    /// Override the table name.
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table = Some(name.into());
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

impl<M: Model> Default for Delete<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for Delete<M> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            conditions: self.conditions.clone(),
            _model: PhantomData,
        }
    }
}

impl<M> fmt::Debug for Delete<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delete")
            .field("table", &self.table)
            .field("conditions", &self.conditions)
            .finish()
    }
}

impl<M: Model> Build for Delete<M> {
    type Model = M;

    const KIND: StatementKind = StatementKind::Delete;

    fn build_with(
        &self,
        desc: &TableDescriptor<M>,
        _decoder: DecoderKind,
    ) -> OrmResult<CompiledStatement> {
        let mut c = Compiler::new(desc);
        c.push_sql("DELETE FROM ");
        c.push_ident(table_name(&self.table, desc));
        c.push_where(&self.conditions)?;
        Ok(c.finish_statement())
    }
}

impl<M: Model> Executer for Delete<M> {}
