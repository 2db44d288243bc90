//! Caller-written SQL whose rows decode into a model.

use std::fmt;
use std::marker::PhantomData;

use super::{Build, Querier, StatementKind};
use crate::compile::CompiledStatement;
use crate::decode::DecoderKind;
use crate::error::{OrmError, OrmResult};
use crate::model::{Model, TableDescriptor};
use crate::value::Value;

/// Raw query.
///
/// The SQL text is passed through untouched; result columns are mapped onto `M` exactly as
/// for [`Select`](super::Select).
///
/// ```ignore
/// let users: Vec<User> = Raw::<User>::new("SELECT * FROM `user` WHERE `id` > ?;", vec![10.into()])
///     .fetch_all(&db)
///     .await?;
/// ```
pub struct Raw<M> {
    sql: String,
    args: Vec<Value>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Raw<M> {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
            _model: PhantomData,
        }
    }

    /// Append one argument.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }
}

impl<M> Clone for Raw<M> {
    fn clone(&self) -> Self {
        Self {
            sql: self.sql.clone(),
            args: self.args.clone(),
            _model: PhantomData,
        }
    }
}

impl<M> fmt::Debug for Raw<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raw")
            .field("sql", &self.sql)
            .field("args", &self.args)
            .finish()
    }
}

impl<M: Model> Build for Raw<M> {
    type Model = M;

    const KIND: StatementKind = StatementKind::Raw;

    fn build_with(
        &self,
        _desc: &TableDescriptor<M>,
        _decoder: DecoderKind,
    ) -> OrmResult<CompiledStatement> {
        if self.sql.is_empty() {
            return Err(OrmError::EmptySql);
        }
        Ok(CompiledStatement::new(self.sql.clone(), self.args.clone()))
    }
}

impl<M: Model> Querier for Raw<M> {}
