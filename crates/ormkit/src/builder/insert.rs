//! INSERT builder.

use super::{Build, Executer, StatementKind, table_name};
use crate::compile::{CompiledStatement, Compiler};
use crate::decode::{Decoder, DecoderKind};
use crate::error::{OrmError, OrmResult};
use crate::model::{Model, TableDescriptor};

/// INSERT builder for one or more records.
///
/// Column order follows the explicit field list, or declaration order when none is given.
/// Naming a field twice fails with `DuplicateColumn`.
#[derive(Debug, Clone)]
pub struct Insert<M> {
    table: Option<String>,
    fields: Vec<String>,
    records: Vec<M>,
}

impl<M: Model> Insert<M> {
    pub fn new() -> Self {
        Self {
            table: None,
            fields: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Override the table name.
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table = Some(name.into());
        self
    }

    /// Insert only the given fields (Rust identifiers).
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add records.
    pub fn values<I>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = M>,
    {
        self.records.extend(records);
        self
    }

    /// Add a single record.
    pub fn value(mut self, record: M) -> Self {
        self.records.push(record);
        self
    }
}

impl<M: Model> Default for Insert<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Build for Insert<M> {
    type Model = M;

    const KIND: StatementKind = StatementKind::Insert;

    fn build_with(
        &self,
        desc: &TableDescriptor<M>,
        decoder: DecoderKind,
    ) -> OrmResult<CompiledStatement> {
        if self.records.is_empty() {
            return Err(OrmError::EmptyValuesClause);
        }

        let columns = if self.fields.is_empty() {
            desc.fields().iter().collect::<Vec<_>>()
        } else {
            self.fields
                .iter()
                .map(|name| desc.require_field(name))
                .collect::<OrmResult<Vec<_>>>()?
        };
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|prev| prev.column() == col.column()) {
                return Err(OrmError::DuplicateColumn(col.column().to_string()));
            }
        }

        let mut c = Compiler::new(desc);
        c.push_sql("INSERT INTO ");
        c.push_ident(table_name(&self.table, desc));
        c.push_sql(" (");
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                c.push_sql(", ");
            }
            c.push_ident(col.column());
        }
        c.push_sql(") VALUES ");

        for (row, record) in self.records.iter().enumerate() {
            if row > 0 {
                c.push_sql(", ");
            }
            c.push_sql("(");
            for (i, col) in columns.iter().enumerate() {
                if i > 0 {
                    c.push_sql(", ");
                }
                c.push_bind(decoder.read_field(desc, record, col.field())?);
            }
            c.push_sql(")");
        }
        Ok(c.finish_statement())
    }
}

impl<M: Model> Executer for Insert<M> {}
