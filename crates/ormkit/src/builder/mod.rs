//! Statement builders.
//!
//! Every builder is a plain value parameterized by its [`Model`]: configure it by chaining
//! methods that consume and return it, then [`build`](Build::build) it against a
//! [`Registry`] or run it through a [`Db`].
//!
//! ```ignore
//! use ormkit::expr::field;
//! use ormkit::{Build, Delete, Registry};
//!
//! let stmt = Delete::<User>::new()
//!     .where_([field("id").eq(12), field("name").eq("Neo")])
//!     .build(&Registry::new())?;
//! assert_eq!(stmt.sql, "DELETE FROM `user` WHERE (`id` = ?) AND (`name` = ?);");
//! ```
//!
//! Building is pure: it never mutates the builder or the descriptor, so the same builder
//! can be built and executed any number of times.

mod delete;
mod insert;
mod raw;
mod select;
mod update;

pub use delete::Delete;
pub use insert::Insert;
pub use raw::Raw;
pub use select::Select;
pub use update::Update;

use std::future::Future;

use crate::compile::CompiledStatement;
use crate::db::Db;
use crate::decode::{DecoderKind, decode_all};
use crate::error::{OrmError, OrmResult};
use crate::executor::{ExecResult, Executor, Rows};
use crate::model::{Model, Registry, TableDescriptor};

/// Statement kind, recorded in log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Raw,
}

/// Produces a [`CompiledStatement`] for a model.
pub trait Build {
    type Model: Model;

    /// Statement kind.
    const KIND: StatementKind;

    /// Build against an already resolved descriptor.
    ///
    /// `decoder` reads field values out of records for statements that carry them.
    fn build_with(
        &self,
        desc: &TableDescriptor<Self::Model>,
        decoder: DecoderKind,
    ) -> OrmResult<CompiledStatement>;

    /// Build, resolving the descriptor through `registry`.
    fn build(&self, registry: &Registry) -> OrmResult<CompiledStatement> {
        let desc = registry.get::<Self::Model>()?;
        self.build_with(&desc, DecoderKind::default())
    }
}

/// Statements that return rows.
pub trait Querier: Build + Sync {
    /// Execute and decode every row.
    fn fetch_all<E: Executor>(
        &self,
        db: &Db<E>,
    ) -> impl Future<Output = OrmResult<Vec<Self::Model>>> + Send {
        async move {
            let desc = db.registry().get::<Self::Model>()?;
            let decoder = db.config().decoder;
            let stmt = self.build_with(&desc, decoder)?;
            let mut rows = db.query_statement(Self::KIND, &stmt).await?;
            decode_all(&decoder, &desc, &mut rows)
        }
    }

    /// Execute and decode the first row; `NoRows` when there is none.
    fn fetch_one<E: Executor>(
        &self,
        db: &Db<E>,
    ) -> impl Future<Output = OrmResult<Self::Model>> + Send {
        async move {
            self.fetch_optional(db).await?.ok_or(OrmError::NoRows)
        }
    }

    /// Execute and decode the first row, if any.
    fn fetch_optional<E: Executor>(
        &self,
        db: &Db<E>,
    ) -> impl Future<Output = OrmResult<Option<Self::Model>>> + Send {
        async move {
            use crate::decode::Decoder;

            let desc = db.registry().get::<Self::Model>()?;
            let decoder = db.config().decoder;
            let stmt = self.build_with(&desc, decoder)?;
            let mut rows = db.query_statement(Self::KIND, &stmt).await?;
            if !rows.next()? {
                return Ok(None);
            }
            decoder.decode_row(&desc, &mut rows).map(Some)
        }
    }
}

/// Statements that change rows.
pub trait Executer: Build + Sync {
    /// Execute the statement.
    ///
    /// Construction errors are returned as `Err` before anything reaches the executor.
    /// Execution errors are captured in the returned [`ExecResult`].
    fn execute<E: Executor>(
        &self,
        db: &Db<E>,
    ) -> impl Future<Output = OrmResult<ExecResult>> + Send {
        async move {
            let desc = db.registry().get::<Self::Model>()?;
            let stmt = self.build_with(&desc, db.config().decoder)?;
            Ok(ExecResult::new(db.exec_statement(Self::KIND, &stmt).await))
        }
    }
}

/// Table name of a statement: the override when set, else the descriptor's.
fn table_name<'a, M>(table: &'a Option<String>, desc: &'a TableDescriptor<M>) -> &'a str {
    table.as_deref().unwrap_or(desc.table_name())
}

#[cfg(test)]
mod tests;
