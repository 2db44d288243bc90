//! # ormkit
//!
//! A typed predicate compiler and struct-to-table mapper for MySQL-style SQL.
//!
//! ## Features
//!
//! - **Typed expressions**: WHERE clauses are trees of field references, comparisons and
//!   `AND`/`OR`/`NOT`, compiled to back-tick quoted SQL with `?` placeholders
//! - **Cached metadata**: each model is introspected once per [`Registry`] and shared
//! - **Two decoders**: a safe slot-and-setter decoder, and an opt-in decoder that writes
//!   at recorded field offsets
//! - **Bring your own driver**: statements run through the [`Executor`] trait
//!
//! ## Example
//!
//! ```ignore
//! use ormkit::expr::field;
//! use ormkit::{Db, Executer, Model, Querier};
//!
//! #[derive(Debug, Default, Clone, Model)]
//! struct TestModel {
//!     id: i64,
//!     first_name: String,
//!     age: Option<i8>,
//! }
//!
//! let db = Db::new(driver);
//!
//! // SELECT `id`, `first_name`, `age` FROM `test_model` WHERE (`id` >= ?) AND (`first_name` = ?);
//! let rows: Vec<TestModel> = db
//!     .select::<TestModel>()
//!     .where_([field("id").gte(12), field("first_name").eq("Neo")])
//!     .fetch_all(&db)
//!     .await?;
//!
//! // UPDATE `test_model` SET `age` = ? WHERE (`id` = ?);
//! let res = db
//!     .update::<TestModel>()
//!     .set("age", 19)
//!     .where_([field("id").eq(12)])
//!     .execute(&db)
//!     .await?;
//! println!("updated {:?} rows", res.rows_affected());
//! ```

pub mod builder;
pub mod compile;
pub mod config;
pub mod db;
pub mod decode;
pub mod error;
pub mod executor;
pub mod expr;
pub mod model;
pub mod value;

#[cfg(test)]
mod testing;

pub use builder::{Build, Delete, Executer, Insert, Querier, Raw, Select, StatementKind, Update};
pub use compile::{CompiledStatement, Compiler, compile};
pub use config::DbConfig;
pub use db::Db;
pub use decode::{Decoder, DecoderKind, OffsetDecoder, SafeDecoder};
pub use error::{OrmError, OrmResult};
pub use executor::{ExecOutcome, ExecResult, Executor, ResultSet, Rows, ScanTarget};
pub use expr::{Expr, FieldRef, Predicate, field, not};
pub use model::{ColumnInfo, FieldDef, Model, Registry, Shape, TableDescriptor};
pub use value::{SqlType, Value, ValueError, ValueType};

#[cfg(feature = "derive")]
pub use ormkit_derive::Model;
