//! Database handle.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::builder::{Delete, Insert, Raw, Select, StatementKind, Update};
use crate::compile::CompiledStatement;
use crate::config::DbConfig;
use crate::error::{OrmError, OrmResult};
use crate::executor::{ExecOutcome, Executor};
use crate::model::{Model, Registry};
use crate::value::Value;

/// Shared handle over an [`Executor`] and a model [`Registry`].
///
/// Cloning is cheap; clones share the executor and the descriptor cache, so a single `Db`
/// can be handed to every request handler of an application.
///
/// # Example
///
/// ```ignore
/// use ormkit::{Db, DbConfig, Querier, expr::field};
/// use std::time::Duration;
///
/// let db = Db::with_config(driver, DbConfig::new().timeout(Duration::from_secs(5)));
///
/// let adults: Vec<User> = db
///     .select::<User>()
///     .where_([field("age").gte(18)])
///     .fetch_all(&db)
///     .await?;
/// ```
pub struct Db<E> {
    executor: Arc<E>,
    registry: Arc<Registry>,
    config: DbConfig,
}

impl<E> Clone for Db<E> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            registry: Arc::clone(&self.registry),
            config: self.config.clone(),
        }
    }
}

impl<E> std::fmt::Debug for Db<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E: Executor> Db<E> {
    /// Create a handle with default configuration.
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, DbConfig::default())
    }

    /// Create a handle with custom configuration.
    pub fn with_config(executor: E, config: DbConfig) -> Self {
        Self {
            executor: Arc::new(executor),
            registry: Arc::new(Registry::new()),
            config,
        }
    }

    /// Share an existing registry instead of starting with an empty one.
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Register `M` ahead of its first statement.
    pub fn register<M: Model>(&self) -> OrmResult<()> {
        self.registry.get::<M>().map(|_| ())
    }

    /// SELECT builder for `M`.
    pub fn select<M: Model>(&self) -> Select<M> {
        Select::new()
    }

    /// INSERT builder for `M`.
    pub fn insert<M: Model>(&self) -> Insert<M> {
        Insert::new()
    }

    /// UPDATE builder for `M`.
    pub fn update<M: Model>(&self) -> Update<M> {
        Update::new()
    }

    /// DELETE builder for `M`.
    pub fn delete<M: Model>(&self) -> Delete<M> {
        Delete::new()
    }

    /// Raw SQL decoded into `M`.
    pub fn raw<M: Model>(&self, sql: impl Into<String>, args: Vec<Value>) -> Raw<M> {
        Raw::new(sql, args)
    }

    /// Run a compiled statement that returns no rows.
    pub async fn exec_statement(
        &self,
        kind: StatementKind,
        stmt: &CompiledStatement,
    ) -> OrmResult<ExecOutcome> {
        self.log_statement(kind, stmt);
        let start = Instant::now();
        let result = self
            .with_timeout_of(self.executor.execute(&stmt.sql, &stmt.args))
            .await;
        self.log_outcome(kind, stmt, start.elapsed(), &result);
        result
    }

    /// Run a compiled query and return its rows.
    pub async fn query_statement(
        &self,
        kind: StatementKind,
        stmt: &CompiledStatement,
    ) -> OrmResult<E::Rows> {
        self.log_statement(kind, stmt);
        let start = Instant::now();
        let result = self
            .with_timeout_of(self.executor.query(&stmt.sql, &stmt.args))
            .await;
        self.log_outcome(kind, stmt, start.elapsed(), &result);
        result
    }

    /// Execute with timeout if configured.
    async fn with_timeout_of<T, F>(&self, future: F) -> OrmResult<T>
    where
        F: Future<Output = OrmResult<T>> + Send,
    {
        match self.config.query_timeout {
            Some(timeout) => tokio::time::timeout(timeout, future)
                .await
                .map_err(|_| OrmError::Timeout(timeout))?,
            None => future.await,
        }
    }

    fn log_statement(&self, kind: StatementKind, stmt: &CompiledStatement) {
        if !self.config.log_sql {
            return;
        }
        tracing::debug!(
            target: "ormkit.sql",
            kind = ?kind,
            param_count = stmt.args.len(),
            sql = %self.config.truncate_sql(&stmt.sql),
            "executing statement"
        );
    }

    fn log_outcome<T>(
        &self,
        kind: StatementKind,
        stmt: &CompiledStatement,
        elapsed: Duration,
        result: &OrmResult<T>,
    ) {
        match result {
            Err(OrmError::Timeout(timeout)) => {
                tracing::warn!(
                    target: "ormkit.sql",
                    kind = ?kind,
                    timeout_ms = timeout.as_millis() as u64,
                    sql = %self.config.truncate_sql(&stmt.sql),
                    "statement timed out"
                );
            }
            Err(err) => {
                tracing::debug!(
                    target: "ormkit.sql",
                    kind = ?kind,
                    error = %err,
                    "statement failed"
                );
            }
            Ok(_) => {
                if let Some(threshold) = self.config.slow_query_threshold
                    && elapsed > threshold
                {
                    tracing::warn!(
                        target: "ormkit.sql",
                        kind = ?kind,
                        duration_ms = elapsed.as_millis() as u64,
                        threshold_ms = threshold.as_millis() as u64,
                        sql = %self.config.truncate_sql(&stmt.sql),
                        "slow statement"
                    );
                }
            }
        }
    }
}
