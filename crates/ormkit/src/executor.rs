//! Executor boundary.
//!
//! ormkit never opens connections. A driver plugs in by implementing [`Executor`] (run a
//! statement, run a query) and [`Rows`] (iterate a result set and scan a row into
//! destinations). [`ResultSet`] is a buffered in-memory [`Rows`] usable by drivers that
//! collect results eagerly, and by tests.

use std::future::Future;

use crate::error::{OrmError, OrmResult};
use crate::value::Value;

/// Runs SQL produced by the statement builders.
///
/// Implementations receive back-tick quoted SQL with `?` placeholders and the positional
/// arguments in placeholder order.
pub trait Executor: Send + Sync {
    /// Row iterator returned by [`query`](Self::query).
    type Rows: Rows;

    /// Run a statement that returns no rows.
    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<ExecOutcome>> + Send;

    /// Run a query and return its rows.
    fn query(&self, sql: &str, args: &[Value])
    -> impl Future<Output = OrmResult<Self::Rows>> + Send;
}

/// Cursor over a query result.
pub trait Rows: Send {
    /// Column names in result order.
    fn columns(&self) -> &[String];

    /// Advance to the next row; `false` once the result set is exhausted.
    fn next(&mut self) -> OrmResult<bool>;

    /// Scan the current row, one destination per column in [`columns`](Self::columns) order.
    fn scan(&mut self, dest: &mut [&mut dyn ScanTarget]) -> OrmResult<()>;
}

/// A destination for one scanned column value.
pub trait ScanTarget {
    fn accept(&mut self, value: Value) -> OrmResult<()>;
}

impl ScanTarget for Value {
    fn accept(&mut self, value: Value) -> OrmResult<()> {
        *self = value;
        Ok(())
    }
}

/// What a statement reported back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    pub last_insert_id: Option<i64>,
}

impl ExecOutcome {
    pub fn new(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            last_insert_id: None,
        }
    }

    pub fn with_last_insert_id(mut self, id: i64) -> Self {
        self.last_insert_id = Some(id);
        self
    }
}

/// Result of [`Executer::execute`](crate::builder::Executer::execute).
///
/// Statement construction errors are returned before any I/O; execution errors are captured
/// here and surface when the caller asks for the affected-row count or the insert id.
#[derive(Debug)]
pub struct ExecResult {
    inner: Result<ExecOutcome, OrmError>,
}

impl ExecResult {
    pub(crate) fn new(inner: Result<ExecOutcome, OrmError>) -> Self {
        Self { inner }
    }

    /// Rows affected, or the execution error.
    pub fn rows_affected(&self) -> Result<u64, &OrmError> {
        self.inner.as_ref().map(|o| o.rows_affected)
    }

    /// Last inserted id, `None` when the executor did not report one.
    pub fn last_insert_id(&self) -> Result<Option<i64>, &OrmError> {
        self.inner.as_ref().map(|o| o.last_insert_id)
    }

    /// The execution error, if any.
    pub fn error(&self) -> Option<&OrmError> {
        self.inner.as_ref().err()
    }

    pub fn is_ok(&self) -> bool {
        self.inner.is_ok()
    }

    pub fn into_result(self) -> OrmResult<ExecOutcome> {
        self.inner
    }
}

/// Buffered result set.
///
/// ```ignore
/// let rows = ResultSet::new(["id", "first_name"])
///     .row([Value::Int(1), Value::from("Neo")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    cursor: Option<usize>,
}

impl ResultSet {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            cursor: None,
        }
    }

    /// Append a row.
    pub fn row(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.rows.push(values.into_iter().collect());
        self
    }

    pub fn push_row(&mut self, values: Vec<Value>) {
        self.rows.push(values);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn current(&mut self) -> OrmResult<&mut Vec<Value>> {
        let idx = self
            .cursor
            .ok_or_else(|| OrmError::executor("scan called before next"))?;
        self.rows
            .get_mut(idx)
            .ok_or_else(|| OrmError::executor("scan called after the last row"))
    }
}

impl Rows for ResultSet {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next(&mut self) -> OrmResult<bool> {
        let next = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(next.min(self.rows.len()));
        Ok(next < self.rows.len())
    }

    fn scan(&mut self, dest: &mut [&mut dyn ScanTarget]) -> OrmResult<()> {
        let width = self.columns.len();
        let row = self.current()?;
        if row.len() != width {
            return Err(OrmError::executor(format!(
                "row has {} values for {} columns",
                row.len(),
                width
            )));
        }
        if dest.len() != width {
            return Err(OrmError::executor(format!(
                "expected {} scan destinations, got {}",
                width,
                dest.len()
            )));
        }
        for (target, value) in dest.iter_mut().zip(row.iter_mut()) {
            target.accept(std::mem::replace(value, Value::Null))?;
        }
        Ok(())
    }
}
