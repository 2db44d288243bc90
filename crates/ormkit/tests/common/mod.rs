//! Shared models and an in-memory executor for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use ormkit::{
    CompiledStatement, ExecOutcome, Executor, Model, OrmError, OrmResult, ResultSet, Value,
};

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct TestModel {
    pub id: i64,
    pub first_name: String,
    pub age: Option<i8>,
    #[orm("column=test_model_last_name")]
    pub last_name: Option<String>,
}

impl TestModel {
    pub fn neo() -> Self {
        Self {
            id: 12,
            first_name: "Neo".to_string(),
            age: Some(18),
            last_name: Some("Anderson".to_string()),
        }
    }
}

/// Covers every bindable value kind.
#[derive(Debug, Default, Clone, PartialEq, Model)]
#[orm(table = "wide_rows")]
pub struct WideRow {
    pub id: u32,
    pub active: bool,
    pub score: f64,
    pub payload: Vec<u8>,
    pub born_on: chrono::NaiveDate,
    pub seen_at: chrono::NaiveDateTime,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub external_id: uuid::Uuid,
    pub meta: serde_json::Value,
    pub nickname: Option<String>,
}

impl WideRow {
    pub fn sample() -> Self {
        let born_on = chrono::NaiveDate::from_ymd_opt(1999, 3, 31).unwrap();
        let seen_at = born_on.and_hms_opt(12, 30, 0).unwrap();
        Self {
            id: 7,
            active: true,
            score: 9.5,
            payload: vec![0xde, 0xad],
            born_on,
            seen_at,
            created_at: seen_at.and_utc(),
            external_id: uuid::Uuid::new_v4(),
            meta: serde_json::json!({ "red_pill": true }),
            nickname: None,
        }
    }
}

/// Canned executor response.
#[derive(Debug)]
pub enum Reply {
    Rows(ResultSet),
    Done(ExecOutcome),
    Fail(&'static str),
    /// Sleep before answering, to trip timeouts.
    Stall(Duration),
}

/// Executor that records every statement and answers from a queue.
///
/// With an empty queue, queries return no rows and statements affect no rows.
#[derive(Debug, Default)]
pub struct MockExecutor {
    replies: Mutex<VecDeque<Reply>>,
    log: Mutex<Vec<CompiledStatement>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, reply: Reply) -> Self {
        self.push(reply);
        self
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Statements received so far.
    pub fn statements(&self) -> Vec<CompiledStatement> {
        self.log.lock().unwrap().clone()
    }

    fn next_reply(&self, sql: &str, args: &[Value]) -> Option<Reply> {
        self.log
            .lock()
            .unwrap()
            .push(CompiledStatement::new(sql, args.to_vec()));
        self.replies.lock().unwrap().pop_front()
    }
}

impl Executor for MockExecutor {
    type Rows = ResultSet;

    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<ExecOutcome> {
        match self.next_reply(sql, args) {
            None => Ok(ExecOutcome::default()),
            Some(Reply::Done(outcome)) => Ok(outcome),
            Some(Reply::Fail(msg)) => Err(OrmError::executor(msg)),
            Some(Reply::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(ExecOutcome::default())
            }
            Some(Reply::Rows(_)) => Err(OrmError::executor("statement answered with rows")),
        }
    }

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<ResultSet> {
        match self.next_reply(sql, args) {
            None => Ok(ResultSet::default()),
            Some(Reply::Rows(rows)) => Ok(rows),
            Some(Reply::Fail(msg)) => Err(OrmError::executor(msg)),
            Some(Reply::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(ResultSet::default())
            }
            Some(Reply::Done(_)) => Err(OrmError::executor("query answered without rows")),
        }
    }
}
