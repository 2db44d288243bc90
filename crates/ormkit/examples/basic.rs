//! Basic usage example for ormkit
//!
//! Run with: cargo run --example basic -p ormkit
//!
//! The executor below prints every statement instead of talking to a server, and answers
//! queries from an in-memory table. Swap it for a driver adapter to run against MySQL.

use std::sync::Mutex;

use ormkit::expr::{avg, field, not};
use ormkit::{
    Db, DbConfig, ExecOutcome, Executer, Executor, Model, OrmResult, Querier, ResultSet, Value,
};

#[derive(Debug, Default, Clone, Model)]
#[orm(table = "users")]
struct User {
    id: i64,
    username: String,
    age: Option<i8>,
    #[orm("column=mail")]
    email: Option<String>,
}

/// Prints statements and remembers the last inserted row.
#[derive(Default)]
struct PrintExecutor {
    stored: Mutex<ResultSet>,
}

impl Executor for PrintExecutor {
    type Rows = ResultSet;

    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<ExecOutcome> {
        println!("exec:  {sql}  {args:?}");
        if sql.starts_with("INSERT") {
            let mut stored = self.stored.lock().unwrap_or_else(|e| e.into_inner());
            *stored = ResultSet::new(["id", "username", "age", "mail"]);
            for row in args.chunks(4) {
                stored.push_row(row.to_vec());
            }
            let inserted = stored.len() as u64;
            return Ok(ExecOutcome::new(inserted).with_last_insert_id(2));
        }
        Ok(ExecOutcome::new(1))
    }

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<ResultSet> {
        println!("query: {sql}  {args:?}");
        Ok(self.stored.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }
}

#[tokio::main]
async fn main() -> OrmResult<()> {
    let db = Db::with_config(PrintExecutor::default(), DbConfig::new().offset_decoder());

    // INSERT
    let users = [
        User {
            id: 1,
            username: "neo".to_string(),
            age: Some(18),
            email: Some("neo@zion.io".to_string()),
        },
        User {
            id: 2,
            username: "trinity".to_string(),
            age: None,
            email: None,
        },
    ];
    let res = db.insert::<User>().values(users).execute(&db).await?;
    println!("inserted {:?} rows, last id {:?}", res.rows_affected(), res.last_insert_id());

    // SELECT
    let all: Vec<User> = db
        .select::<User>()
        .where_([field("id").gte(1)])
        .fetch_all(&db)
        .await?;
    println!("fetched {all:#?}");

    // Aggregate projection
    let stmt = ormkit::Build::build(&db.select::<User>().columns([avg("age")]), db.registry())?;
    println!("aggregate sql: {}", stmt.sql);

    // UPDATE
    db.update::<User>()
        .set("email", Value::Null)
        .where_([field("username").eq("trinity")])
        .execute(&db)
        .await?;

    // DELETE
    let res = db
        .delete::<User>()
        .where_([not(field("age").lt(18).or(field("id").eq(1)))])
        .execute(&db)
        .await?;
    println!("deleted {:?} rows", res.rows_affected());

    Ok(())
}
