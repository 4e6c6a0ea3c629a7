use crate::config::DatabaseConfig;
use crate::domain::*;
use crate::error::{Result, TodoError};
use crate::storage::Storage;
use async_trait::async_trait;
use libsql::params::Params;
use libsql::{Builder, Connection, Database, Row, Value};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS todos (
    id TEXT PRIMARY KEY NOT NULL,
    user_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_todos_user_id ON todos (user_id);
";

const SELECT_COLUMNS: &str = "SELECT id, user_id, title, completed FROM todos";

// Sets only the supplied columns (NULL parameter = keep) and only touches the row
// when at least one supplied value differs, so the change count is the modified count.
const UPDATE_SQL: &str = "UPDATE todos SET
    user_id = COALESCE(?1, user_id),
    title = COALESCE(?2, title),
    completed = COALESCE(?3, completed)
WHERE id = ?4 AND (
    (?1 IS NOT NULL AND user_id IS NOT ?1)
    OR (?2 IS NOT NULL AND title IS NOT ?2)
    OR (?3 IS NOT NULL AND completed IS NOT ?3)
)";

fn db_err(context: &str) -> impl FnOnce(libsql::Error) -> TodoError + '_ {
    move |e| TodoError::Database {
        message: format!("{context}: {e}"),
    }
}

/// Turso/libSQL-backed todo storage. All operations share one connection.
pub struct LibsqlStorage {
    // Kept alive for the lifetime of the connection
    _db: Database,
    conn: Connection,
}

impl LibsqlStorage {
    /// Connect to a remote database when `url` is configured, otherwise open the local file
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let remote = config.url.is_some();
        let db = match &config.url {
            Some(url) => {
                let auth_token = config.auth_token.clone().unwrap_or_default();
                info!("Connecting to Turso database at {}", url);
                Builder::new_remote(url.clone(), auth_token)
                    .build()
                    .await
                    .map_err(db_err("Failed to connect to database"))?
            }
            None => {
                info!("Opening local database at {}", config.path.display());
                Builder::new_local(&config.path)
                    .build()
                    .await
                    .map_err(db_err("Failed to open database"))?
            }
        };

        let conn = db
            .connect()
            .map_err(db_err("Failed to get database connection"))?;
        if !remote {
            conn.busy_timeout(BUSY_TIMEOUT)
                .map_err(db_err("Failed to set busy timeout"))?;
        }

        let storage = Self { _db: db, conn };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Create the todos table if it does not exist yet
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");

        self.conn
            .execute_batch(MIGRATION_SQL)
            .await
            .map_err(db_err("Failed to run migrations"))?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    async fn query_todos(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Todo>> {
        let mut rows = self
            .conn
            .query(sql, Params::Positional(params))
            .await
            .map_err(db_err("Failed to query todos"))?;

        let mut todos = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err("Failed to read row"))? {
            todos.push(todo_from_row(&row)?);
        }
        Ok(todos)
    }

    async fn count_by_id(&self, id: &str) -> Result<u64> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM todos WHERE id = ?", libsql::params![id.to_string()])
            .await
            .map_err(db_err("Failed to count todos"))?;

        match rows.next().await.map_err(db_err("Failed to read row"))? {
            Some(row) => {
                let count: i64 = row.get(0).map_err(db_err("Failed to get count"))?;
                Ok(count.max(0) as u64)
            }
            None => Ok(0),
        }
    }
}

fn todo_from_row(row: &Row) -> Result<Todo> {
    let id: String = row.get(0).map_err(db_err("Failed to get id"))?;
    let user_id: i64 = row.get(1).map_err(db_err("Failed to get user_id"))?;
    let title: String = row.get(2).map_err(db_err("Failed to get title"))?;
    let completed: i64 = row.get(3).map_err(db_err("Failed to get completed"))?;

    let user_id = i32::try_from(user_id).map_err(|_| TodoError::Database {
        message: format!("user_id {user_id} out of range for todo {id}"),
    })?;

    Ok(Todo {
        id,
        user_id,
        title,
        completed: completed != 0,
    })
}

/// WHERE clause and positional parameters for the supplied filter fields
fn filter_clause(filter: &TodoFilter) -> (String, Vec<Value>) {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    if let Some(id) = &filter.id {
        conditions.push("id = ?");
        params.push(Value::Text(id.clone()));
    }
    if let Some(user_id) = filter.user_id {
        conditions.push("user_id = ?");
        params.push(Value::Integer(i64::from(user_id)));
    }
    if let Some(title) = &filter.title {
        conditions.push("title = ?");
        params.push(Value::Text(title.clone()));
    }
    if let Some(completed) = filter.completed {
        conditions.push("completed = ?");
        params.push(Value::Integer(i64::from(completed)));
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

#[async_trait]
impl Storage for LibsqlStorage {
    async fn search(&self, filter: &TodoFilter) -> Result<Vec<Todo>> {
        let (clause, params) = filter_clause(filter);
        let sql = format!("{SELECT_COLUMNS}{clause} ORDER BY title, id");
        let todos = self.query_todos(&sql, params).await?;

        debug!("Search matched {} todos", todos.len());
        Ok(todos)
    }

    async fn get(&self, id: &str) -> Result<Option<Todo>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
        let mut todos = self
            .query_todos(&sql, vec![Value::Text(id.to_string())])
            .await?;
        Ok(todos.pop())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo> {
        let todo = todo.into_todo(Uuid::new_v4().to_string());

        self.conn
            .execute(
                "INSERT INTO todos (id, user_id, title, completed) VALUES (?, ?, ?, ?)",
                libsql::params![
                    todo.id.clone(),
                    i64::from(todo.user_id),
                    todo.title.clone(),
                    i64::from(todo.completed)
                ],
            )
            .await
            .map_err(db_err("Failed to insert todo"))?;

        debug!("Created todo: {} with id {}", todo.title, todo.id);
        Ok(todo)
    }

    async fn update(&self, id: &str, patch: &TodoPatch) -> Result<UpdateOutcome> {
        let params = vec![
            patch.user_id.map_or(Value::Null, |v| Value::Integer(i64::from(v))),
            patch.title.clone().map_or(Value::Null, Value::Text),
            patch.completed.map_or(Value::Null, |v| Value::Integer(i64::from(v))),
            Value::Text(id.to_string()),
        ];
        let modified = self
            .conn
            .execute(UPDATE_SQL, Params::Positional(params))
            .await
            .map_err(db_err("Failed to update todo"))?;

        let matched = if modified > 0 {
            modified
        } else {
            self.count_by_id(id).await?
        };

        debug!("Updated todo {}: matched {}, modified {}", id, matched, modified);
        Ok(UpdateOutcome {
            matched_count: matched as i64,
            modified_count: modified as i64,
        })
    }

    async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        let deleted = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?", libsql::params![id.to_string()])
            .await
            .map_err(db_err("Failed to delete todo"))?;

        debug!("Deleted {} todo(s) with id {}", deleted, id);
        Ok(DeleteOutcome {
            deleted_count: deleted as i64,
        })
    }
}
