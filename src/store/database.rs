//! DuckDB-backed document store
//!
//! Documents live in a single `documents(model, id, body)` table, with the
//! body kept as canonical JSON text. Filters become `json_type` /
//! `json_extract_string` equality predicates; sorting on a body field follows
//! the same type ranking as the in-memory store (null, boolean, number,
//! string, composite) with the identifier as tie-break.

use super::types::{DocumentStore, FindQuery, StoreResult};
use crate::error::{Result, StoreError};
use crate::types::{canonical_json, Document, DocumentId, Filter, JsonValue, Sort, ID_FIELD};
use async_trait::async_trait;
use duckdb::types::Value;
use duckdb::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS documents (
    model VARCHAR NOT NULL,
    id UBIGINT NOT NULL,
    body VARCHAR NOT NULL,
    PRIMARY KEY (model, id)
);";

/// Document store using an embedded DuckDB database
///
/// Queries run on tokio's blocking pool, so awaiting `count` or `find` never
/// stalls a runtime worker while DuckDB executes.
pub struct DuckDbStore {
    inner: Arc<DuckDbInner>,
}

/// State shared with blocking query tasks
struct DuckDbInner {
    /// Model identity, also the partition key inside the table
    model: String,
    /// DuckDB connection
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for DuckDbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbStore")
            .field("model", &self.inner.model)
            .finish_non_exhaustive()
    }
}

impl DuckDbStore {
    /// Create a store backed by an in-memory database
    pub fn open_in_memory(model: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StoreError::new("open", format!("Failed to create DuckDB connection: {e}"))
        })?;
        Self::from_connection(conn, model)
    }

    /// Create a store backed by a database file
    pub fn open(path: impl AsRef<Path>, model: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            StoreError::new(
                "open",
                format!("Failed to open DuckDB database {}: {e}", path.display()),
            )
        })?;
        Self::from_connection(conn, model)
    }

    /// Wrap an existing connection, creating the documents table if needed
    pub fn from_connection(conn: Connection, model: impl Into<String>) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::new("open", format!("Failed to create schema: {e}")))?;
        Ok(Self {
            inner: Arc::new(DuckDbInner {
                model: model.into(),
                conn: Mutex::new(conn),
            }),
        })
    }

    /// Insert or replace a document
    pub fn insert(&self, document: &Document) -> Result<()> {
        let body = canonical_json(&JsonValue::Object(document.body.clone()));
        let conn = self.inner.lock("insert")?;
        conn.execute(
            "INSERT OR REPLACE INTO documents (model, id, body) VALUES (?, ?, ?)",
            params![self.inner.model, document.id.get(), body],
        )
        .map_err(|e| StoreError::new("insert", e.to_string()))?;
        Ok(())
    }

    /// Insert or replace several documents
    pub fn insert_many(&self, documents: &[Document]) -> Result<()> {
        documents.iter().try_for_each(|d| self.insert(d))
    }

    /// Delete a document, returning whether it existed
    pub fn remove(&self, id: DocumentId) -> Result<bool> {
        let conn = self.inner.lock("remove")?;
        let deleted = conn
            .execute(
                "DELETE FROM documents WHERE model = ? AND id = ?",
                params![self.inner.model, id.get()],
            )
            .map_err(|e| StoreError::new("remove", e.to_string()))?;
        Ok(deleted > 0)
    }
}

impl DuckDbInner {
    fn lock(&self, operation: &str) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::new(operation, "DuckDB connection lock poisoned"))
    }

    /// Build the WHERE clause shared by count and find
    fn where_clause(&self, filter: &Filter, before: Option<DocumentId>) -> (String, Vec<Value>) {
        let mut clauses = vec!["model = ?".to_string()];
        let mut values = vec![Value::Text(self.model.clone())];

        if let Some(before) = before {
            clauses.push("id < ?".to_string());
            values.push(Value::UBigInt(before.get()));
        }

        for (field, expected) in filter.predicates() {
            if field == ID_FIELD {
                match expected {
                    JsonValue::Number(n) => match n.as_u64() {
                        Some(id) => {
                            clauses.push("id = ?".to_string());
                            values.push(Value::UBigInt(id));
                        }
                        None => {
                            clauses.push("CAST(id AS DOUBLE) = ?".to_string());
                            values.push(Value::Double(n.as_f64().unwrap_or(f64::NAN)));
                        }
                    },
                    _ => clauses.push("FALSE".to_string()),
                }
                continue;
            }

            let path = json_path(field);
            match expected {
                JsonValue::Null => {
                    clauses.push(format!("json_type(body, {path}) = 'NULL'"));
                }
                JsonValue::Bool(b) => {
                    clauses.push(format!(
                        "(json_type(body, {path}) = 'BOOLEAN' AND json_extract_string(body, {path}) = ?)"
                    ));
                    values.push(Value::Text(b.to_string()));
                }
                JsonValue::Number(n) => {
                    clauses.push(format!(
                        "(json_type(body, {path}) IN ('BIGINT', 'UBIGINT', 'DOUBLE') \
                         AND TRY_CAST(json_extract_string(body, {path}) AS DOUBLE) = ?)"
                    ));
                    values.push(Value::Double(n.as_f64().unwrap_or(0.0)));
                }
                JsonValue::String(s) => {
                    clauses.push(format!(
                        "(json_type(body, {path}) = 'VARCHAR' AND json_extract_string(body, {path}) = ?)"
                    ));
                    values.push(Value::Text(s.clone()));
                }
                composite => {
                    clauses.push(format!("CAST(json_extract(body, {path}) AS VARCHAR) = ?"));
                    values.push(Value::Text(canonical_json(composite)));
                }
            }
        }

        (clauses.join(" AND "), values)
    }

    fn count_sync(&self, filter: &Filter) -> StoreResult<u64> {
        let (where_sql, values) = self.where_clause(filter, None);
        let sql = format!("SELECT COUNT(*) FROM documents WHERE {where_sql}");

        tracing::debug!("Executing query: {}", sql);

        let conn = self.lock("count")?;
        let count: i64 = conn
            .query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))
            .map_err(|e| StoreError::new("count", e.to_string()))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn find_sync(&self, query: &FindQuery) -> StoreResult<Vec<Document>> {
        let (where_sql, values) = self.where_clause(&query.filter, query.before);
        let mut sql = format!(
            "SELECT id, body FROM documents WHERE {where_sql} {}",
            order_clause(query.sort.as_ref())
        );
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if query.skip > 0 {
            sql.push_str(&format!(" OFFSET {}", query.skip));
        }

        tracing::debug!("Executing query: {}", sql);

        let conn = self.lock("find")?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::new("find", e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok((row.get::<_, u64>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| StoreError::new("find", e.to_string()))?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, body) = row.map_err(|e| StoreError::new("find", e.to_string()))?;
            let body: JsonValue = serde_json::from_str(&body).map_err(|e| {
                StoreError::new("find", format!("Corrupt body for document {id}: {e}"))
            })?;
            documents.push(Document::new(id, body));
        }
        Ok(documents)
    }
}

#[async_trait]
impl DocumentStore for DuckDbStore {
    fn model_name(&self) -> &str {
        &self.inner.model
    }

    async fn count(&self, filter: &Filter) -> StoreResult<u64> {
        let inner = Arc::clone(&self.inner);
        let filter = filter.clone();
        run_blocking("count", move || inner.count_sync(&filter)).await
    }

    async fn find(&self, query: &FindQuery) -> StoreResult<Vec<Document>> {
        let inner = Arc::clone(&self.inner);
        let query = query.clone();
        run_blocking("find", move || inner.find_sync(&query)).await
    }
}

/// Run a DuckDB call on the blocking pool
async fn run_blocking<T, F>(operation: &'static str, f: F) -> StoreResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::new(operation, format!("query task failed: {e}")))?
}

/// Quoted JSON path literal for a top-level field
fn json_path(field: &str) -> String {
    let escaped = field.replace('"', "\\\"").replace('\'', "''");
    format!("'$.\"{escaped}\"'")
}

/// Arrays and objects share the last rank and are ordered by their JSON text
fn order_clause(sort: Option<&Sort>) -> String {
    let Some(sort) = sort else {
        return "ORDER BY id ASC".to_string();
    };
    let dir = sort.direction.as_sql();
    if sort.field == ID_FIELD {
        return format!("ORDER BY id {dir}");
    }

    let path = json_path(&sort.field);
    format!(
        "ORDER BY CASE COALESCE(json_type(body, {path}), 'NULL') \
         WHEN 'NULL' THEN 0 WHEN 'BOOLEAN' THEN 1 \
         WHEN 'BIGINT' THEN 2 WHEN 'UBIGINT' THEN 2 WHEN 'DOUBLE' THEN 2 \
         WHEN 'VARCHAR' THEN 3 ELSE 4 END {dir}, \
         CASE WHEN json_type(body, {path}) IN ('BIGINT', 'UBIGINT', 'DOUBLE') \
         THEN TRY_CAST(json_extract_string(body, {path}) AS DOUBLE) END {dir}, \
         json_extract_string(body, {path}) {dir}, \
         id {dir}"
    )
}

