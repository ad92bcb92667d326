//! Tasks table - the append-only task record ledger
//!
//! Raw row operations only; lifecycle rules (which transitions are legal,
//! which errors they map to) live in tasks::store.

use crate::agents::Archetype;
use crate::db::Database;
use crate::tasks::types::{TaskFilter, TaskRecord, TaskStatus};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Result as SqliteResult, Row, params};

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn map_task_row(row: &Row<'_>) -> rusqlite::Result<TaskRecord> {
    let archetype_raw: String = row.get(2)?;
    let archetype = Archetype::from_str(&archetype_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("unknown archetype '{}'", archetype_raw).into(),
        )
    })?;

    let status_raw: String = row.get(4)?;
    let status = TaskStatus::from_str(&status_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            format!("unknown status '{}'", status_raw).into(),
        )
    })?;

    let payload_raw: String = row.get(5)?;
    let payload = serde_json::from_str(&payload_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    let result_raw: Option<String> = row.get(6)?;
    let result = match result_raw {
        Some(raw) => Some(
            serde_json::from_str(&raw).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e))
            })?,
        ),
        None => None,
    };

    let created_raw: String = row.get(8)?;
    let completed_raw: Option<String> = row.get(9)?;
    let completed_at = match completed_raw {
        Some(raw) => Some(parse_timestamp(9, &raw)?),
        None => None,
    };

    Ok(TaskRecord {
        id: row.get(0)?,
        task_type: row.get(1)?,
        archetype,
        assigned_agent_id: row.get(3)?,
        status,
        payload,
        result,
        error: row.get(7)?,
        created_at: parse_timestamp(8, &created_raw)?,
        completed_at,
    })
}

const TASK_COLUMNS: &str = "id, task_type, archetype, assigned_agent_id, status, \
                            payload, result, error, created_at, completed_at";

impl Database {
    /// Append a new task row with status 'assigned'; returns the allocated id
    pub fn insert_task(
        &self,
        task_type: &str,
        archetype: Archetype,
        agent_id: Option<&str>,
        payload_json: &str,
        created_at: DateTime<Utc>,
    ) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO tasks (task_type, archetype, assigned_agent_id, status, payload, created_at)
             VALUES (?1, ?2, ?3, 'assigned', ?4, ?5)",
            params![
                task_type,
                archetype.as_str(),
                agent_id,
                payload_json,
                created_at.to_rfc3339()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_task(&self, task_id: i64) -> SqliteResult<Option<TaskRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tasks WHERE id = ?1",
            TASK_COLUMNS
        ))?;

        match stmt.query_row(params![task_id], map_task_row) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Move an assigned task to a terminal status; returns the number of
    /// rows updated (0 when the task is missing or already terminal).
    pub fn terminalize_task(
        &self,
        task_id: i64,
        status: TaskStatus,
        result_json: Option<&str>,
        error: Option<&str>,
        completed_at: DateTime<Utc>,
    ) -> SqliteResult<usize> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE tasks SET status = ?1, result = ?2, error = ?3, completed_at = ?4
             WHERE id = ?5 AND status = 'assigned'",
            params![
                status.as_str(),
                result_json,
                error,
                completed_at.to_rfc3339(),
                task_id
            ],
        )
    }

    /// Scan the ledger, oldest first
    pub fn list_tasks(&self, filter: &TaskFilter) -> SqliteResult<Vec<TaskRecord>> {
        let mut sql = format!("SELECT {} FROM tasks", TASK_COLUMNS);
        let mut clauses: Vec<String> = Vec::new();
        let mut args: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            clauses.push(format!("status = ?{}", args.len() + 1));
            args.push(Box::new(status.as_str().to_string()));
        }
        if let Some(ref task_type) = filter.task_type {
            clauses.push(format!("task_type = ?{}", args.len() + 1));
            args.push(Box::new(task_type.clone()));
        }
        if let Some(ref agent_id) = filter.agent_id {
            clauses.push(format!("assigned_agent_id = ?{}", args.len() + 1));
            args.push(Box::new(agent_id.clone()));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id ASC");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let args: Vec<&dyn rusqlite::types::ToSql> = args.iter().map(|a| a.as_ref()).collect();
        let rows = stmt.query_map(&args[..], map_task_row)?;
        rows.collect()
    }

    /// The most recent N tasks, newest first
    pub fn recent_tasks(&self, limit: usize) -> SqliteResult<Vec<TaskRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tasks ORDER BY id DESC LIMIT ?1",
            TASK_COLUMNS
        ))?;
        let rows = stmt.query_map(params![limit as i64], map_task_row)?;
        rows.collect()
    }
}
