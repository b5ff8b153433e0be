use super::AgentStore;
use crate::agents::Agent;
use crate::error::{RelayError, Result};
use crate::providers::ProviderKind;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tokio::sync::Mutex;

/// Agent records in a SQLite `agents` table
pub struct SqliteAgentStore {
    conn: Mutex<Connection>,
}

impl SqliteAgentStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        tracing::info!("[SqliteAgentStore] Opening agent store at {}", db_path.display());
        let conn = Connection::open(db_path)
            .map_err(|e| RelayError::Storage(format!("failed to open database: {e}")))?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RelayError::Storage(format!("failed to open in-memory database: {e}")))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS agents (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                type TEXT NOT NULL,
                context TEXT NOT NULL DEFAULT ''
            );",
        )
        .map_err(|e| RelayError::Storage(format!("migration failed: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn agent_from_row(row: &Row<'_>) -> rusqlite::Result<Agent> {
    let kind: String = row.get(3)?;
    let kind: ProviderKind = kind.parse().map_err(|e: anyhow::Error| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(Agent {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        kind,
        context: row.get(4)?,
    })
}

#[async_trait]
impl AgentStore for SqliteAgentStore {
    async fn save_agent(&self, agent: &Agent) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO agents (id, name, description, type, context)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                agent.id,
                agent.name,
                agent.description,
                agent.kind.tag(),
                agent.context
            ],
        )
        .map_err(|e| {
            tracing::error!("[SqliteAgentStore] Error saving agent to database: {}", e);
            RelayError::Storage(format!("failed to save agent: {e}"))
        })?;

        tracing::debug!("[SqliteAgentStore] Saved agent '{}'", agent.id);
        Ok(())
    }

    async fn get_agent(&self, agent_id: &str) -> Result<Option<Agent>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, name, description, type, context FROM agents WHERE id = ?1",
            params![agent_id],
            agent_from_row,
        )
        .optional()
        .map_err(|e| RelayError::Storage(format!("failed to load agent: {e}")))
    }

    async fn list_agents(&self) -> Result<Vec<Agent>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT id, name, description, type, context FROM agents ORDER BY id")
            .map_err(|e| RelayError::Storage(format!("failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], agent_from_row)
            .map_err(|e| RelayError::Storage(format!("failed to list agents: {e}")))?;

        let agents = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| RelayError::Storage(format!("failed to read agent row: {e}")))?;
        Ok(agents)
    }
}
