//! Relational sink for the projected graph.
//!
//! [`GraphStore`] is a thin typed layer over a SQLite connection. The
//! compiler only ever appends rows or updates a column in place; the read
//! helpers exist for the driver's summary and for tests.

mod schema;

pub use schema::Table;

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, trace};

use crate::base::constants::ROOT_NODE_ID;
use crate::syntax::{NodeKind, ScopeKind};

/// Row identity in any table of the store
pub type RowId = i64;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("unknown node kind code {0} in store")]
    UnknownKind(i64),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A node row about to be written
#[derive(Debug, Clone, Copy)]
pub struct NewNode<'a> {
    pub parent: RowId,
    pub kind: NodeKind,
    pub content: Option<&'a str>,
    pub sort_index: Option<i64>,
    pub ref_id: Option<RowId>,
}

impl<'a> NewNode<'a> {
    pub fn new(parent: RowId, kind: NodeKind) -> Self {
        Self {
            parent,
            kind,
            content: None,
            sort_index: None,
            ref_id: None,
        }
    }

    pub fn content(mut self, content: Option<&'a str>) -> Self {
        self.content = content;
        self
    }

    pub fn sort_index(mut self, sort_index: Option<i64>) -> Self {
        self.sort_index = sort_index;
        self
    }

    pub fn ref_id(mut self, ref_id: RowId) -> Self {
        self.ref_id = Some(ref_id);
        self
    }
}

/// Header fields folded into a scope row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeHeader {
    pub state: Option<String>,
    pub summary: Option<String>,
    pub script: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRow {
    pub id: RowId,
    pub parent_id: Option<RowId>,
    pub kind: NodeKind,
    pub content: Option<String>,
    pub sort_index: Option<i64>,
    pub ref_id: Option<RowId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRow {
    pub id: RowId,
    pub parent_scope_id: Option<RowId>,
    pub name: String,
    pub state: Option<String>,
    pub summary: Option<String>,
    pub script: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRow {
    pub id: RowId,
    pub qualified_name: String,
    pub script: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRow {
    pub id: RowId,
    pub text: String,
    pub frequency: i64,
}

pub struct GraphStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl GraphStore {
    /// Create a fresh store at `path`, discarding any file already there.
    pub fn create(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            fs::remove_file(path).map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            debug!(path = %path.display(), "discarded previous store");
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    pub fn in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> StoreResult<Self> {
        conn.execute_batch(schema::SCHEMA)?;
        conn.execute(
            "INSERT INTO Nodes (id, parent_id, kind) VALUES (?1, NULL, ?2)",
            params![ROOT_NODE_ID, NodeKind::Root.code()],
        )?;
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn root(&self) -> RowId {
        ROOT_NODE_ID
    }

    // Writes

    pub fn insert_node(&self, node: NewNode<'_>) -> StoreResult<RowId> {
        self.conn.execute(
            "INSERT INTO Nodes (parent_id, kind, content, sort_index, ref_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                node.parent,
                node.kind.code(),
                node.content,
                node.sort_index,
                node.ref_id
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        trace!(id, parent = node.parent, kind = ?node.kind, "node");
        Ok(id)
    }

    pub fn set_node_content(&self, id: RowId, content: Option<&str>) -> StoreResult<()> {
        self.conn.execute(
            "UPDATE Nodes SET content = ?1 WHERE id = ?2",
            params![content, id],
        )?;
        Ok(())
    }

    pub fn set_node_ref(&self, id: RowId, ref_id: RowId) -> StoreResult<()> {
        self.conn.execute(
            "UPDATE Nodes SET ref_id = ?1 WHERE id = ?2",
            params![ref_id, id],
        )?;
        Ok(())
    }

    /// Scope rows share their identity with the scope's node row.
    pub fn insert_scope(
        &self,
        kind: ScopeKind,
        id: RowId,
        parent_scope: Option<RowId>,
        name: &str,
    ) -> StoreResult<()> {
        let sql = format!(
            "INSERT INTO {} (id, parent_scope_id, name) VALUES (?1, ?2, ?3)",
            Table::from(kind).name()
        );
        self.conn.execute(&sql, params![id, parent_scope, name])?;
        debug!(id, ?kind, name, "scope");
        Ok(())
    }

    pub fn update_scope_header(
        &self,
        kind: ScopeKind,
        id: RowId,
        header: &ScopeHeader,
    ) -> StoreResult<()> {
        let sql = format!(
            "UPDATE {} SET state = ?1, summary = ?2, script = ?3 WHERE id = ?4",
            Table::from(kind).name()
        );
        self.conn.execute(
            &sql,
            params![header.state, header.summary, header.script, id],
        )?;
        Ok(())
    }

    pub fn insert_action(&self, qualified_name: &str, script: Option<&str>) -> StoreResult<RowId> {
        self.conn.execute(
            "INSERT INTO Actions (qualified_name, script) VALUES (?1, ?2)",
            params![qualified_name, script],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn set_action_script(&self, id: RowId, script: Option<&str>) -> StoreResult<()> {
        self.conn.execute(
            "UPDATE Actions SET script = ?1 WHERE id = ?2",
            params![script, id],
        )?;
        Ok(())
    }

    /// New word row with a frequency of one
    pub fn insert_word(&self, text: &str) -> StoreResult<RowId> {
        self.conn.execute(
            "INSERT INTO Words (text, frequency) VALUES (?1, 1)",
            params![text],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn set_word_frequency(&self, id: RowId, frequency: i64) -> StoreResult<()> {
        self.conn.execute(
            "UPDATE Words SET frequency = ?1 WHERE id = ?2",
            params![frequency, id],
        )?;
        Ok(())
    }

    pub fn insert_expression(&self, script: Option<&str>) -> StoreResult<RowId> {
        self.conn.execute(
            "INSERT INTO Expressions (script) VALUES (?1)",
            params![script],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // Reads

    pub fn count(&self, table: Table) -> StoreResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
    }

    pub fn node(&self, id: RowId) -> StoreResult<Option<NodeRow>> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, parent_id, kind, content, sort_index, ref_id FROM Nodes WHERE id = ?1",
                params![id],
                raw_node,
            )
            .optional()?;
        raw.map(RawNode::into_row).transpose()
    }

    /// Every node in id order
    pub fn nodes(&self) -> StoreResult<Vec<NodeRow>> {
        self.query_nodes(
            "SELECT id, parent_id, kind, content, sort_index, ref_id FROM Nodes ORDER BY id",
            [],
        )
    }

    /// Children of `parent` in persisted order (sort index, then id)
    pub fn children(&self, parent: RowId) -> StoreResult<Vec<NodeRow>> {
        self.query_nodes(
            "SELECT id, parent_id, kind, content, sort_index, ref_id FROM Nodes
             WHERE parent_id = ?1 ORDER BY sort_index, id",
            params![parent],
        )
    }

    fn query_nodes(&self, sql: &str, args: impl rusqlite::Params) -> StoreResult<Vec<NodeRow>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, raw_node)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_row()?);
        }
        Ok(out)
    }

    pub fn scopes(&self, kind: ScopeKind) -> StoreResult<Vec<ScopeRow>> {
        let sql = format!(
            "SELECT id, parent_scope_id, name, state, summary, script FROM {} ORDER BY id",
            Table::from(kind).name()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], scope_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn scope_by_name(
        &self,
        kind: ScopeKind,
        parent_scope: Option<RowId>,
        name: &str,
    ) -> StoreResult<Option<ScopeRow>> {
        let sql = format!(
            "SELECT id, parent_scope_id, name, state, summary, script FROM {}
             WHERE parent_scope_id IS ?1 AND name = ?2",
            Table::from(kind).name()
        );
        Ok(self
            .conn
            .query_row(&sql, params![parent_scope, name], scope_row)
            .optional()?)
    }

    pub fn action(&self, qualified_name: &str) -> StoreResult<Option<ActionRow>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, qualified_name, script FROM Actions WHERE qualified_name = ?1",
                params![qualified_name],
                |row| {
                    Ok(ActionRow {
                        id: row.get(0)?,
                        qualified_name: row.get(1)?,
                        script: row.get(2)?,
                    })
                },
            )
            .optional()?)
    }

    pub fn word(&self, text: &str) -> StoreResult<Option<WordRow>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, text, frequency FROM Words WHERE text = ?1",
                params![text],
                word_row,
            )
            .optional()?)
    }

    pub fn word_by_id(&self, id: RowId) -> StoreResult<Option<WordRow>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, text, frequency FROM Words WHERE id = ?1",
                params![id],
                word_row,
            )
            .optional()?)
    }

    pub fn expression(&self, id: RowId) -> StoreResult<Option<Option<String>>> {
        Ok(self
            .conn
            .query_row(
                "SELECT script FROM Expressions WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?)
    }
}

struct RawNode {
    id: RowId,
    parent_id: Option<RowId>,
    kind: i64,
    content: Option<String>,
    sort_index: Option<i64>,
    ref_id: Option<RowId>,
}

impl RawNode {
    fn into_row(self) -> StoreResult<NodeRow> {
        let kind = NodeKind::from_code(self.kind).ok_or(StoreError::UnknownKind(self.kind))?;
        Ok(NodeRow {
            id: self.id,
            parent_id: self.parent_id,
            kind,
            content: self.content,
            sort_index: self.sort_index,
            ref_id: self.ref_id,
        })
    }
}

fn raw_node(row: &Row<'_>) -> rusqlite::Result<RawNode> {
    Ok(RawNode {
        id: row.get(0)?,
        parent_id: row.get(1)?,
        kind: row.get(2)?,
        content: row.get(3)?,
        sort_index: row.get(4)?,
        ref_id: row.get(5)?,
    })
}

fn word_row(row: &Row<'_>) -> rusqlite::Result<WordRow> {
    Ok(WordRow {
        id: row.get(0)?,
        text: row.get(1)?,
        frequency: row.get(2)?,
    })
}

fn scope_row(row: &Row<'_>) -> rusqlite::Result<ScopeRow> {
    Ok(ScopeRow {
        id: row.get(0)?,
        parent_scope_id: row.get(1)?,
        name: row.get(2)?,
        state: row.get(3)?,
        summary: row.get(4)?,
        script: row.get(5)?,
    })
}
