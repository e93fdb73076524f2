//! Table layout of the persisted graph.

use crate::syntax::ScopeKind;

pub(crate) const SCHEMA: &str = "
    CREATE TABLE Nodes (
        id INTEGER PRIMARY KEY,
        parent_id INTEGER REFERENCES Nodes(id),
        kind INTEGER NOT NULL,
        content TEXT,
        sort_index INTEGER,
        ref_id INTEGER
    );
    CREATE INDEX nodes_by_parent ON Nodes(parent_id, sort_index);

    CREATE TABLE Modules (
        id INTEGER PRIMARY KEY REFERENCES Nodes(id),
        parent_scope_id INTEGER,
        name TEXT NOT NULL,
        state TEXT,
        summary TEXT,
        script TEXT,
        UNIQUE(parent_scope_id, name)
    );
    CREATE TABLE Scenes (
        id INTEGER PRIMARY KEY REFERENCES Nodes(id),
        parent_scope_id INTEGER REFERENCES Modules(id),
        name TEXT NOT NULL,
        state TEXT,
        summary TEXT,
        script TEXT,
        UNIQUE(parent_scope_id, name)
    );
    CREATE TABLE Passages (
        id INTEGER PRIMARY KEY REFERENCES Nodes(id),
        parent_scope_id INTEGER REFERENCES Scenes(id),
        name TEXT NOT NULL,
        state TEXT,
        summary TEXT,
        script TEXT,
        UNIQUE(parent_scope_id, name)
    );
    CREATE TABLE Items (
        id INTEGER PRIMARY KEY REFERENCES Nodes(id),
        parent_scope_id INTEGER REFERENCES Modules(id),
        name TEXT NOT NULL,
        state TEXT,
        summary TEXT,
        script TEXT,
        UNIQUE(parent_scope_id, name)
    );

    CREATE TABLE Actions (
        id INTEGER PRIMARY KEY,
        qualified_name TEXT NOT NULL UNIQUE,
        script TEXT
    );
    CREATE TABLE Words (
        id INTEGER PRIMARY KEY,
        text TEXT NOT NULL UNIQUE,
        frequency INTEGER NOT NULL
    );
    CREATE TABLE Expressions (
        id INTEGER PRIMARY KEY,
        script TEXT
    );
";

/// Every table of the graph, used for row counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Nodes,
    Modules,
    Scenes,
    Passages,
    Items,
    Actions,
    Words,
    Expressions,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Nodes => "Nodes",
            Table::Modules => "Modules",
            Table::Scenes => "Scenes",
            Table::Passages => "Passages",
            Table::Items => "Items",
            Table::Actions => "Actions",
            Table::Words => "Words",
            Table::Expressions => "Expressions",
        }
    }
}

impl From<ScopeKind> for Table {
    fn from(kind: ScopeKind) -> Self {
        match kind {
            ScopeKind::Module => Table::Modules,
            ScopeKind::Scene => Table::Scenes,
            ScopeKind::Passage => Table::Passages,
            ScopeKind::Item => Table::Items,
        }
    }
}
