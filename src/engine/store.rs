use std::collections::HashMap;

use crate::engine::table::Table;
use crate::parser::Command;

/// Name-keyed table storage owned by one interpreter session. Entries are
/// created by IMPORT/CREATE/JOIN, moved by RENAME and deleted by DISCARD;
/// nothing here outlives the session.
#[derive(Debug, Default)]
pub struct TableStore {
    tables: HashMap<String, Table>,
}

impl TableStore {
    pub fn new() -> TableStore {
        TableStore {
            tables: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Insert or overwrite.
    pub fn insert(&mut self, name: String, table: Table) {
        self.tables.insert(name, table);
    }

    pub fn remove(&mut self, name: &str) -> Option<Table> {
        self.tables.remove(name)
    }

    /// Move an entry to a new key. The caller has checked that `old` exists
    /// and `new` does not.
    pub fn rename(&mut self, old: &str, new: &str) {
        if let Some(table) = self.tables.remove(old) {
            self.tables.insert(new.to_string(), table);
        }
    }
}

/// Named procedures: command sequences captured at definition time and
/// re-executed, never re-parsed, at CALL time.
#[derive(Debug, Default)]
pub struct ProcedureStore {
    procedures: HashMap<String, Vec<Command>>,
}

impl ProcedureStore {
    pub fn new() -> ProcedureStore {
        ProcedureStore {
            procedures: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Vec<Command>> {
        self.procedures.get(name)
    }

    /// Insert or overwrite.
    pub fn insert(&mut self, name: String, body: Vec<Command>) {
        self.procedures.insert(name, body);
    }
}
