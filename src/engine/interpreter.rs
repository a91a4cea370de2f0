use std::io::{self, Write};

use log::error;

use crate::engine::eval::filter_rows;
use crate::engine::store::{ProcedureStore, TableStore};
use crate::engine::table::{join, Table};
use crate::engine::ExecError;
use crate::output;
use crate::parser::{parse_program, Command, Condition, SelectList};
use crate::{DynBoxWrite, DynError};

/// One interpreter session: owns the table store and the procedure store,
/// plus the sink that CALL prints member-command results to. The stores
/// live exactly as long as the session; nothing is shared or persisted
/// beyond explicit EXPORT.
pub struct Interpreter {
    tables: TableStore,
    procedures: ProcedureStore,
    out: DynBoxWrite,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter::with_output(Box::new(io::stdout()))
    }

    pub fn with_output(out: DynBoxWrite) -> Interpreter {
        Interpreter {
            tables: TableStore::new(),
            procedures: ProcedureStore::new(),
            out,
        }
    }

    pub fn out(&mut self) -> &mut dyn Write {
        self.out.as_mut()
    }

    /// Parse and execute one batch of source text. A syntax error aborts
    /// the batch before anything runs.
    pub fn interpret(&mut self, source: &str) -> Result<Option<String>, DynError> {
        let commands = parse_program(source)?;
        match self.run_commands(&commands) {
            Ok(result) => Ok(result),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// Execute commands in order, returning at the first one that yields a
    /// result (or fails), so a multi-command batch only runs commands up
    /// to the first productive one. Procedure bodies deliberately do not
    /// work this way, see [`Interpreter::call_procedure`].
    pub fn run_commands(&mut self, commands: &[Command]) -> Result<Option<String>, ExecError> {
        for command in commands {
            let result = self.execute(command)?;
            if result.is_some() {
                return Ok(result);
            }
        }
        Ok(None)
    }

    /// Execute a single command against the stores.
    pub fn execute(&mut self, command: &Command) -> Result<Option<String>, ExecError> {
        match command {
            Command::Import { table, file } => self.import_table(table, file),
            Command::Export { table, file } => self.export_table(table, file),
            Command::Discard { table } => self.discard_table(table),
            Command::Rename { old, new } => self.rename_table(old, new),
            Command::Print { table } => self.print_table(table),
            Command::Select {
                columns,
                table,
                condition,
                limit,
            } => self.select(columns, table, condition.as_ref(), *limit),
            Command::CreateSelect {
                table,
                columns,
                source,
                condition,
            } => self.create_select(table, columns, source, condition.as_ref()),
            Command::CreateJoin {
                table,
                left,
                right,
                using,
            } => self.create_join(table, left, right, using),
            Command::Procedure { name, body } => self.define_procedure(name, body),
            Command::Call { name } => self.call_procedure(name),
        }
    }

    fn import_table(&mut self, name: &str, file: &str) -> Result<Option<String>, ExecError> {
        match output::read_table(file) {
            Ok(table) => {
                // no existence check: IMPORT overwrites
                self.tables.insert(name.to_string(), table);
                Ok(Some(format!("Table '{}' imported successfully.", name)))
            }
            Err(e) => {
                // a failed read yields no result and the batch moves on
                error!("reading '{}' failed: {}", file, e);
                Ok(None)
            }
        }
    }

    fn export_table(&mut self, name: &str, file: &str) -> Result<Option<String>, ExecError> {
        let table = self
            .tables
            .get(name)
            .ok_or_else(|| ExecError::TableNotFound(name.to_string()))?;
        match output::write_table(table, file) {
            Ok(()) => Ok(Some(format!(
                "Table '{}' exported successfully to '{}'.",
                name, file
            ))),
            Err(e) => {
                error!("writing '{}' failed: {}", file, e);
                Err(ExecError::Io(format!("Error exporting table '{}'.", name)))
            }
        }
    }

    fn discard_table(&mut self, name: &str) -> Result<Option<String>, ExecError> {
        if self.tables.remove(name).is_none() {
            return Err(ExecError::TableNotFound(name.to_string()));
        }
        Ok(Some(format!("Table '{}' discarded successfully.", name)))
    }

    fn rename_table(&mut self, old: &str, new: &str) -> Result<Option<String>, ExecError> {
        if !self.tables.contains(old) {
            return Err(ExecError::TableNotFound(old.to_string()));
        }
        if self.tables.contains(new) {
            return Err(ExecError::TableExists(new.to_string()));
        }
        self.tables.rename(old, new);
        Ok(Some(format!(
            "Table '{}' renamed to '{}' successfully.",
            old, new
        )))
    }

    fn print_table(&self, name: &str) -> Result<Option<String>, ExecError> {
        let table = self
            .tables
            .get(name)
            .ok_or_else(|| ExecError::TableNotFound(name.to_string()))?;
        Ok(Some(output::render_table(table.header(), table.rows())))
    }

    fn select(
        &self,
        columns: &SelectList,
        name: &str,
        condition: Option<&Condition>,
        limit: Option<i64>,
    ) -> Result<Option<String>, ExecError> {
        let table = self
            .tables
            .get(name)
            .ok_or_else(|| ExecError::TableNotFound(name.to_string()))?;
        let result = select_from(table, name, columns, condition, limit)?;
        Ok(Some(output::render_table(result.header(), result.rows())))
    }

    fn create_select(
        &mut self,
        new_name: &str,
        columns: &SelectList,
        source: &str,
        condition: Option<&Condition>,
    ) -> Result<Option<String>, ExecError> {
        let table = self
            .tables
            .get(source)
            .ok_or_else(|| ExecError::TableNotFound(source.to_string()))?;
        if self.tables.contains(new_name) {
            return Err(ExecError::TableExists(new_name.to_string()));
        }
        let result = select_from(table, source, columns, condition, None)?;
        self.tables.insert(new_name.to_string(), result);
        Ok(Some(format!("Table '{}' created successfully.", new_name)))
    }

    fn create_join(
        &mut self,
        new_name: &str,
        left: &str,
        right: &str,
        using: &str,
    ) -> Result<Option<String>, ExecError> {
        let t1 = self
            .tables
            .get(left)
            .ok_or_else(|| ExecError::TableNotFound(left.to_string()))?;
        let t2 = self
            .tables
            .get(right)
            .ok_or_else(|| ExecError::TableNotFound(right.to_string()))?;
        if self.tables.contains(new_name) {
            return Err(ExecError::TableExists(new_name.to_string()));
        }
        if t1.column_index(using).is_none() {
            return Err(ExecError::ColumnNotFound {
                column: using.to_string(),
                table: left.to_string(),
            });
        }
        if t2.column_index(using).is_none() {
            return Err(ExecError::ColumnNotFound {
                column: using.to_string(),
                table: right.to_string(),
            });
        }
        let joined = join(t1, t2, using);
        self.tables.insert(new_name.to_string(), joined);
        Ok(Some(format!(
            "Table '{}' created by joining '{}' and '{}' on '{}'.",
            new_name, left, right, using
        )))
    }

    fn define_procedure(
        &mut self,
        name: &str,
        body: &[Command],
    ) -> Result<Option<String>, ExecError> {
        // no existence check: redefinition overwrites
        self.procedures.insert(name.to_string(), body.to_vec());
        Ok(Some(format!("Procedure '{}' defined successfully.", name)))
    }

    /// Unlike a top-level batch, a procedure runs every member command:
    /// each member's result (or error) is printed to the output sink as a
    /// side effect and execution continues with the next member.
    fn call_procedure(&mut self, name: &str) -> Result<Option<String>, ExecError> {
        let body = match self.procedures.get(name) {
            Some(body) => body.clone(),
            None => return Err(ExecError::ProcedureNotFound(name.to_string())),
        };
        for command in &body {
            match self.execute(command) {
                Ok(Some(result)) => self.emit(&result)?,
                Ok(None) => {}
                Err(e) => self.emit(&e.to_string())?,
            }
        }
        Ok(Some(format!("Procedure '{}' executed successfully.", name)))
    }

    fn emit(&mut self, line: &str) -> Result<(), ExecError> {
        writeln!(self.out, "{}", line)
            .map_err(|e| ExecError::Io(format!("Error writing output: {}", e)))
    }
}

/// The shared SELECT pipeline: validate the projection columns, filter,
/// apply the limit, then project. Explicit column lists project in the
/// order named in the query; `*` keeps header order. A limit only applies
/// when positive.
fn select_from(
    table: &Table,
    table_name: &str,
    columns: &SelectList,
    condition: Option<&Condition>,
    limit: Option<i64>,
) -> Result<Table, ExecError> {
    if let SelectList::Columns(cols) = columns {
        for col in cols {
            if table.column_index(col).is_none() {
                return Err(ExecError::ColumnNotFound {
                    column: col.clone(),
                    table: table_name.to_string(),
                });
            }
        }
    }

    let mut filtered = match condition {
        Some(cond) => filter_rows(table.rows(), table.header(), cond),
        None => table.rows().to_vec(),
    };
    if let Some(limit) = limit {
        if limit > 0 {
            filtered.truncate(limit as usize);
        }
    }

    match columns {
        SelectList::All => Ok(Table::new(table.header().to_vec(), filtered)),
        SelectList::Columns(cols) => {
            let indices: Vec<usize> = cols
                .iter()
                .map(|c| table.column_index(c).unwrap())
                .collect();
            let rows = filtered
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect();
            Ok(Table::new(cols.clone(), rows))
        }
    }
}

#[cfg(test)]
impl Interpreter {
    fn seed(&mut self, name: &str, header: &[&str], rows: &[&[&str]]) {
        let table = Table::new(
            header.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        );
        self.tables.insert(name.to_string(), table);
    }

    fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }
}
