use std::error::Error;
use std::fmt;

/// A command precondition failure or I/O failure. Each variant keeps the
/// failure machine-checkable; `Display` renders the human message that a
/// driver prints in place of a success message.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecError {
    TableNotFound(String),
    TableExists(String),
    ColumnNotFound { column: String, table: String },
    ProcedureNotFound(String),
    Io(String),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExecError::TableNotFound(name) => {
                write!(f, "Error: Table '{}' does not exist.", name)
            }
            ExecError::TableExists(name) => {
                write!(f, "Error: Table '{}' already exists.", name)
            }
            ExecError::ColumnNotFound { column, table } => {
                write!(
                    f,
                    "Error: Column '{}' does not exist in table '{}'.",
                    column, table
                )
            }
            ExecError::ProcedureNotFound(name) => {
                write!(f, "Error: Procedure '{}' does not exist.", name)
            }
            ExecError::Io(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error for ExecError {}
