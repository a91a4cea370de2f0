//! The command AST produced by one parse call: one [`Command`] per
//! statement, in source order. Procedure bodies nest further commands and
//! are stored as parsed, never re-parsed at CALL time.

/// The six comparison operators of the `condition` grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

/// Right-hand side of a comparison: a bare identifier or quoted string
/// (both plain text) or an integer literal. Cells are untyped text, so a
/// number still compares through its string rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum CompareValue {
    Text(String),
    Number(i64),
}

impl CompareValue {
    pub fn to_text(&self) -> String {
        match self {
            CompareValue::Text(s) => s.clone(),
            CompareValue::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        column: String,
        op: CompareOp,
        value: CompareValue,
    },
    /// Left-associative conjunction: `a AND b AND c` parses as
    /// `And(And(a, b), c)`.
    And(Box<Condition>, Box<Condition>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectList {
    /// `*`: all columns, in header order.
    All,
    /// Explicit columns, projected in the order named here.
    Columns(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Import {
        table: String,
        file: String,
    },
    Export {
        table: String,
        file: String,
    },
    Discard {
        table: String,
    },
    Rename {
        old: String,
        new: String,
    },
    Print {
        table: String,
    },
    Select {
        columns: SelectList,
        table: String,
        condition: Option<Condition>,
        limit: Option<i64>,
    },
    CreateSelect {
        table: String,
        columns: SelectList,
        source: String,
        condition: Option<Condition>,
    },
    CreateJoin {
        table: String,
        left: String,
        right: String,
        using: String,
    },
    Procedure {
        name: String,
        body: Vec<Command>,
    },
    Call {
        name: String,
    },
}
