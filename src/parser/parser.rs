// Copyright 2022 Asen Lazarov

use std::error::Error;
use std::fmt;

use crate::lexer::{Scanner, Token, TokenKind};
use crate::parser::ast::*;

/// A syntax error aborts the whole parse call: no partial command list is
/// ever produced, unlike the scanner which skips and keeps going.
#[derive(Debug, Clone)]
pub struct SyntaxError(String);

impl SyntaxError {
    fn unexpected(tok: &Token, expected: &str) -> SyntaxError {
        SyntaxError(format!(
            "at '{}', line {}: expected {}",
            tok.kind, tok.line, expected
        ))
    }

    fn eof(expected: &str) -> SyntaxError {
        SyntaxError(format!("at end of input: expected {}", expected))
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Syntax error {}", self.0)
    }
}

impl Error for SyntaxError {}

/// Tokenize and parse a whole program: one or more commands, in source
/// order.
pub fn parse_program(input: &str) -> Result<Vec<Command>, SyntaxError> {
    Parser::new(Scanner::tokenize(input)).parse()
}

/// Recursive-descent parser over the token stream.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Parser {
        Parser { tokens, pos: 0 }
    }

    pub fn parse(mut self) -> Result<Vec<Command>, SyntaxError> {
        // program := command+
        let mut commands = vec![self.command()?];
        while !self.at_end() {
            commands.push(self.command()?);
        }
        Ok(commands)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn bump(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Consume a token that must be exactly `kind` (keywords/punctuation).
    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), SyntaxError> {
        match self.peek() {
            None => Err(SyntaxError::eof(what)),
            Some(tok) if tok.kind == kind => {
                self.pos += 1;
                Ok(())
            }
            Some(tok) => Err(SyntaxError::unexpected(tok, what)),
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, SyntaxError> {
        match self.peek() {
            None => Err(SyntaxError::eof(what)),
            Some(tok) => {
                if let TokenKind::Ident(name) = &tok.kind {
                    let name = name.clone();
                    self.pos += 1;
                    Ok(name)
                } else {
                    Err(SyntaxError::unexpected(tok, what))
                }
            }
        }
    }

    fn expect_string(&mut self, what: &str) -> Result<String, SyntaxError> {
        match self.peek() {
            None => Err(SyntaxError::eof(what)),
            Some(tok) => {
                if let TokenKind::Str(s) = &tok.kind {
                    let s = s.clone();
                    self.pos += 1;
                    Ok(s)
                } else {
                    Err(SyntaxError::unexpected(tok, what))
                }
            }
        }
    }

    fn expect_number(&mut self, what: &str) -> Result<i64, SyntaxError> {
        match self.peek() {
            None => Err(SyntaxError::eof(what)),
            Some(tok) => {
                if let TokenKind::Number(n) = tok.kind {
                    self.pos += 1;
                    Ok(n)
                } else {
                    Err(SyntaxError::unexpected(tok, what))
                }
            }
        }
    }

    fn command(&mut self) -> Result<Command, SyntaxError> {
        match self.peek_kind() {
            None => Err(SyntaxError::eof("a command")),
            Some(TokenKind::Import) => self.import_command(),
            Some(TokenKind::Export) => self.export_command(),
            Some(TokenKind::Discard) => self.discard_command(),
            Some(TokenKind::Rename) => self.rename_command(),
            Some(TokenKind::Print) => self.print_command(),
            Some(TokenKind::Select) => self.select_command(),
            Some(TokenKind::Create) => self.create_command(),
            Some(TokenKind::Procedure) => self.procedure_command(),
            Some(TokenKind::Call) => self.call_command(),
            Some(_) => Err(SyntaxError::unexpected(self.peek().unwrap(), "a command")),
        }
    }

    // import := IMPORT TABLE id FROM string
    fn import_command(&mut self) -> Result<Command, SyntaxError> {
        self.bump();
        self.expect(TokenKind::Table, "TABLE")?;
        let table = self.expect_ident("a table name")?;
        self.expect(TokenKind::From, "FROM")?;
        let file = self.expect_string("a quoted file name")?;
        Ok(Command::Import { table, file })
    }

    // export := EXPORT TABLE id AS string
    fn export_command(&mut self) -> Result<Command, SyntaxError> {
        self.bump();
        self.expect(TokenKind::Table, "TABLE")?;
        let table = self.expect_ident("a table name")?;
        self.expect(TokenKind::As, "AS")?;
        let file = self.expect_string("a quoted file name")?;
        Ok(Command::Export { table, file })
    }

    // discard := DISCARD TABLE id
    fn discard_command(&mut self) -> Result<Command, SyntaxError> {
        self.bump();
        self.expect(TokenKind::Table, "TABLE")?;
        let table = self.expect_ident("a table name")?;
        Ok(Command::Discard { table })
    }

    // rename := RENAME TABLE id id
    fn rename_command(&mut self) -> Result<Command, SyntaxError> {
        self.bump();
        self.expect(TokenKind::Table, "TABLE")?;
        let old = self.expect_ident("the current table name")?;
        let new = self.expect_ident("the new table name")?;
        Ok(Command::Rename { old, new })
    }

    // print := PRINT TABLE id
    fn print_command(&mut self) -> Result<Command, SyntaxError> {
        self.bump();
        self.expect(TokenKind::Table, "TABLE")?;
        let table = self.expect_ident("a table name")?;
        Ok(Command::Print { table })
    }

    // select := SELECT select_list FROM id [WHERE condition] [LIMIT number]
    // WHERE and LIMIT are independently optional but fixed-order.
    fn select_command(&mut self) -> Result<Command, SyntaxError> {
        self.bump();
        let columns = self.select_list()?;
        self.expect(TokenKind::From, "FROM")?;
        let table = self.expect_ident("a table name")?;
        let condition = if self.peek_kind() == Some(&TokenKind::Where) {
            self.bump();
            Some(self.condition()?)
        } else {
            None
        };
        let limit = if self.peek_kind() == Some(&TokenKind::Limit) {
            self.bump();
            Some(self.expect_number("a row limit")?)
        } else {
            None
        };
        Ok(Command::Select {
            columns,
            table,
            condition,
            limit,
        })
    }

    // create_select := CREATE TABLE id SELECT select_list FROM id [WHERE condition]
    // create_join   := CREATE TABLE id FROM id JOIN id USING id
    fn create_command(&mut self) -> Result<Command, SyntaxError> {
        self.bump();
        self.expect(TokenKind::Table, "TABLE")?;
        let table = self.expect_ident("a table name")?;
        match self.peek_kind() {
            Some(TokenKind::Select) => {
                self.bump();
                let columns = self.select_list()?;
                self.expect(TokenKind::From, "FROM")?;
                let source = self.expect_ident("a table name")?;
                let condition = if self.peek_kind() == Some(&TokenKind::Where) {
                    self.bump();
                    Some(self.condition()?)
                } else {
                    None
                };
                Ok(Command::CreateSelect {
                    table,
                    columns,
                    source,
                    condition,
                })
            }
            Some(TokenKind::From) => {
                self.bump();
                let left = self.expect_ident("a table name")?;
                self.expect(TokenKind::Join, "JOIN")?;
                let right = self.expect_ident("a table name")?;
                self.expect(TokenKind::Using, "USING")?;
                let using = self.expect_ident("a join column")?;
                Ok(Command::CreateJoin {
                    table,
                    left,
                    right,
                    using,
                })
            }
            Some(_) => Err(SyntaxError::unexpected(
                self.peek().unwrap(),
                "SELECT or FROM",
            )),
            None => Err(SyntaxError::eof("SELECT or FROM")),
        }
    }

    // procedure_def := PROCEDURE id DO command+ END
    fn procedure_command(&mut self) -> Result<Command, SyntaxError> {
        self.bump();
        let name = self.expect_ident("a procedure name")?;
        self.expect(TokenKind::Do, "DO")?;
        let mut body = vec![self.command()?];
        loop {
            match self.peek_kind() {
                None => return Err(SyntaxError::eof("END")),
                Some(TokenKind::End) => {
                    self.bump();
                    break;
                }
                Some(_) => body.push(self.command()?),
            }
        }
        Ok(Command::Procedure { name, body })
    }

    // call := CALL id
    fn call_command(&mut self) -> Result<Command, SyntaxError> {
        self.bump();
        let name = self.expect_ident("a procedure name")?;
        Ok(Command::Call { name })
    }

    // select_list := '*' | id (',' id)*
    fn select_list(&mut self) -> Result<SelectList, SyntaxError> {
        if self.peek_kind() == Some(&TokenKind::Asterisk) {
            self.bump();
            return Ok(SelectList::All);
        }
        let mut columns = vec![self.expect_ident("a column name or '*'")?];
        while self.peek_kind() == Some(&TokenKind::Comma) {
            self.bump();
            columns.push(self.expect_ident("a column name")?);
        }
        Ok(SelectList::Columns(columns))
    }

    // condition := comparison (AND comparison)*
    // The grammar's one ambiguity (condition AND condition) is resolved by
    // folding left-associatively, so conjunctions evaluate as a left-to-right
    // chain of narrowing filters.
    fn condition(&mut self) -> Result<Condition, SyntaxError> {
        let mut cond = self.comparison()?;
        while self.peek_kind() == Some(&TokenKind::And) {
            self.bump();
            let rhs = self.comparison()?;
            cond = Condition::And(Box::new(cond), Box::new(rhs));
        }
        Ok(cond)
    }

    // comparison := id comparator value
    fn comparison(&mut self) -> Result<Condition, SyntaxError> {
        let column = self.expect_ident("a column name")?;
        let op = match self.peek() {
            None => return Err(SyntaxError::eof("a comparison operator")),
            Some(tok) => match tok.kind {
                TokenKind::Equals => CompareOp::Eq,
                TokenKind::NotEquals => CompareOp::Ne,
                TokenKind::LessThan => CompareOp::Lt,
                TokenKind::GreaterThan => CompareOp::Gt,
                TokenKind::LessEquals => CompareOp::Le,
                TokenKind::GreaterEquals => CompareOp::Ge,
                _ => return Err(SyntaxError::unexpected(tok, "a comparison operator")),
            },
        };
        self.bump();
        let value = match self.bump() {
            None => return Err(SyntaxError::eof("a value")),
            Some(tok) => match &tok.kind {
                TokenKind::Ident(s) => CompareValue::Text(s.clone()),
                TokenKind::Str(s) => CompareValue::Text(s.clone()),
                TokenKind::Number(n) => CompareValue::Number(*n),
                _ => return Err(SyntaxError::unexpected(tok, "a value")),
            },
        };
        Ok(Condition::Compare { column, op, value })
    }
}
