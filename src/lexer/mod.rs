// Copyright 2022 Asen Lazarov

use std::fmt;

use log::warn;

/// What kind of token this is, carrying the literal payload where one exists.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Str(String),
    Number(i64),

    Asterisk,
    Comma,
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessEquals,
    GreaterEquals,

    Import,
    Table,
    From,
    Export,
    As,
    Discard,
    Rename,
    Print,
    Select,
    Where,
    Limit,
    Create,
    Join,
    Using,
    Procedure,
    Do,
    End,
    Call,
    And,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Ident(s) => write!(f, "{}", s),
            TokenKind::Str(s) => write!(f, "\"{}\"", s),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Asterisk => write!(f, "*"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Equals => write!(f, "="),
            TokenKind::NotEquals => write!(f, "<>"),
            TokenKind::LessThan => write!(f, "<"),
            TokenKind::GreaterThan => write!(f, ">"),
            TokenKind::LessEquals => write!(f, "<="),
            TokenKind::GreaterEquals => write!(f, ">="),
            TokenKind::Import => write!(f, "import"),
            TokenKind::Table => write!(f, "table"),
            TokenKind::From => write!(f, "from"),
            TokenKind::Export => write!(f, "export"),
            TokenKind::As => write!(f, "as"),
            TokenKind::Discard => write!(f, "discard"),
            TokenKind::Rename => write!(f, "rename"),
            TokenKind::Print => write!(f, "print"),
            TokenKind::Select => write!(f, "select"),
            TokenKind::Where => write!(f, "where"),
            TokenKind::Limit => write!(f, "limit"),
            TokenKind::Create => write!(f, "create"),
            TokenKind::Join => write!(f, "join"),
            TokenKind::Using => write!(f, "using"),
            TokenKind::Procedure => write!(f, "procedure"),
            TokenKind::Do => write!(f, "do"),
            TokenKind::End => write!(f, "end"),
            TokenKind::Call => write!(f, "call"),
            TokenKind::And => write!(f, "and"),
        }
    }
}

/// A single token plus the source line it started on (1-based).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize) -> Token {
        Token { kind, line }
    }
}

fn keyword_kind(word: &str) -> Option<TokenKind> {
    // `word` is already lowercased by the caller
    match word {
        "import" => Some(TokenKind::Import),
        "table" => Some(TokenKind::Table),
        "from" => Some(TokenKind::From),
        "export" => Some(TokenKind::Export),
        "as" => Some(TokenKind::As),
        "discard" => Some(TokenKind::Discard),
        "rename" => Some(TokenKind::Rename),
        "print" => Some(TokenKind::Print),
        "select" => Some(TokenKind::Select),
        "where" => Some(TokenKind::Where),
        "limit" => Some(TokenKind::Limit),
        "create" => Some(TokenKind::Create),
        "join" => Some(TokenKind::Join),
        "using" => Some(TokenKind::Using),
        "procedure" => Some(TokenKind::Procedure),
        "do" => Some(TokenKind::Do),
        "end" => Some(TokenKind::End),
        "call" => Some(TokenKind::Call),
        "and" => Some(TokenKind::And),
        _ => None,
    }
}

/// A lazy tokenizer over CQL source text.
///
/// Yields [`Token`]s one at a time via [`Iterator`]. Whitespace, `--` line
/// comments, `{- ... -}` block comments and stray `;` separators carry no
/// tokens. An unrecognized character is logged with its line number and
/// skipped, and scanning resumes at the next character.
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Scanner<'a> {
        Scanner {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    /// Tokenize the whole input eagerly.
    pub fn tokenize(input: &str) -> Vec<Token> {
        Scanner::new(input).collect()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let ch = self.input.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
        }
        Some(ch)
    }

    /// Skip everything that carries no token: whitespace, newlines, both
    /// comment forms, and `;` statement separators.
    fn skip_insignificant(&mut self) {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') | Some(b';') => {
                    self.bump();
                }
                Some(b'-') if self.peek_at(1) == Some(b'-') => {
                    // line comment, up to but not including the newline
                    self.pos += 2;
                    while let Some(ch) = self.peek() {
                        if ch == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(b'{') if self.peek_at(1) == Some(b'-') => {
                    self.skip_block_comment();
                }
                _ => break,
            }
        }
    }

    /// Consume a `{- ... -}` block comment, non-greedy to the nearest `-}`.
    /// Embedded newlines still advance the line counter.
    fn skip_block_comment(&mut self) {
        let start_line = self.line;
        self.pos += 2;
        loop {
            match self.peek() {
                None => {
                    warn!("unterminated block comment starting at line {}", start_line);
                    break;
                }
                Some(b'-') if self.peek_at(1) == Some(b'}') => {
                    self.pos += 2;
                    break;
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn read_string(&mut self) -> Option<TokenKind> {
        // no escape processing: the literal is everything between the quotes
        let mut end = self.pos + 1;
        while end < self.input.len() && self.input[end] != b'"' {
            end += 1;
        }
        if end >= self.input.len() {
            warn!("unterminated string literal at line {}", self.line);
            self.pos += 1; // skip the quote, rescan the rest
            return None;
        }
        let text = String::from_utf8_lossy(&self.input[self.pos + 1..end]).into_owned();
        while self.pos <= end {
            self.bump();
        }
        Some(TokenKind::Str(text))
    }

    fn read_number(&mut self) -> Option<TokenKind> {
        let start = self.pos;
        let line = self.line;
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.input[start..self.pos]).unwrap();
        match text.parse::<i64>() {
            Ok(n) => Some(TokenKind::Number(n)),
            Err(_) => {
                warn!("integer literal '{}' out of range at line {}", text, line);
                None
            }
        }
    }

    fn read_word(&mut self) -> TokenKind {
        let start = self.pos;
        while self
            .peek()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.pos += 1;
        }
        let word = std::str::from_utf8(&self.input[start..self.pos]).unwrap();
        match keyword_kind(&word.to_ascii_lowercase()) {
            Some(kw) => kw,
            None => TokenKind::Ident(word.to_string()),
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            self.skip_insignificant();
            let ch = self.peek()?;
            let line = self.line;

            if ch == b'"' {
                match self.read_string() {
                    Some(kind) => return Some(Token::new(kind, line)),
                    None => continue,
                }
            }
            if ch.is_ascii_digit() {
                match self.read_number() {
                    Some(kind) => return Some(Token::new(kind, line)),
                    None => continue,
                }
            }
            if ch.is_ascii_alphabetic() || ch == b'_' {
                return Some(Token::new(self.read_word(), line));
            }

            let kind = match ch {
                b'*' => Some(TokenKind::Asterisk),
                b',' => Some(TokenKind::Comma),
                b'=' => Some(TokenKind::Equals),
                // two-character operators take priority over bare < and >
                b'<' if self.peek_at(1) == Some(b'>') => {
                    self.pos += 1;
                    Some(TokenKind::NotEquals)
                }
                b'<' if self.peek_at(1) == Some(b'=') => {
                    self.pos += 1;
                    Some(TokenKind::LessEquals)
                }
                b'<' => Some(TokenKind::LessThan),
                b'>' if self.peek_at(1) == Some(b'=') => {
                    self.pos += 1;
                    Some(TokenKind::GreaterEquals)
                }
                b'>' => Some(TokenKind::GreaterThan),
                _ => None,
            };
            self.pos += 1;
            match kind {
                Some(kind) => return Some(Token::new(kind, line)),
                None => {
                    warn!("illegal character '{}' at line {}", ch as char, line);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<TokenKind> {
        Scanner::tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            lex("IMPORT import Import iMpOrT"),
            vec![
                TokenKind::Import,
                TokenKind::Import,
                TokenKind::Import,
                TokenKind::Import
            ]
        );
    }

    #[test]
    fn identifiers_and_keywords() {
        assert_eq!(
            lex("select col_1 from observacoes"),
            vec![
                TokenKind::Select,
                TokenKind::Ident("col_1".to_string()),
                TokenKind::From,
                TokenKind::Ident("observacoes".to_string()),
            ]
        );
    }

    #[test]
    fn maximal_munch_two_char_operators() {
        // `<=` is always one token, never `<` followed by `=`
        assert_eq!(lex("<="), vec![TokenKind::LessEquals]);
        assert_eq!(lex(">="), vec![TokenKind::GreaterEquals]);
        assert_eq!(lex("<>"), vec![TokenKind::NotEquals]);
        assert_eq!(
            lex("< > = <> <= >="),
            vec![
                TokenKind::LessThan,
                TokenKind::GreaterThan,
                TokenKind::Equals,
                TokenKind::NotEquals,
                TokenKind::LessEquals,
                TokenKind::GreaterEquals,
            ]
        );
    }

    #[test]
    fn string_literal_strips_quotes_no_escapes() {
        assert_eq!(
            lex("\"estacoes.csv\""),
            vec![TokenKind::Str("estacoes.csv".to_string())]
        );
        // commas and spaces inside quotes are part of the literal
        assert_eq!(
            lex("\"a, b -- c\""),
            vec![TokenKind::Str("a, b -- c".to_string())]
        );
    }

    #[test]
    fn number_literal() {
        assert_eq!(lex("42 0 007"), vec![
            TokenKind::Number(42),
            TokenKind::Number(0),
            TokenKind::Number(7),
        ]);
    }

    #[test]
    fn line_comment_is_discarded() {
        assert_eq!(
            lex("-- a comment\nselect"),
            vec![TokenKind::Select]
        );
    }

    #[test]
    fn block_comment_spans_lines_and_counts_them() {
        let tokens = Scanner::tokenize("{- multi\nline\ncomment -}\nprint");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Print);
        assert_eq!(tokens[0].line, 4);
    }

    #[test]
    fn block_comment_is_non_greedy() {
        assert_eq!(
            lex("{- first -} select {- second -}"),
            vec![TokenKind::Select]
        );
    }

    #[test]
    fn line_numbers_advance_on_newline_runs() {
        let tokens = Scanner::tokenize("import\n\n\ntable");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 4);
    }

    #[test]
    fn illegal_characters_are_skipped() {
        // scanning resumes at the next character
        assert_eq!(
            lex("select @ ? col"),
            vec![TokenKind::Select, TokenKind::Ident("col".to_string())]
        );
    }

    #[test]
    fn semicolon_is_an_ignorable_separator() {
        assert_eq!(
            lex("print table a; print table b;"),
            vec![
                TokenKind::Print,
                TokenKind::Table,
                TokenKind::Ident("a".to_string()),
                TokenKind::Print,
                TokenKind::Table,
                TokenKind::Ident("b".to_string()),
            ]
        );
    }

    #[test]
    fn full_statement() {
        assert_eq!(
            lex("SELECT * FROM observacoes WHERE Temperatura > 22;"),
            vec![
                TokenKind::Select,
                TokenKind::Asterisk,
                TokenKind::From,
                TokenKind::Ident("observacoes".to_string()),
                TokenKind::Where,
                TokenKind::Ident("Temperatura".to_string()),
                TokenKind::GreaterThan,
                TokenKind::Number(22),
            ]
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(Scanner::tokenize("").is_empty());
        assert!(Scanner::tokenize("  \t\n").is_empty());
    }

    #[test]
    fn retokenizing_rendered_tokens_is_stable() {
        let src = "create table t select a, b from src where a >= \"x\" limit 3";
        let first = Scanner::tokenize(src);
        let rendered = first
            .iter()
            .map(|t| t.kind.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let second = Scanner::tokenize(&rendered);
        let kinds = |v: &[Token]| v.iter().map(|t| t.kind.clone()).collect::<Vec<_>>();
        assert_eq!(kinds(&first), kinds(&second));
    }
}
