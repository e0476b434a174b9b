use super::token::{Token, TokenKind};
use crate::error::{Error, Result};

/// Scanning position, saved and restored around lookahead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    /// Index into the source characters
    pos: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
}

impl Cursor {
    fn start() -> Self {
        Cursor {
            pos: 0,
            line: 1,
            column: 1,
        }
    }
}

/// On-demand scanner for minipas source text
///
/// Tokens are produced one at a time by [`Lexer::next_token`]; [`Lexer::peek`]
/// looks ahead without consuming input.
#[derive(Debug, Clone)]
pub struct Lexer {
    /// Source code as character vector
    source: Vec<char>,
    /// Current scanning position
    cursor: Cursor,
    /// Set once the iterator has yielded `Eof` or an error
    exhausted: bool,
}

impl Lexer {
    /// Creates a lexer over newline-stripped source lines
    ///
    /// Line boundaries are treated as whitespace.
    pub fn new<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut source = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                source.push('\n');
            }
            source.extend(line.as_ref().chars());
        }
        Lexer {
            source,
            cursor: Cursor::start(),
            exhausted: false,
        }
    }

    /// Creates a lexer over a single source string
    pub fn from_source(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            cursor: Cursor::start(),
            exhausted: false,
        }
    }

    /// Scans and consumes the next token, returning `Eof` once input is exhausted
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;

        let start = self.cursor;
        let c = match self.advance() {
            Some(c) => c,
            None => {
                return Ok(Token::new(
                    TokenKind::Eof,
                    String::new(),
                    start.line,
                    start.column,
                ))
            }
        };

        let kind = match c {
            c if c.is_ascii_digit() => return self.scan_number(start),
            c if c.is_ascii_alphabetic() => return Ok(self.scan_identifier_or_keyword(start)),

            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Multiply,
            '/' => TokenKind::Divide,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ';' => TokenKind::Semi,
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,

            // Two-character operators; some leads degrade to a single-character token
            ':' => {
                if self.match_char('=') {
                    TokenKind::Assign
                } else {
                    TokenKind::Colon
                }
            }
            '!' => {
                if self.match_char('=') {
                    TokenKind::NotEqual
                } else {
                    TokenKind::Not
                }
            }
            '<' => {
                if self.match_char('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.match_char('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            '=' if self.match_char('=') => TokenKind::Equal,
            '&' if self.match_char('&') => TokenKind::And,
            '|' if self.match_char('|') => TokenKind::Or,

            _ => {
                return Err(Error::InvalidCharacter {
                    ch: c,
                    line: start.line,
                    column: start.column,
                });
            }
        };

        Ok(self.make_token(kind, start))
    }

    /// Returns the `count`-th upcoming token (1 = next) without consuming input
    ///
    /// The scanning position is restored whether or not the lookahead succeeds.
    pub fn peek(&mut self, count: usize) -> Result<Token> {
        let saved = self.cursor;
        let result = self.scan_ahead(count.max(1));
        self.cursor = saved;
        result
    }

    /// Scans the remaining input into a vector ending with `Eof`
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        self.by_ref().collect()
    }

    fn scan_ahead(&mut self, count: usize) -> Result<Token> {
        let mut token = self.next_token()?;
        for _ in 1..count {
            if token.kind == TokenKind::Eof {
                return Err(Error::PeekPastEnd { count });
            }
            token = self.next_token()?;
        }
        Ok(token)
    }

    /// Skips whitespace and `{ ... }` comments
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.current_char() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('{') => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_comment(&mut self) -> Result<()> {
        let open = self.cursor;
        self.advance(); // Opening {
        loop {
            match self.advance() {
                Some('}') => return Ok(()),
                Some(_) => {}
                None => {
                    return Err(Error::UnterminatedComment {
                        line: open.line,
                        column: open.column,
                    })
                }
            }
        }
    }

    fn scan_number(&mut self, start: Cursor) -> Result<Token> {
        while matches!(self.current_char(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }

        let text = self.text_from(start);
        let value: i64 = text.parse().map_err(|_| Error::InvalidInteger {
            text: text.clone(),
            line: start.line,
            column: start.column,
        })?;

        Ok(Token::new(
            TokenKind::IntegerConst(value),
            text,
            start.line,
            start.column,
        ))
    }

    fn scan_identifier_or_keyword(&mut self, start: Cursor) -> Token {
        while matches!(self.current_char(), Some(c) if c.is_ascii_alphanumeric()) {
            self.advance();
        }

        let text = self.text_from(start);
        let kind = match TokenKind::keyword(&text) {
            Some(keyword) => keyword,
            None => TokenKind::Identifier(text.clone()),
        };
        tracing::trace!(lexeme = %text, keyword = kind.is_keyword(), "scanned word");

        Token::new(kind, text, start.line, start.column)
    }

    fn current_char(&self) -> Option<char> {
        self.source.get(self.cursor.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current_char()?;
        self.cursor.pos += 1;
        if c == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 1;
        } else {
            self.cursor.column += 1;
        }
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.current_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn text_from(&self, start: Cursor) -> String {
        self.source[start.pos..self.cursor.pos].iter().collect()
    }

    fn make_token(&self, kind: TokenKind, start: Cursor) -> Token {
        Token::new(kind, self.text_from(start), start.line, start.column)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token>;

    /// Yields every token through `Eof`, then stops; also stops after the first error
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(token) if token.kind == TokenKind::Eof => self.exhausted = true,
            Err(_) => self.exhausted = true,
            Ok(_) => {}
        }
        Some(result)
    }
}
