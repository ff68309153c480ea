//! Stone DSL lexer
//!
//! Splits asset text into flat string tokens. Whitespace and line ends
//! separate tokens, `//` comments out the rest of a line, `/* ... */` comments
//! out a span (no nesting), and a double quote switches into string mode
//! where everything up to the closing quote is kept verbatim, quotes included.
//!
//! The punctuation characters in [`is_single_char_token`] always form a token
//! of their own, even when glued to other text, so `1.5` lexes as `1` `.` `5`.

use super::error::ParseError;

/// A lexed token with the 1-based line on which it was completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub line: usize,
}

fn is_single_char_token(c: char) -> bool {
    matches!(
        c,
        '{' | '}' | '(' | ')' | '[' | ']' | ',' | ';' | ':' | '=' | '+' | '-' | '*' | '/' | '%' | '.'
    )
}

struct Lexer {
    tokens: Vec<Token>,
    pending: String,
    pending_line: usize,
    in_comment: bool,
    in_string: bool,
    comment_line: usize,
}

impl Lexer {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            pending: String::new(),
            pending_line: 0,
            in_comment: false,
            in_string: false,
            comment_line: 0,
        }
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.tokens.push(Token {
                text: std::mem::take(&mut self.pending),
                line: self.pending_line,
            });
        }
    }

    fn push_char(&mut self, c: char, line: usize) {
        self.pending.push(c);
        self.pending_line = line;
    }

    fn lex_line(&mut self, text: &str, line: usize) {
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();

            if !self.in_comment && !self.in_string && c == '/' && next == Some('/') {
                self.flush();
                return;
            }
            if !self.in_comment && !self.in_string && c == '/' && next == Some('*') {
                self.flush();
                self.in_comment = true;
                self.comment_line = line;
                i += 2;
                continue;
            }
            // A comment terminator is consumed wherever it shows up.
            if c == '*' && next == Some('/') {
                self.in_comment = false;
                i += 2;
                continue;
            }
            if self.in_comment {
                i += 1;
                continue;
            }

            if c == '"' {
                if self.in_string {
                    self.push_char(c, line);
                    self.flush();
                    self.in_string = false;
                } else {
                    self.flush();
                    self.push_char(c, line);
                    self.in_string = true;
                }
            } else if self.in_string {
                self.push_char(c, line);
            } else if c.is_whitespace() {
                self.flush();
            } else if is_single_char_token(c) {
                self.flush();
                self.push_char(c, line);
                self.flush();
            } else {
                self.push_char(c, line);
            }
            i += 1;
        }

        if !self.in_string {
            self.flush();
        }
    }
}

/// Tokenize a complete asset source.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer::new();
    let mut last_line = 0;
    for (idx, text) in source.lines().enumerate() {
        last_line = idx + 1;
        lexer.lex_line(text, last_line);
    }

    if lexer.in_string {
        return Err(ParseError::new("unterminated string literal", lexer.pending_line));
    }
    if lexer.in_comment {
        return Err(ParseError::new(
            format!("unterminated block comment opened on line {}", lexer.comment_line),
            last_line,
        ));
    }
    Ok(lexer.tokens)
}
