use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    OpenParen,
    CloseParen,
    Dot,
    Quote,
    Number,
    Symbol,
}

/// A lexical token, borrowing its text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the token's first character.
    pub start: usize,
}

/// Malformed input. Records how far the parse got, for a "parsed up to here" diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub consumed: String,
    pub remaining: String,
}

impl ParseError {
    pub(crate) fn at(source: &str, position: usize) -> Self {
        let (consumed, remaining) = source.split_at(position);
        Self {
            consumed: consumed.to_owned(),
            remaining: remaining.to_owned(),
        }
    }

    /// Byte offset of the failure.
    pub fn position(&self) -> usize {
        self.consumed.len()
    }

    /// 1-based line and column of the failure.
    pub fn line_column(&self) -> (usize, usize) {
        let line = self.consumed.matches('\n').count() + 1;
        let last_line = self.consumed.rsplit('\n').next().unwrap_or("");
        (line, last_line.chars().count() + 1)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error: {}<here>{}", self.consumed, self.remaining)
    }
}

impl std::error::Error for ParseError {}

struct Rule {
    kind: TokenKind,
    pattern: Regex,
    // The match must be followed by a boundary character or the end of input.
    needs_boundary: bool,
}

impl Rule {
    fn new(kind: TokenKind, pattern: &str, needs_boundary: bool) -> Self {
        Self {
            kind,
            pattern: Regex::new(pattern).unwrap(),
            needs_boundary,
        }
    }
}

lazy_static! {
    // Tried in order; the first acceptable match wins.
    static ref RULES: Vec<Rule> = vec![
        Rule::new(TokenKind::OpenParen, r"^\(", false),
        Rule::new(TokenKind::CloseParen, r"^\)", false),
        Rule::new(TokenKind::Dot, r"^\.", true),
        Rule::new(TokenKind::Quote, r"^'", false),
        Rule::new(TokenKind::Number, r"^-?(?:\.[0-9]+|[0-9]+\.[0-9]*|[0-9]+)", true),
        Rule::new(TokenKind::Symbol, r"^[^\s();]+", true),
    ];
    static ref BLANK: Regex = Regex::new(
        r#"(?x)
            ^(?:
                \s+     # whitespace
                |;.*    # comment, up to the end of the line
            )*
        "#
    )
    .unwrap();
}

fn at_boundary(rest: &str) -> bool {
    match rest.chars().next() {
        None => true,
        Some(c) => c.is_whitespace() || c == '(' || c == ')' || c == ';',
    }
}

/// Lazily splits source text into tokens, skipping whitespace and comments.
pub struct Tokenizer<'a> {
    source: &'a str,
    cursor: usize,
    pushed_back: Option<Token<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: 0,
            pushed_back: None,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Byte offset of the first input not yet handed out. A pushed-back token counts as unread.
    pub fn position(&self) -> usize {
        match &self.pushed_back {
            Some(token) => token.start,
            None => self.cursor,
        }
    }

    /// An error pointing at the current position.
    pub fn error(&self) -> ParseError {
        ParseError::at(self.source, self.position())
    }

    pub fn skip_blank(&mut self) {
        if self.pushed_back.is_some() {
            return;
        }
        if let Some(blank) = BLANK.find(&self.source[self.cursor..]) {
            self.cursor += blank.end();
        }
    }

    /// True once nothing but whitespace and comments is left.
    pub fn is_exhausted(&mut self) -> bool {
        self.skip_blank();
        self.pushed_back.is_none() && self.cursor == self.source.len()
    }

    /// Read the next token, or `None` at the end of input.
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        if let Some(token) = self.pushed_back.take() {
            log::trace!("re-read {:?}", token);
            return Ok(Some(token));
        }

        self.skip_blank();
        let rest: &'a str = &self.source[self.cursor..];
        if rest.is_empty() {
            return Ok(None);
        }

        for rule in RULES.iter() {
            let found = match rule.pattern.find(rest) {
                Some(found) => found,
                None => continue,
            };
            if rule.needs_boundary && !at_boundary(&rest[found.end()..]) {
                continue;
            }
            let token = Token {
                kind: rule.kind,
                text: found.as_str(),
                start: self.cursor,
            };
            self.cursor += found.end();
            log::trace!("token {:?}", token);
            return Ok(Some(token));
        }

        let err = self.error();
        log::debug!("no token rule matches: {}", err);
        Err(err)
    }

    /// Return `token` to the front of the stream. Only one token can be pushed back at a time.
    pub fn unread(&mut self, token: Token<'a>) {
        debug_assert!(
            self.pushed_back.is_none(),
            "tokenizer already holds a pushed-back token"
        );
        log::trace!("unread {:?}", token);
        self.pushed_back = Some(token);
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
