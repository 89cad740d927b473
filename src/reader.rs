//! Recursive-descent reader from source text to [`Term`]s.

use crate::tokens::{ParseError, Token, TokenKind, Tokenizer};
use crate::types::{list_to_term, Symbol, Term, QUOTE};

pub type Result<T> = std::result::Result<T, ParseError>;

/// Reads terms one at a time from a source string.
///
/// Each reader owns its cursor; parse independent strings with independent readers.
pub struct Reader<'a> {
    tokens: Tokenizer<'a>,
}

impl<'a> Reader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            tokens: Tokenizer::new(source),
        }
    }

    /// Byte offset of the first unread input.
    pub fn position(&self) -> usize {
        self.tokens.position()
    }

    /// Read one term.
    ///
    /// Returns `Ok(None)` at the end of input, and also when the next token cannot start a term
    /// (a `)` or `.`). That token is pushed back so that an enclosing list can close on it.
    pub fn read_term(&mut self) -> Result<Option<Term>> {
        let token = match self.tokens.next_token()? {
            Some(token) => token,
            None => return Ok(None),
        };

        let term = match token.kind {
            TokenKind::Number => Term::Number(self.read_number(token)?),
            TokenKind::Symbol => read_symbol(token.text),
            TokenKind::Quote => {
                let quoted = self.expect_term()?;
                Term::list(vec![Term::symbol(QUOTE), quoted])
            }
            TokenKind::OpenParen => self.read_list()?,
            TokenKind::CloseParen | TokenKind::Dot => {
                self.tokens.unread(token);
                return Ok(None);
            }
        };
        Ok(Some(term))
    }

    /// Fail unless only whitespace and comments remain.
    pub fn ensure_empty(&mut self) -> Result<()> {
        match self.tokens.is_exhausted() {
            true => Ok(()),
            false => Err(self.tokens.error()),
        }
    }

    // Literals outside the f64 range are a parse error.
    fn read_number(&self, token: Token) -> Result<f64> {
        token
            .text
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| ParseError::at(self.tokens.source(), token.start))
    }

    // Called after the opening paren has been consumed.
    fn read_list(&mut self) -> Result<Term> {
        let mut elements = Vec::new();
        while let Some(term) = self.read_term()? {
            elements.push(term);
        }

        let mut tail = Term::Nil;
        let mut closing = self.expect_token()?;
        if closing.kind == TokenKind::Dot {
            tail = self.expect_term()?;
            closing = self.expect_token()?;
        }

        match closing.kind {
            TokenKind::CloseParen => Ok(list_to_term(elements, tail)),
            _ => {
                self.tokens.unread(closing);
                Err(self.tokens.error())
            }
        }
    }

    fn expect_term(&mut self) -> Result<Term> {
        match self.read_term()? {
            Some(term) => Ok(term),
            None => Err(self.tokens.error()),
        }
    }

    fn expect_token(&mut self) -> Result<Token<'a>> {
        match self.tokens.next_token()? {
            Some(token) => Ok(token),
            None => Err(self.tokens.error()),
        }
    }
}

fn read_symbol(text: &str) -> Term {
    let symbol = Symbol::new(text);
    match symbol.as_str() {
        "nil" => Term::Nil,
        _ => Term::Symbol(symbol),
    }
}

/// Yields top-level terms until the input runs out or a stray `)`/`.` is reached.
impl Iterator for Reader<'_> {
    type Item = Result<Term>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_term().transpose()
    }
}

fn logged<T>(result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        log::debug!("{}", e);
    }
    result
}

/// Parse a string holding a single term. Returns `None` if it holds only whitespace and comments.
pub fn parse(source: &str) -> Result<Option<Term>> {
    let mut reader = Reader::new(source);
    let term = logged(reader.read_term())?;
    logged(reader.ensure_empty())?;
    if let Some(term) = &term {
        log::debug!("read {}", term);
    }
    Ok(term)
}

/// Parse every top-level term in a string, in order.
pub fn read_all(source: &str) -> Result<Vec<Term>> {
    let mut reader = Reader::new(source);
    let terms = logged(reader.by_ref().collect::<Result<Vec<_>>>())?;
    logged(reader.ensure_empty())?;
    log::debug!("read {} terms", terms.len());
    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Term {
        Term::Number(n)
    }

    fn sym(name: &str) -> Term {
        Term::symbol(name)
    }

    fn read(input: &str) -> Term {
        parse(input)
            .unwrap_or_else(|e| panic!("{}", e))
            .expect("no term in input")
    }

    #[test]
    fn atoms() {
        assert_eq!(read("42"), num(42.0));
        assert_eq!(read("-1.5"), num(-1.5));
        assert_eq!(read("1."), num(1.0));
        assert_eq!(read(".25"), num(0.25));
        assert_eq!(read("foo"), sym("foo"));
        assert_eq!(read("12abc"), sym("12abc"));
    }

    #[test]
    fn nil_in_any_case() {
        for input in &["nil", "NIL", "Nil", "()", "( )", "(;empty\n)"] {
            assert_eq!(read(input), Term::Nil, "reading {:?}", input);
        }
    }

    #[test]
    fn proper_list() {
        assert_eq!(
            read("(1 2 3)"),
            Term::list(vec![num(1.0), num(2.0), num(3.0)])
        );
    }

    #[test]
    fn dotted_list() {
        assert_eq!(
            read("(1 2 . 3)"),
            Term::cons(num(1.0), Term::cons(num(2.0), num(3.0)))
        );
        assert_eq!(read("(a . (b . nil))"), Term::list(vec![sym("a"), sym("b")]));
        assert_eq!(read("(1 .5)"), Term::list(vec![num(1.0), num(0.5)]));
    }

    #[test]
    fn nested() {
        let expected = Term::list(vec![
            sym("define"),
            Term::list(vec![sym("f"), sym("x")]),
            Term::list(vec![sym("*"), sym("x"), Term::list(vec![])]),
        ]);
        assert_eq!(read("(DEFINE (f x)\n  (* x ()))"), expected);
    }

    #[test]
    fn quote_sugar() {
        assert_eq!(read("'a"), read("(quote a)"));
        assert_eq!(read("'(1 . 2)"), read("(quote (1 . 2))"));
        assert_eq!(read("''a"), read("(quote (quote a))"));
        assert_eq!(read("(a 'b)"), read("(a (quote b))"));
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   \n\t").unwrap(), None);
        assert_eq!(parse("; nothing here").unwrap(), None);
    }

    #[test]
    fn malformed() {
        for input in &[
            "(+ 1 2",
            "(",
            "'",
            "(')",
            "(1 . )",
            "(1 . 2 3)",
            "(1 . 2",
            "(1 .",
            ")",
            ".",
            "1 .",
            "1 2",
            "(a))",
        ] {
            assert!(parse(input).is_err(), "expected {:?} to be rejected", input);
        }
    }

    #[test]
    fn out_of_range_numbers() {
        let huge = "9".repeat(400);
        let err = parse(&huge).unwrap_err();
        assert_eq!(err.consumed, "");
        assert_eq!(err.remaining, huge);

        let err = parse(&format!("(1 -{})", huge)).unwrap_err();
        assert_eq!(err.consumed, "(1 ");

        let big = read(&"9".repeat(300)).as_number().unwrap();
        assert!(big.is_finite() && big > 9e298);
    }

    #[test]
    fn error_positions() {
        let err = parse("(+ 1 2").unwrap_err();
        assert_eq!(err.consumed, "(+ 1 2");
        assert_eq!(err.remaining, "");

        let err = parse("(1 . 2 3)").unwrap_err();
        assert_eq!(err.consumed, "(1 . 2 ");
        assert_eq!(err.remaining, "3)");

        let err = parse("(a) ; ok\n )").unwrap_err();
        assert_eq!(err.remaining, ")");
        assert_eq!(err.line_column(), (2, 2));

        let err = parse("'").unwrap_err();
        assert_eq!(err.consumed, "'");
    }

    #[test]
    fn reader_reads_forms_one_at_a_time() {
        let mut reader = Reader::new("1 (a b) ; comment\n 'c");
        assert_eq!(reader.read_term().unwrap(), Some(num(1.0)));
        assert_eq!(
            reader.read_term().unwrap(),
            Some(Term::list(vec![sym("a"), sym("b")]))
        );
        assert_eq!(reader.read_term().unwrap(), Some(read("(quote c)")));
        assert_eq!(reader.read_term().unwrap(), None);
        assert!(reader.ensure_empty().is_ok());
    }

    #[test]
    fn stray_close_paren_is_not_a_term() {
        let mut reader = Reader::new(") 1");
        assert_eq!(reader.read_term().unwrap(), None);
        assert_eq!(reader.position(), 0);
        assert!(reader.ensure_empty().is_err());
    }

    #[test]
    fn read_all_forms() {
        let terms = read_all("(a) b\n; c\n 3").unwrap();
        assert_eq!(
            terms,
            vec![Term::list(vec![sym("a")]), sym("b"), num(3.0)]
        );
        assert!(read_all("  ").unwrap().is_empty());
        assert!(read_all("a b)").is_err());
    }
}
