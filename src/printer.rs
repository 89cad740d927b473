use crate::types::Term;
use itertools::Itertools;
use std::fmt;

/// Renders surface syntax that reads back as an equal term (functions excepted).
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Number(value) => write!(f, "{}", value),
            Term::Symbol(name) => write!(f, "{}", name),
            Term::Nil => write!(f, "nil"),
            Term::Func(func) => write!(f, "#<builtin {}>", func.name()),
            Term::Cons(_) => {
                let mut elements = self.iter();
                write!(f, "({}", elements.join(" "))?;
                match elements.tail() {
                    Term::Nil => (),
                    tail => write!(f, " . {}", tail)?,
                }
                write!(f, ")")
            }
        }
    }
}

pub fn pr_str(term: &Term) -> String {
    term.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse;
    use crate::types::list_to_term;

    fn round_trip(input: &str) -> String {
        let term = parse(input).unwrap().unwrap();
        let printed = pr_str(&term);
        assert_eq!(parse(&printed).unwrap(), Some(term), "re-reading {:?}", printed);
        printed
    }

    #[test]
    fn atoms() {
        assert_eq!(pr_str(&Term::Number(3.0)), "3");
        assert_eq!(pr_str(&Term::Number(-0.5)), "-0.5");
        assert_eq!(pr_str(&Term::symbol("Foo")), "foo");
        assert_eq!(pr_str(&Term::Nil), "nil");
    }

    #[test]
    fn lists() {
        let improper = list_to_term(vec![Term::Number(1.0), Term::Number(2.0)], Term::t());
        assert_eq!(pr_str(&improper), "(1 2 . t)");
        assert_eq!(pr_str(&Term::cons(Term::Nil, Term::Nil)), "(nil)");
    }

    #[test]
    fn printed_terms_read_back() {
        assert_eq!(round_trip("(a b c)"), "(a b c)");
        assert_eq!(round_trip("(1 2 . 3)"), "(1 2 . 3)");
        assert_eq!(round_trip("'x"), "(quote x)");
        assert_eq!(round_trip("(A (b . c) ((d)) . E)"), "(a (b . c) ((d)) . e)");
        assert_eq!(round_trip("( 1.50 .5 -2. )"), "(1.5 0.5 -2)");
        assert_eq!(round_trip("(nil ())"), "(nil nil)");
    }
}
