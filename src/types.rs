use crate::builtins::Evaluator;
use derive_more::Deref;
use std::fmt;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::{Rc, Weak};

/// Name of the canonical true symbol.
pub const T: &str = "t";
/// Head symbol produced by the `'x` reader shorthand.
pub const QUOTE: &str = "quote";

/// A symbol name. Names are lowercased on construction, so `CAR` and `car` are the same symbol.
#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Self(name.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two slots of a cons cell. Immutable once built.
#[derive(Debug, Clone)]
pub struct Pair {
    pub car: Term,
    pub cdr: Term,
}

// Compares along the cdr chain in a loop; only cars recurse.
impl PartialEq for Pair {
    fn eq(&self, other: &Self) -> bool {
        let (mut x, mut y) = (self, other);
        loop {
            if x.car != y.car {
                return false;
            }
            match (&x.cdr, &y.cdr) {
                (Term::Cons(a), Term::Cons(b)) => {
                    if Rc::ptr_eq(a, b) {
                        return true;
                    }
                    x = &**a;
                    y = &**b;
                }
                (a, b) => return a == b,
            }
        }
    }
}

// Unlinks uniquely owned cdrs one cell at a time.
impl Drop for Pair {
    fn drop(&mut self) {
        let mut next = std::mem::replace(&mut self.cdr, Term::Nil);
        while let Term::Cons(rc) = next {
            match Rc::try_unwrap(rc) {
                Ok(mut pair) => next = std::mem::replace(&mut pair.cdr, Term::Nil),
                Err(_) => break,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Term {
    Number(f64),
    Symbol(Symbol),
    Cons(Rc<Pair>),
    Nil,
    Func(Func),
}

/// The variant tag of a [`Term`], used in type errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Number,
    Symbol,
    Cons,
    Nil,
    Func,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Number => "number",
            Kind::Symbol => "symbol",
            Kind::Cons => "cons",
            Kind::Nil => "nil",
            Kind::Func => "function",
        };
        write!(f, "{}", name)
    }
}

impl Term {
    pub fn nil() -> Self {
        Term::Nil
    }

    pub fn t() -> Self {
        Term::symbol(T)
    }

    pub fn from_bool(value: bool) -> Self {
        match value {
            true => Term::t(),
            false => Term::Nil,
        }
    }

    pub fn symbol(name: &str) -> Self {
        Term::Symbol(Symbol::new(name))
    }

    pub fn cons(car: Term, cdr: Term) -> Self {
        Term::Cons(Rc::new(Pair { car, cdr }))
    }

    /// A proper list of `elements`, terminated by `Nil`.
    pub fn list<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = Term>,
        I::IntoIter: DoubleEndedIterator,
    {
        list_to_term(elements, Term::Nil)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Term::Number(_) => Kind::Number,
            Term::Symbol(_) => Kind::Symbol,
            Term::Cons(_) => Kind::Cons,
            Term::Nil => Kind::Nil,
            Term::Func(_) => Kind::Func,
        }
    }

    pub fn is_nil(&self) -> bool {
        match self {
            Term::Nil => true,
            _ => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Term::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<&Pair> {
        match self {
            Term::Cons(pair) => Some(pair),
            _ => None,
        }
    }

    /// Walk the elements of a (possibly improper) list.
    pub fn iter(&self) -> ListIter<'_> {
        ListIter { rest: self }
    }
}

/// Build a right-nested chain of cons cells holding `elements`, whose final `cdr` is `tail`.
///
/// Every list literal goes through here, whether it comes from the reader or from `list`.
pub fn list_to_term<I>(elements: I, tail: Term) -> Term
where
    I: IntoIterator<Item = Term>,
    I::IntoIter: DoubleEndedIterator,
{
    elements
        .into_iter()
        .rev()
        .fold(tail, |cdr, car| Term::cons(car, cdr))
}

/// Iterator over the `car`s of a cons chain.
///
/// Stops at the first non-cons `cdr`; [`ListIter::tail`] then returns it.
pub struct ListIter<'a> {
    rest: &'a Term,
}

impl<'a> ListIter<'a> {
    pub fn tail(&self) -> &'a Term {
        self.rest
    }
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Term;

    fn next(&mut self) -> Option<Self::Item> {
        let rest: &'a Term = self.rest;
        match rest {
            Term::Cons(pair) => {
                self.rest = &pair.cdr;
                Some(&pair.car)
            }
            _ => None,
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        use Term::*;
        match [self, other] {
            [Number(x), Number(y)] => x == y,
            [Symbol(x), Symbol(y)] => x == y,
            [Cons(x), Cons(y)] => Rc::ptr_eq(x, y) || x == y,
            [Nil, Nil] => true,
            [Func(x), Func(y)] => x == y,
            [_, _] => false,
        }
    }
}

impl From<f64> for Term {
    fn from(n: f64) -> Self {
        Term::Number(n)
    }
}

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self::Between(min..=max)
    }

    pub const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub fn validate_for(&self, n: usize, name: &'static str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name,
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

/// A procedure was called with the wrong number of arguments.
#[derive(Debug, Clone)]
pub struct BadArgCount {
    pub name: &'static str,
    pub expected: Arity,
    pub got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "when evaluating {} expected {} arguments, but received {} arguments",
            self.name, self.expected, self.got
        )
    }
}

impl std::error::Error for BadArgCount {}

/// An argument's variant did not match what a procedure requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    pub procedure: &'static str,
    pub expected: Kind,
    pub actual: Kind,
}

impl TypeMismatch {
    pub fn new(procedure: &'static str, expected: Kind, actual: Kind) -> Self {
        Self {
            procedure,
            expected,
            actual,
        }
    }
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected a {}, got a {}",
            self.procedure, self.expected, self.actual
        )
    }
}

impl std::error::Error for TypeMismatch {}

pub struct PrimitiveFn {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&[Term]) -> crate::error::Result,
}

impl fmt::Debug for PrimitiveFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "primitive function #<{}>", self.name)
    }
}

/// Something a term can call. Only the builtin layer makes these.
#[derive(Clone)]
pub enum Func {
    Primitive(&'static PrimitiveFn),
    /// `eval`, bound to the evaluator that owns the builtin registry.
    Eval(Weak<dyn Evaluator>),
}

impl Func {
    pub fn name(&self) -> &'static str {
        match self {
            Func::Primitive(f) => f.name,
            Func::Eval(_) => crate::builtins::EVAL,
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Func::Primitive(f) => f.arity.clone(),
            Func::Eval(_) => Arity::exactly(1),
        }
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Func::Primitive(func) => write!(f, "{:?}", func),
            Func::Eval(_) => write!(f, "PrimitiveEval"),
        }
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Func::Primitive(x), Func::Primitive(y)) => std::ptr::eq(*x, *y),
            (Func::Eval(x), Func::Eval(y)) => Weak::ptr_eq(x, y),
            _ => false,
        }
    }
}
