use crate::error::{Error, Result};
use crate::types::{Arity, BadArgCount, Kind, Pair, PrimitiveFn, Term, TypeMismatch};
use itertools::Itertools;
use std::collections::HashMap;

/// Fail unless `term` has the variant `expected`.
pub fn check_type<'t>(
    name: &'static str,
    term: &'t Term,
    expected: Kind,
) -> std::result::Result<&'t Term, TypeMismatch> {
    match term.kind() == expected {
        true => Ok(term),
        false => Err(TypeMismatch::new(name, expected, term.kind())),
    }
}

/// Fail unless exactly `expected` arguments were passed. Too few and too many are treated alike.
pub fn check_num_args(
    name: &'static str,
    expected: usize,
    args: &[Term],
) -> std::result::Result<(), BadArgCount> {
    Arity::exactly(expected).validate_for(args.len(), name)
}

pub fn check_all_numbers(
    name: &'static str,
    args: &[Term],
) -> std::result::Result<Vec<f64>, TypeMismatch> {
    args.iter()
        .map(|arg| match check_type(name, arg, Kind::Number)? {
            Term::Number(n) => Ok(*n),
            other => Err(TypeMismatch::new(name, Kind::Number, other.kind())),
        })
        .collect()
}

fn check_pair<'t>(
    name: &'static str,
    term: &'t Term,
) -> std::result::Result<&'t Pair, TypeMismatch> {
    match check_type(name, term, Kind::Cons)? {
        Term::Cons(pair) => Ok(&**pair),
        other => Err(TypeMismatch::new(name, Kind::Cons, other.kind())),
    }
}

fn too_few(name: &'static str, arity: Arity) -> Error {
    Error::BadArgCount(BadArgCount {
        name,
        expected: arity,
        got: 0,
    })
}

static SUM: PrimitiveFn = PrimitiveFn {
    name: "+",
    fn_ptr: sum_,
    arity: Arity::at_least(0),
};

fn sum_(args: &[Term]) -> Result {
    let value = check_all_numbers("+", args)?
        .iter()
        .fold(0.0, |acc, x| acc + x);
    Ok(Term::Number(value))
}

static MUL: PrimitiveFn = PrimitiveFn {
    name: "*",
    fn_ptr: mul_,
    arity: Arity::at_least(0),
};

fn mul_(args: &[Term]) -> Result {
    let value = check_all_numbers("*", args)?
        .iter()
        .fold(1.0, |acc, x| acc * x);
    Ok(Term::Number(value))
}

static SUB: PrimitiveFn = PrimitiveFn {
    name: "-",
    fn_ptr: sub_,
    arity: Arity::at_least(1),
};

// One argument negates; more subtract left to right.
fn sub_(args: &[Term]) -> Result {
    match check_all_numbers("-", args)?.as_slice() {
        [] => Err(too_few("-", SUB.arity.clone())),
        [x] => Ok(Term::Number(-x)),
        [first, rest @ ..] => Ok(Term::Number(rest.iter().fold(*first, |acc, x| acc - x))),
    }
}

static DIV: PrimitiveFn = PrimitiveFn {
    name: "/",
    fn_ptr: div_,
    arity: Arity::at_least(1),
};

fn checked_div(x: f64, y: f64) -> Result<f64> {
    match y == 0.0 {
        true => Err(Error::DivideByZero("/")),
        false => Ok(x / y),
    }
}

// One argument takes the reciprocal; more divide left to right.
fn div_(args: &[Term]) -> Result {
    match check_all_numbers("/", args)?.as_slice() {
        [] => Err(too_few("/", DIV.arity.clone())),
        [x] => checked_div(1.0, *x).map(Term::Number),
        [first, rest @ ..] => rest
            .iter()
            .try_fold(*first, |acc, &y| checked_div(acc, y))
            .map(Term::Number),
    }
}

fn comparison_(name: &'static str, args: &[Term], comp: fn(&f64, &f64) -> bool) -> Result {
    match check_all_numbers(name, args)?.as_slice() {
        [x, y] => Ok(Term::from_bool(comp(x, y))),
        _ => Err(Error::BadArgCount(BadArgCount {
            name,
            expected: Arity::exactly(2),
            got: args.len(),
        })),
    }
}

macro_rules! comparison_primitive {
    ($SYMBOL:tt, $NAME:ident) => {
        paste::item! {
            static $NAME: PrimitiveFn = PrimitiveFn {
                name: stringify!($SYMBOL),
                fn_ptr: |args: &[Term]| comparison_(stringify!($SYMBOL), args, f64:: [<$NAME:lower>]),
                arity: Arity::exactly(2),
            };
        }
    };
}

comparison_primitive!(=, EQ);
comparison_primitive!(/=, NE);
comparison_primitive!(<, LT);
comparison_primitive!(<=, LE);
comparison_primitive!(>, GT);
comparison_primitive!(>=, GE);

static LIST: PrimitiveFn = PrimitiveFn {
    name: "list",
    fn_ptr: list_,
    arity: Arity::at_least(0),
};

fn list_(args: &[Term]) -> Result {
    Ok(Term::list(args.to_vec()))
}

static CONS: PrimitiveFn = PrimitiveFn {
    name: "cons",
    fn_ptr: cons_,
    arity: Arity::exactly(2),
};

fn cons_(args: &[Term]) -> Result {
    Ok(Term::cons(args[0].clone(), args[1].clone()))
}

static CAR: PrimitiveFn = PrimitiveFn {
    name: "car",
    fn_ptr: car_,
    arity: Arity::exactly(1),
};

fn car_(args: &[Term]) -> Result {
    Ok(check_pair("car", &args[0])?.car.clone())
}

static CDR: PrimitiveFn = PrimitiveFn {
    name: "cdr",
    fn_ptr: cdr_,
    arity: Arity::exactly(1),
};

fn cdr_(args: &[Term]) -> Result {
    Ok(check_pair("cdr", &args[0])?.cdr.clone())
}

static EMPTY_TEST: PrimitiveFn = PrimitiveFn {
    name: "empty?",
    fn_ptr: empty_test_,
    arity: Arity::exactly(1),
};

fn empty_test_(args: &[Term]) -> Result {
    Ok(Term::from_bool(args[0].is_nil()))
}

pub(crate) fn pretty_print_args(args: &[Term]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].to_string(),
        _ => format!("\n\t{}", args.iter().join("\n\t")),
    }
}

/// Check the arity of `func`, then run its body.
pub fn call_primitive(func: &PrimitiveFn, args: &[Term]) -> Result {
    func.arity.validate_for(args.len(), func.name)?;
    log::trace!("Call {} with {}", func.name, pretty_print_args(args));
    let result = (func.fn_ptr)(args);
    match &result {
        Ok(val) => log::trace!("Call to {} resulted in {}", func.name, val),
        Err(e) => log::trace!("Call to {} failed: {}", func.name, e),
    }
    result
}

type Namespace = HashMap<&'static str, &'static PrimitiveFn>;
lazy_static! {
    /// Every primitive except `eval`, keyed by name. Read-only once built.
    pub static ref CORE: Namespace = {
        let mut map = Namespace::new();
        for func in [
            // Arithmetic
            &SUM,
            &SUB,
            &MUL,
            &DIV,
            // Comparisons
            &EQ,
            &NE,
            &GT,
            &GE,
            &LT,
            &LE,
            // Working with lists
            &LIST,
            &CONS,
            &CAR,
            &CDR,
            &EMPTY_TEST,
        ].iter() {
            map.insert(func.name, *func);
        }
        map
    };
}
