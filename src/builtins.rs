use crate::core::{call_primitive, check_num_args, CORE};
use crate::error::{Error, Result};
use crate::types::{Func, Term};
use itertools::Itertools;
use std::collections::HashMap;
use std::rc::Weak;

pub const EVAL: &str = "eval";

/// The evaluator the `eval` builtin hands its argument to.
pub trait Evaluator {
    /// Evaluate `term` in the global environment.
    fn eval(&self, term: &Term) -> Result;
}

impl Func {
    /// Call with already-evaluated arguments.
    pub fn call(&self, args: &[Term]) -> Result {
        match self {
            Func::Primitive(f) => call_primitive(f, args),
            Func::Eval(evaluator) => {
                check_num_args(EVAL, 1, args)?;
                let evaluator = evaluator.upgrade().ok_or(Error::EvaluatorGone)?;
                log::trace!("Call to evaluator with {}", args[0]);
                evaluator.eval(&args[0])
            }
        }
    }
}

/// The table of builtin procedures, keyed by name.
///
/// Built once when the evaluator starts and read-only afterwards. When `eval` is wanted, build
/// the evaluator with [`std::rc::Rc::new_cyclic`] and hand the weak reference to
/// [`Builtins::with_eval`].
#[derive(Debug, Clone)]
pub struct Builtins {
    table: HashMap<&'static str, Func>,
}

impl Builtins {
    pub fn new() -> Self {
        let table = CORE
            .iter()
            .map(|(&name, &func)| (name, Func::Primitive(func)))
            .collect();
        Self { table }
    }

    pub fn with_eval(evaluator: Weak<dyn Evaluator>) -> Self {
        let mut builtins = Self::new();
        builtins.table.insert(EVAL, Func::Eval(evaluator));
        builtins
    }

    pub fn get(&self, name: &str) -> Option<&Func> {
        self.table.get(name)
    }

    pub fn lookup(&self, name: &str) -> Option<Term> {
        self.get(name).cloned().map(Term::Func)
    }

    pub fn call(&self, name: &str, args: &[Term]) -> Result {
        let func = self
            .get(name)
            .ok_or_else(|| Error::UnknownProcedure(name.to_owned()))?;
        func.call(args)
    }

    /// Every builtin name, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.table.keys().copied().sorted().collect()
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Self::new()
    }
}
