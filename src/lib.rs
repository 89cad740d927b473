//! A small S-expression reader.
//!
//! Source text is tokenized and read into [`Term`]s. The primitive procedures an evaluator
//! needs (arithmetic, comparisons, `cons`/`car`/`cdr`/`list`) are collected in [`Builtins`].

#[macro_use]
extern crate lazy_static;

pub mod builtins;
pub mod core;
pub mod error;
pub mod printer;
pub mod reader;
pub mod tokens;
pub mod types;

pub use builtins::{Builtins, Evaluator};
pub use error::{Error, Result};
pub use reader::{parse, read_all, Reader};
pub use tokens::ParseError;
pub use types::{list_to_term, Func, Kind, Pair, Symbol, Term};
