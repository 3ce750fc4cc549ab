pub use crate::builder::Builder;
pub use crate::parser_diagnostics::ParseError;
pub use crate::parsing::{parse, Parsed, Parser, Session};
pub use crate::symbol::{Interner, Symbol};

pub mod ast;
pub mod builder;
mod inspect;
pub mod keywords;
pub mod lexing;
pub mod parser_diagnostics;
pub mod parsing;
pub mod pos;
pub mod sexp;
pub mod symbol;
