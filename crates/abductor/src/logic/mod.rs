//! Literal language: terms, literals, axioms and their text syntax

pub mod axiom;
pub mod literal;
pub mod parser;
pub mod term;

pub use axiom::{Axiom, AxiomDisplay, AxiomId};
pub use literal::{Literal, LiteralDisplay};
pub use parser::{parse_conjunction, parse_literal, parse_rule, ParsedLiteral, ParsedRule};
pub use term::{is_variable_name, Constant, Term, Variable};
