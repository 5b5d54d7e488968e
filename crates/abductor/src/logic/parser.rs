//! Parser for literal and rule text
//!
//! Grammar (whitespace allowed between tokens):
//!
//! ```text
//! rule        ::= conjunction "=>" conjunction
//! conjunction ::= literal (("&" | "^") literal)*
//! literal     ::= ("!" | "~") atom | term "=" term | term "!=" term | atom
//! atom        ::= name [ "(" term ("," term)* ")" ]
//! term        ::= name | "'" chars "'"
//! ```
//!
//! Bare names follow the TPTP convention (upper-case or `_` initial is a
//! variable). Quoted names are always constants. Predicate names are left
//! unresolved here; the knowledge base maps them to ids.

use super::term::Term;
use crate::error::{AbductorError, Result};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, not, opt},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};

/// A literal whose predicate has not been resolved to an id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLiteral {
    pub predicate: String,
    pub terms: Vec<Term>,
    pub polarity: bool,
}

/// An implication whose predicates have not been resolved to ids yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    pub left: Vec<ParsedLiteral>,
    pub right: Vec<ParsedLiteral>,
}

/// Parse a single literal such as `p(X, a)` or `!q(b)`
pub fn parse_literal(input: &str) -> Result<ParsedLiteral> {
    finish(input, all_consuming(terminated(literal, multispace0))(input))
}

/// Parse a conjunction such as `p(X) & q(X, Y)`
pub fn parse_conjunction(input: &str) -> Result<Vec<ParsedLiteral>> {
    finish(input, all_consuming(terminated(conjunction, multispace0))(input))
}

/// Parse an implication such as `p(X) & q(X, Y) => r(Y)`
pub fn parse_rule(input: &str) -> Result<ParsedRule> {
    finish(input, all_consuming(terminated(rule, multispace0))(input))
}

fn finish<T>(input: &str, result: IResult<&str, T>) -> Result<T> {
    result
        .map(|(_, value)| value)
        .map_err(|e| AbductorError::Parse(format!("'{}': {}", input, e)))
}

fn rule(input: &str) -> IResult<&str, ParsedRule> {
    let (input, left) = conjunction(input)?;
    let (input, _) = tuple((multispace0, tag("=>"), multispace0))(input)?;
    let (input, right) = conjunction(input)?;
    Ok((input, ParsedRule { left, right }))
}

fn conjunction(input: &str) -> IResult<&str, Vec<ParsedLiteral>> {
    separated_list1(
        tuple((multispace0, alt((char('&'), char('^'))), multispace0)),
        literal,
    )(input)
}

fn literal(input: &str) -> IResult<&str, ParsedLiteral> {
    let (input, _) = multispace0(input)?;
    alt((negated_atom, equality, map(atom, |(predicate, terms)| ParsedLiteral {
        predicate,
        terms,
        polarity: true,
    })))(input)
}

fn negated_atom(input: &str) -> IResult<&str, ParsedLiteral> {
    map(
        preceded(tuple((alt((char('!'), char('~'))), multispace0)), atom),
        |(predicate, terms)| ParsedLiteral {
            predicate,
            terms,
            polarity: false,
        },
    )(input)
}

fn equality(input: &str) -> IResult<&str, ParsedLiteral> {
    let (input, left) = term(input)?;
    let (input, _) = multispace0(input)?;
    let (input, op) = alt((tag("!="), terminated(tag("="), not(char('>')))))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, right) = term(input)?;
    Ok((
        input,
        ParsedLiteral {
            predicate: "=".to_string(),
            terms: vec![left, right],
            polarity: op == "=",
        },
    ))
}

fn atom(input: &str) -> IResult<&str, (String, Vec<Term>)> {
    let (input, name) = name(input)?;
    let (input, args) = opt(delimited(
        tuple((multispace0, char('('), multispace0)),
        separated_list0(tuple((multispace0, char(','), multispace0)), term),
        tuple((multispace0, char(')'))),
    ))(input)?;
    Ok((input, (name.to_string(), args.unwrap_or_default())))
}

fn term(input: &str) -> IResult<&str, Term> {
    alt((
        map(single_quoted, Term::constant),
        map(name, Term::from_name),
    ))(input)
}

fn name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')(input)
}

fn single_quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('\''), take_while(|c: char| c != '\''), char('\''))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_literal() {
        let lit = parse_literal("p(X, a)").unwrap();
        assert_eq!(lit.predicate, "p");
        assert_eq!(lit.terms, vec![Term::variable("X"), Term::constant("a")]);
        assert!(lit.polarity);
    }

    #[test]
    fn test_parse_negation() {
        let lit = parse_literal("!dead(X)").unwrap();
        assert!(!lit.polarity);
        let lit = parse_literal("~ dead(X)").unwrap();
        assert!(!lit.polarity);
    }

    #[test]
    fn test_parse_equality() {
        let lit = parse_literal("X = john").unwrap();
        assert_eq!(lit.predicate, "=");
        assert!(lit.polarity);
        let lit = parse_literal("X != Y").unwrap();
        assert!(!lit.polarity);
    }

    #[test]
    fn test_parse_propositional_atom() {
        let lit = parse_literal("rain").unwrap();
        assert_eq!(lit.predicate, "rain");
        assert!(lit.terms.is_empty());
    }

    #[test]
    fn test_parse_quoted_constant() {
        let lit = parse_literal("name(X, 'Bob')").unwrap();
        assert_eq!(lit.terms[1], Term::constant("Bob"));
    }

    #[test]
    fn test_parse_rule() {
        let rule = parse_rule("go(E, X) & store(Y) => shop(E2, X, Y)").unwrap();
        assert_eq!(rule.left.len(), 2);
        assert_eq!(rule.right.len(), 1);
        assert_eq!(rule.right[0].terms.len(), 3);
    }

    #[test]
    fn test_parse_propositional_rule() {
        let rule = parse_rule("rain => wet").unwrap();
        assert_eq!(rule.left[0].predicate, "rain");
        assert_eq!(rule.right[0].predicate, "wet");
    }

    #[test]
    fn test_parse_rejects_trailing_garbage() {
        assert!(parse_literal("p(X) )").is_err());
        assert!(parse_rule("p(X) =>").is_err());
    }
}
