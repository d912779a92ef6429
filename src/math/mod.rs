//! Evaluation of the arithmetic that remains once every die has been rolled.
//!
//! Only digits, whitespace and `+ - * / ( ) ? : > < = .` are ever accepted; anything
//! else is refused before lexing.

pub mod ast;
mod error;
mod lexer;
mod num;
mod parser;
mod visit;

pub use error::{EvalError, MathError};
pub use num::Number;
pub use parser::ParseError;

use crate::markdown;
use ast::{BinaryOperator, Node, UnaryOperator};
use visit::{Accept, AstVisitor};

const OPERATORS: &str = "+-*/()?:><=.";

fn is_math_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || OPERATORS.contains(c)
}

/// Evaluates `s` as arithmetic, after stripping trace emphasis from numbers.
pub fn finalize(s: &str) -> Result<Number, MathError> {
    let s = markdown::strip_emphasis(s);
    if let Some(found) = s.chars().find(|&c| !is_math_char(c)) {
        return Err(MathError::NonMath {
            expr: s.into_owned(),
            found,
        });
    }

    let ast = parser::Parser::new(&s).parse().map_err(|source| MathError::Parse {
        expr: s.to_string(),
        source,
    })?;
    Evaluator.visit(&ast).map_err(|source| MathError::Eval {
        expr: s.to_string(),
        source,
    })
}

/// Like [`finalize`], but any failure evaluates to zero. Used for threshold checks.
pub fn finalize_silent(s: &str) -> Number {
    finalize(s).unwrap_or(Number::ZERO)
}

struct Evaluator;

impl AstVisitor for Evaluator {
    type Output = Result<Number, EvalError>;

    fn visit_literal(&mut self, x: &Number) -> Self::Output {
        Ok(*x)
    }

    fn visit_parenthetical(&mut self, inner: &Node) -> Self::Output {
        inner.accept(self)
    }

    fn visit_unary(&mut self, op: &UnaryOperator, r: &Node) -> Self::Output {
        let value = r.accept(self)?;
        match op {
            UnaryOperator::Pos => Ok(value),
            UnaryOperator::Neg => value.checked_neg().ok_or(EvalError::Overflow),
        }
    }

    fn visit_binary(&mut self, l: &Node, op: &BinaryOperator, r: &Node) -> Self::Output {
        use BinaryOperator::*;

        let left = l.accept(self)?;
        let right = r.accept(self)?;
        match op {
            Add => left.checked_add(right).ok_or(EvalError::Overflow),
            Sub => left.checked_sub(right).ok_or(EvalError::Overflow),
            Mul => left.checked_mul(right).ok_or(EvalError::Overflow),
            Div if !right.is_truthy() => Err(EvalError::ZeroDivision),
            Div => left.checked_div(right).ok_or(EvalError::Overflow),
            Lt => Ok(Number::from_bool(left < right)),
            Gt => Ok(Number::from_bool(left > right)),
            Le => Ok(Number::from_bool(left <= right)),
            Ge => Ok(Number::from_bool(left >= right)),
            Eq => Ok(Number::from_bool(left == right)),
        }
    }

    fn visit_conditional(&mut self, cond: &Node, then: &Node, otherwise: &Node) -> Self::Output {
        if cond.accept(self)?.is_truthy() {
            then.accept(self)
        } else {
            otherwise.accept(self)
        }
    }
}
