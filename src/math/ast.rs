use super::num::Number;
use std::fmt::{self, Write};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(Number),
    Parenthetical(Box<Node>),
    Unary(UnaryOperator, Box<Node>),
    Binary(Box<Node>, BinaryOperator, Box<Node>),
    /// `cond ? then : otherwise`
    Conditional(Box<Node>, Box<Node>, Box<Node>),
}

impl Node {
    pub fn new_literal(x: impl Into<Number>) -> Self {
        Self::Literal(x.into())
    }

    pub fn new_parenthetical(inner: Node) -> Self {
        Self::Parenthetical(Box::new(inner))
    }

    pub fn new_unary(op: UnaryOperator, rhs: Node) -> Self {
        Self::Unary(op, Box::new(rhs))
    }

    pub fn new_binary(op: BinaryOperator, lhs: Node, rhs: Node) -> Self {
        Self::Binary(Box::new(lhs), op, Box::new(rhs))
    }

    pub fn new_conditional(cond: Node, then: Node, otherwise: Node) -> Self {
        Self::Conditional(Box::new(cond), Box::new(then), Box::new(otherwise))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UnaryOperator {
    Pos,
    Neg,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Pos => '+',
            Self::Neg => '-',
        };
        f.write_char(c)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Eq => "==",
        };
        f.write_str(s)
    }
}
