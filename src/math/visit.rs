use super::ast::*;
use super::num::Number;

pub trait AstVisitor {
    type Output;

    fn visit<T: ?Sized>(&mut self, node: &T) -> Self::Output
    where
        T: Accept<Self>,
    {
        node.accept(self)
    }

    fn visit_literal(&mut self, x: &Number) -> Self::Output;

    fn visit_parenthetical(&mut self, inner: &Node) -> Self::Output;

    fn visit_unary(&mut self, op: &UnaryOperator, r: &Node) -> Self::Output;

    fn visit_binary(&mut self, l: &Node, op: &BinaryOperator, r: &Node) -> Self::Output;

    fn visit_conditional(&mut self, cond: &Node, then: &Node, otherwise: &Node) -> Self::Output;
}

pub trait Accept<V: AstVisitor + ?Sized> {
    fn accept(&self, v: &mut V) -> V::Output;
}

impl<V: AstVisitor + ?Sized> Accept<V> for Node {
    fn accept(&self, v: &mut V) -> V::Output {
        match self {
            Self::Literal(x) => v.visit_literal(x),
            Self::Parenthetical(x) => v.visit_parenthetical(x),
            Self::Unary(op, x) => v.visit_unary(op, x),
            Self::Binary(l, op, r) => v.visit_binary(l, op, r),
            Self::Conditional(c, t, o) => v.visit_conditional(c, t, o),
        }
    }
}
