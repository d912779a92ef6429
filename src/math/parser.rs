use super::{ast::*, lexer::*};
use crate::common::*;

type PResult<T = Node> = Result<T, ParseError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected token; found {}, expected {}", .found.map_or("end of input", |t| t.as_str()), .expected.fmt_expected())]
    UnexpectedToken {
        found: Option<TokenKind>,
        expected: NonEmpty<&'static str>,
    },
    #[error("expression nested deeper than {limit} levels")]
    TooDeep { limit: usize },
}

trait FormatExpected {
    fn fmt_expected(&self) -> String;
}

impl FormatExpected for [&'static str] {
    fn fmt_expected(&self) -> String {
        match self {
            [] => String::new(),
            [a] => a.to_string(),
            [a, b] => format!("{} or {}", a, b),
            s => format!("{}, or {}", s[..s.len() - 1].join(", "), &s[s.len() - 1]),
        }
    }
}

/// Recursive-descent parser over the closed arithmetic grammar:
///
/// ```text
/// conditional    := comparison ( '?' conditional ':' conditional )?
/// comparison     := addition ( ( '<' | '>' | '<=' | '>=' | '==' ) addition )*
/// addition       := multiplication ( ( '+' | '-' ) multiplication )*
/// multiplication := unary ( ( '*' | '/' ) unary )*
/// unary          := ( '+' | '-' ) unary | atom
/// atom           := integer | float | '(' conditional ')'
/// ```
///
/// Parentheses, prefix operators and conditional branches nest at most
/// [`Parser::MAX_DEPTH`] levels.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    const ATOMS: &'static [&'static str] = &["<integer>", "<float>", "'('"];
    pub const MAX_DEPTH: usize = 100;

    pub fn new(s: &'a str) -> Self {
        Self {
            lexer: lexer(s),
            depth: 0,
        }
    }

    pub fn parse(mut self) -> PResult {
        let node = self.parse_node()?;
        match self.lexer.next() {
            None => Ok(node),
            found => Err(unexpected(found, &["end of input"])),
        }
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        self.lexer.peek().map_or(false, |&peeked| peeked == kind)
    }

    fn consume(&mut self, expected: TokenKind) -> PResult<()> {
        if self.matches(expected) {
            self.lexer.next();
            Ok(())
        } else {
            Err(unexpected(self.lexer.next(), &[expected.as_str()]))
        }
    }

    fn next_binary_op(&mut self, options: &[TokenKind]) -> Option<BinaryOperator> {
        let op = self
            .lexer
            .peek()
            .filter(|peeked| options.contains(*peeked))
            .and_then(TokenKind::as_binary_op)?;
        self.lexer.next();
        Some(op)
    }

    fn next_unary_op(&mut self) -> Option<UnaryOperator> {
        let op = self
            .lexer
            .peek()
            .filter(|peeked| TokenKind::UNARY_OPS.contains(*peeked))
            .and_then(TokenKind::as_unary_op)?;
        self.lexer.next();
        Some(op)
    }

    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> PResult) -> PResult {
        if self.depth == Self::MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: Self::MAX_DEPTH,
            });
        }
        self.depth += 1;
        let node = parse(self);
        self.depth -= 1;
        node
    }

    fn parse_node(&mut self) -> PResult {
        self.parse_conditional()
    }

    fn parse_conditional(&mut self) -> PResult {
        let cond = self.parse_comparison()?;

        if self.matches(TokenKind::Question) {
            self.lexer.next();
            let then = self.nested(Self::parse_conditional)?;
            self.consume(TokenKind::Colon)?;
            let otherwise = self.nested(Self::parse_conditional)?;
            Ok(Node::new_conditional(cond, then, otherwise))
        } else {
            Ok(cond)
        }
    }

    fn parse_comparison(&mut self) -> PResult {
        let mut lhs = self.parse_addition()?;

        while let Some(op) = self.next_binary_op(TokenKind::COMPARISON_OPS) {
            let rhs = self.parse_addition()?;
            lhs = Node::new_binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_addition(&mut self) -> PResult {
        let mut lhs = self.parse_multiplication()?;

        while let Some(op) = self.next_binary_op(TokenKind::ADDITION_OPS) {
            let rhs = self.parse_multiplication()?;
            lhs = Node::new_binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_multiplication(&mut self) -> PResult {
        let mut lhs = self.parse_unary_prefix()?;

        while let Some(op) = self.next_binary_op(TokenKind::MULTIPLICATION_OPS) {
            let rhs = self.parse_unary_prefix()?;
            lhs = Node::new_binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_unary_prefix(&mut self) -> PResult {
        match self.next_unary_op() {
            Some(op) => {
                let rhs = self.nested(Self::parse_unary_prefix)?;
                Ok(Node::new_unary(op, rhs))
            }
            None => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> PResult {
        match self.lexer.next() {
            Some(TokenKind::Integer(x)) => Ok(Node::new_literal(x)),
            Some(TokenKind::Float(x)) => Ok(Node::new_literal(x)),
            Some(TokenKind::LeftParen) => {
                let inner = self.nested(Self::parse_node)?;
                self.consume(TokenKind::RightParen)?;
                Ok(Node::new_parenthetical(inner))
            }
            found => Err(unexpected(found, Self::ATOMS)),
        }
    }
}

fn unexpected(found: Option<TokenKind>, expected: &[&'static str]) -> ParseError {
    let expected = NonEmpty::try_from_vec(expected.to_vec()).unwrap_or_else(|_| vec1!["<input>"]);
    ParseError::UnexpectedToken { found, expected }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BinaryOperator::*;

    fn parse(s: &str) -> PResult {
        Parser::new(s).parse()
    }

    fn check(s: &str, expected: Node) {
        assert_eq!(parse(s).unwrap(), expected);
    }

    fn int(x: Int) -> Node {
        Node::new_literal(x)
    }

    #[test]
    fn test_parse_nums() {
        check("32", int(32));
        check("3.2", Node::new_literal(3.2));
        check(".5", Node::new_literal(0.5));
    }

    #[test]
    fn test_parse_left_associative() {
        check(
            "1 - 2 - 3",
            Node::new_binary(Sub, Node::new_binary(Sub, int(1), int(2)), int(3)),
        );
        check(
            "8 / 4 / 2",
            Node::new_binary(Div, Node::new_binary(Div, int(8), int(4)), int(2)),
        );
    }

    #[test]
    fn test_parse_precedence() {
        check(
            "1 + 2 * 3",
            Node::new_binary(Add, int(1), Node::new_binary(Mul, int(2), int(3))),
        );
        check(
            "(2 + 3) * 4",
            Node::new_binary(
                Mul,
                Node::new_parenthetical(Node::new_binary(Add, int(2), int(3))),
                int(4),
            ),
        );
    }

    #[test]
    fn test_parse_unary() {
        check(
            "- -2",
            Node::new_unary(UnaryOperator::Neg, Node::new_unary(UnaryOperator::Neg, int(2))),
        );
    }

    #[test]
    fn test_parse_conditional() {
        check(
            "6 >= 5 ? 1 : 0",
            Node::new_conditional(Node::new_binary(Ge, int(6), int(5)), int(1), int(0)),
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("").is_err());
        assert!(parse("1 +").is_err());
        assert!(parse("(1 + 2").is_err());
        assert!(parse("1 2").is_err());
        assert!(parse("1 ? 2").is_err());
        assert!(parse("1 = 2").is_err());
        assert_eq!(
            parse(")").unwrap_err().to_string(),
            "unexpected token; found ')', expected <integer>, <float>, or '('"
        );
    }

    #[test]
    fn test_parse_depth() {
        let limit = Parser::MAX_DEPTH;
        let nested = |n: usize| format!("{}1{}", "(".repeat(n), ")".repeat(n));
        assert!(parse(&nested(limit)).is_ok());
        assert_eq!(parse(&nested(limit + 1)), Err(ParseError::TooDeep { limit }));
        assert_eq!(parse(&nested(10_000)), Err(ParseError::TooDeep { limit }));
        assert_eq!(
            parse(&format!("{}1", "-".repeat(10_000))),
            Err(ParseError::TooDeep { limit })
        );
        assert_eq!(
            parse(&"1 ? 1 : ".repeat(10_000)),
            Err(ParseError::TooDeep { limit })
        );
    }
}
