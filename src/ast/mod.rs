//! Abstract syntax tree produced by the parser.
mod expression;
mod statement;

pub use expression::{
    ArrayLiteral, BooleanLiteral, CallExpression, Expression, FunctionLiteral, HashLiteral,
    IfExpression, ImportExpression, IndexExpression, InfixExpression, IntegerLiteral,
    PrefixExpression, StringLiteral,
};
pub use statement::{
    BlockStatement, CommentStatement, ExpressionStatement, LetStatement, ReturnStatement,
    Statement, WhileStatement,
};

use std::fmt;

/// Anything that can report the literal of the token it started from.
pub trait Node: fmt::Display {
    fn token_literal(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: crate::token::Token,
    pub value: String,
}

impl Node for Identifier {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(Node::token_literal)
            .unwrap_or("")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}
