//! Pratt parser: turns a token stream into an [`ast::Program`].
use std::path::PathBuf;

use crate::ast::{
    ArrayLiteral, BlockStatement, BooleanLiteral, CallExpression, CommentStatement, Expression,
    ExpressionStatement, FunctionLiteral, HashLiteral, Identifier, IfExpression,
    ImportExpression, IndexExpression, InfixExpression, IntegerLiteral, LetStatement,
    PrefixExpression, Program, ReturnStatement, Statement, StringLiteral, WhileStatement,
};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
enum Precedence {
    Lowest,
    Or,
    And,
    Equals,
    LessGreater,
    Sum,
    Product,
    Modulo,
    Prefix,
    Call,
    Index,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Slash | TokenKind::Asterisk => Precedence::Product,
        TokenKind::Modulo => Precedence::Modulo,
        TokenKind::And => Precedence::And,
        TokenKind::Or => Precedence::Or,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

/// Recursive-descent/Pratt parser over a [`Lexer`].
///
/// `current_dir` is the directory an `import(...)` expression resolves
/// relative paths against; it is the directory of the file being parsed (or
/// the process cwd for REPL input).
pub struct Parser {
    lexer: Lexer,
    current_dir: PathBuf,

    current_token: Token,
    peek_token: Token,

    pub errors: Vec<String>,
}

impl Parser {
    pub fn new(mut lexer: Lexer, current_dir: PathBuf) -> Self {
        let current_token = lexer.next_token();
        let peek_token = lexer.next_token();
        Self {
            lexer,
            current_dir,
            current_token,
            peek_token,
            errors: vec![],
        }
    }

    fn next_token(&mut self) {
        std::mem::swap(&mut self.current_token, &mut self.peek_token);
        self.peek_token = self.lexer.next_token();
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while self.current_token.kind != TokenKind::Eof {
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt);
            }
            self.next_token();
        }

        program
    }

    // ---- statements ----

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current_token.kind {
            TokenKind::Comment => Some(self.parse_comment_statement()),
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => Some(self.parse_return_statement()),
            TokenKind::While => self.parse_while_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_comment_statement(&mut self) -> Statement {
        Statement::Comment(CommentStatement {
            token: self.current_token.clone(),
            value: self.current_token.literal.clone(),
        })
    }

    fn parse_return_statement(&mut self) -> Statement {
        let token = self.current_token.clone();
        self.next_token();
        let return_value = self.parse_expression(Precedence::Lowest);

        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Statement::Return(ReturnStatement {
            token,
            return_value,
        })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.current_token.clone();
        let expression = self.parse_expression(Precedence::Lowest);
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }
        Some(Statement::Expression(ExpressionStatement {
            token,
            expression,
        }))
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.current_token.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }

        let name = Identifier {
            token: self.current_token.clone(),
            value: self.current_token.literal.clone(),
        };

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest);

        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Let(LetStatement { token, name, value }))
    }

    /// `while (<condition>) { <body> }`, parsed the same way as `if`.
    fn parse_while_statement(&mut self) -> Option<Statement> {
        let token = self.current_token.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }

        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }

        let body = self.parse_block_statement();

        Some(Statement::While(WhileStatement {
            token,
            condition,
            body,
        }))
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = Some(self.current_token.clone());
        let mut statements = vec![];
        self.next_token();

        while !self.current_token_is(TokenKind::RBrace) && !self.current_token_is(TokenKind::Eof)
        {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }

        BlockStatement { token, statements }
    }

    // ---- expressions ----

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_token_is(TokenKind::Semicolon)
            && precedence < precedence_of(self.peek_token.kind)
        {
            if !is_infix(self.peek_token.kind) {
                return Some(left);
            }
            self.next_token();
            left = self.parse_infix(left);
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.current_token.kind {
            TokenKind::Ident => Some(Expression::Identifier(Identifier {
                token: self.current_token.clone(),
                value: self.current_token.literal.clone(),
            })),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::True | TokenKind::False => Some(self.parse_boolean()),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::Str => Some(Expression::StringLiteral(StringLiteral {
                token: self.current_token.clone(),
                value: self.current_token.literal.clone(),
            })),
            TokenKind::LBracket => Some(self.parse_array_literal()),
            TokenKind::LBrace => self.parse_hash_literal(),
            TokenKind::Import => self.parse_import_expression(),
            kind => {
                self.errors
                    .push(format!("No prefix parse function for {kind} found."));
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expression) -> Expression {
        match self.current_token.kind {
            TokenKind::LParen => self.parse_call_expression(left),
            TokenKind::LBracket => self.parse_index_expression(left),
            _ => self.parse_infix_expression(left),
        }
    }

    fn parse_boolean(&self) -> Expression {
        Expression::Boolean(BooleanLiteral {
            token: self.current_token.clone(),
            value: self.current_token_is(TokenKind::True),
        })
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.current_token.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral(IntegerLiteral { token, value })),
            Err(_) => {
                self.errors
                    .push(format!("Could not parse {} as integer", token.literal));
                None
            }
        }
    }

    fn parse_array_literal(&mut self) -> Expression {
        let token = self.current_token.clone();
        let elements = self.parse_expression_list(TokenKind::RBracket);
        Expression::ArrayLiteral(ArrayLiteral { token, elements })
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.current_token.clone();
        let operator = token.literal.clone();
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix(PrefixExpression {
            token,
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Expression {
        let token = self.current_token.clone();
        let operator = token.literal.clone();
        let precedence = precedence_of(self.current_token.kind);
        self.next_token();
        let right = self
            .parse_expression(precedence)
            .unwrap_or(Expression::Boolean(BooleanLiteral {
                token: token.clone(),
                value: false,
            }));
        Expression::Infix(InfixExpression {
            token,
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest);

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        expression
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.current_token.clone();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }

        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }

        let consequence = self.parse_block_statement();
        let mut alternative = None;

        if self.peek_token_is(TokenKind::Else) {
            self.next_token();

            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }

            alternative = Some(self.parse_block_statement());
        }

        Some(Expression::If(IfExpression {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        }))
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.current_token.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }

        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }

        let body = self.parse_block_statement();

        Some(Expression::FunctionLiteral(FunctionLiteral {
            token,
            parameters,
            body,
        }))
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut identifiers = vec![];

        if self.peek_token_is(TokenKind::RParen) {
            self.next_token();
            return Some(identifiers);
        }

        self.next_token();
        identifiers.push(Identifier {
            token: self.current_token.clone(),
            value: self.current_token.literal.clone(),
        });

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            identifiers.push(Identifier {
                token: self.current_token.clone(),
                value: self.current_token.literal.clone(),
            });
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(identifiers)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Expression {
        let token = self.current_token.clone();
        let arguments = self.parse_expression_list(TokenKind::RParen);
        Expression::Call(CallExpression {
            token,
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_index_expression(&mut self, left: Expression) -> Expression {
        let token = self.current_token.clone();
        self.next_token();
        let index = self
            .parse_expression(Precedence::Lowest)
            .unwrap_or(Expression::Boolean(BooleanLiteral {
                token: token.clone(),
                value: false,
            }));

        self.expect_peek(TokenKind::RBracket);

        Expression::Index(IndexExpression {
            token,
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let token = self.current_token.clone();
        let mut pairs = vec![];

        while !self.peek_token_is(TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }

            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;

            pairs.push((key, value));

            if !self.peek_token_is(TokenKind::RBrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }

        Some(Expression::HashLiteral(HashLiteral {
            token: Some(token),
            pairs,
        }))
    }

    fn parse_import_expression(&mut self) -> Option<Expression> {
        let token = self.current_token.clone();
        let requestor = self.current_dir.to_string_lossy().into_owned();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }

        self.next_token();
        let name = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(Expression::Import(ImportExpression {
            token,
            requestor,
            name: Box::new(name),
        }))
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Vec<Expression> {
        let mut expressions = vec![];

        if self.peek_token_is(end) {
            self.next_token();
            return expressions;
        }

        self.next_token();
        if let Some(expr) = self.parse_expression(Precedence::Lowest) {
            expressions.push(expr);
        }

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            if let Some(expr) = self.parse_expression(Precedence::Lowest) {
                expressions.push(expr);
            }
        }

        self.expect_peek(end);

        expressions
    }

    // ---- helpers ----

    fn current_token_is(&self, kind: TokenKind) -> bool {
        self.current_token.kind == kind
    }

    fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_token_is(kind) {
            self.next_token();
            true
        } else {
            self.peek_error(kind);
            false
        }
    }

    fn peek_error(&mut self, kind: TokenKind) {
        self.errors.push(format!(
            "Expected next token to be {kind}, got {} instead.",
            self.peek_token.kind
        ));
    }
}

fn is_infix(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Slash
            | TokenKind::Asterisk
            | TokenKind::Modulo
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LParen
            | TokenKind::LBracket
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Program {
        let parser_dir = std::env::current_dir().unwrap();
        let mut parser = Parser::new(Lexer::new(input), parser_dir);
        let program = parser.parse_program();
        assert!(
            parser.errors.is_empty(),
            "parser errors: {:?}",
            parser.errors
        );
        program
    }

    #[test]
    fn parses_let_statements() {
        let program = parse("let x = 5; let y = true; let foobar = y;");
        assert_eq!(program.statements.len(), 3);
        assert_eq!(program.to_string(), "let x = 5;let y = true;let foobar = y;");
    }

    #[test]
    fn parses_return_statement() {
        let program = parse("return 10;");
        assert_eq!(program.to_string(), "return 10;");
    }

    #[test]
    fn parses_while_statement() {
        let program = parse("while (x < 10) { let x = x + 1; }");
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(program.statements[0], Statement::While(_)));
    }

    #[test]
    fn operator_precedence_renders_parenthesised() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b * c", "(a + (b * c))"),
            ("a && b || c", "((a && b) || c)"),
            ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
            ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d)"),
        ];
        for (input, expected) in cases {
            let program = parse(input);
            assert_eq!(program.to_string(), expected, "input: {input}");
        }
    }

    #[test]
    fn parses_function_literal() {
        let program = parse("fn(x, y) { x + y; }");
        assert_eq!(program.to_string(), "fn(x, y) {(x + y)}");
    }

    #[test]
    fn parses_hash_literal() {
        let program = parse(r#"{"one": 1, "two": 2}"#);
        assert_eq!(program.to_string(), "{one:1, two:2}");
    }

    #[test]
    fn parses_import_expression() {
        let program = parse(r#"import("./mod.ember")"#);
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(
            &program.statements[0],
            Statement::Expression(stmt) if matches!(stmt.expression, Some(Expression::Import(_)))
        ));
    }

    #[test]
    fn reports_error_on_missing_rparen() {
        let parser_dir = std::env::current_dir().unwrap();
        let mut parser = Parser::new(Lexer::new("(1 + 2"), parser_dir);
        parser.parse_program();
        assert!(!parser.errors.is_empty());
    }
}
