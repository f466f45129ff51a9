//! Recursive-descent parser.
//!
//! Tokens are pulled lazily from the [`Scanner`] with one token of
//! lookahead.  Lexical errors surfacing through the token stream are
//! collected alongside syntax errors, so one parse reports every
//! diagnostic it can.  On a syntax error the parser synchronizes at the
//! next statement boundary and keeps going; the result is a best-effort
//! statement list plus the accumulated error list.

use std::rc::Rc;

use crate::error::{LoxError, Result};
use crate::expr::{Expr, ExprId, LiteralValue};
use crate::scanner::Scanner;
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::{Token, TokenType};

/// Hard upper bound on call arguments and function parameters.
const MAX_ARITY: usize = 255;

pub struct Parser {
    scanner: Scanner,
    lookahead: Token,
    previous: Option<Token>,
    errors: Vec<LoxError>,
    next_id: ExprId,
}

impl Parser {
    /// `first_expr_id` seeds the expression-id counter; the session passes
    /// the value returned by [`Parser::next_expr_id`] of the previous parse
    /// so ids stay unique across REPL lines.
    pub fn new(mut scanner: Scanner, first_expr_id: ExprId) -> Self {
        let mut errors: Vec<LoxError> = Vec::new();
        let lookahead: Token = next_good_token(&mut scanner, &mut errors, 1);

        Parser {
            scanner,
            lookahead,
            previous: None,
            errors,
            next_id: first_expr_id,
        }
    }

    /// Parse a whole program: `declaration* EOF`.
    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements: Vec<Stmt> = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        statements
    }

    /// First unassigned expression id after this parse.
    pub fn next_expr_id(&self) -> ExprId {
        self.next_id
    }

    pub fn into_errors(self) -> Vec<LoxError> {
        self.errors
    }

    // ─────────────────────────────────────────────────────────────────────
    // Declarations
    // ─────────────────────────────────────────────────────────────────────

    /// One declaration, or `None` after reporting an error and
    /// synchronizing at the next statement boundary.
    fn declaration(&mut self) -> Option<Stmt> {
        let result: Result<Stmt> = if self.match_tokens(&[TokenType::CLASS]) {
            self.class_declaration()
        } else if self.match_tokens(&[TokenType::FUN]) {
            self.function("function").map(Stmt::Function)
        } else if self.match_tokens(&[TokenType::VAR]) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),

            Err(e) => {
                self.errors.push(e);
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self) -> Result<Stmt> {
        let name: Token = self.consume(TokenType::IDENTIFIER, "Expect class name.")?;

        let superclass: Option<Expr> = if self.match_tokens(&[TokenType::LESS]) {
            let super_name: Token =
                self.consume(TokenType::IDENTIFIER, "Expect superclass name.")?;

            Some(Expr::Variable {
                id: self.new_id(),
                name: super_name,
            })
        } else {
            None
        };

        self.consume(TokenType::LEFT_BRACE, "Expect '{' before class body.")?;

        let mut methods: Vec<Rc<FunctionDecl>> = Vec::new();

        while !self.check(&TokenType::RIGHT_BRACE) && !self.is_at_end() {
            methods.push(self.function("method")?);
        }

        self.consume(TokenType::RIGHT_BRACE, "Expect '}' after class body.")?;

        Ok(Stmt::Class {
            name,
            superclass,
            methods,
        })
    }

    fn function(&mut self, kind: &str) -> Result<Rc<FunctionDecl>> {
        let name: Token =
            self.consume(TokenType::IDENTIFIER, &format!("Expect {} name.", kind))?;

        self.consume(
            TokenType::LEFT_PAREN,
            &format!("Expect '(' after {} name.", kind),
        )?;

        let mut params: Vec<Token> = Vec::new();

        if !self.check(&TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= MAX_ARITY {
                    // Reported but not thrown: the parser is at a known
                    // position and can keep consuming parameters.
                    let e = self.error_at(
                        &self.lookahead.clone(),
                        "Can't have more than 255 parameters.",
                    );
                    self.errors.push(e);
                }

                params.push(self.consume(TokenType::IDENTIFIER, "Expect parameter name.")?);

                if !self.match_tokens(&[TokenType::COMMA]) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expect ')' after parameters.")?;

        self.consume(
            TokenType::LEFT_BRACE,
            &format!("Expect '{{' before {} body.", kind),
        )?;

        let body: Vec<Stmt> = self.block()?;

        Ok(Rc::new(FunctionDecl { name, params, body }))
    }

    fn var_declaration(&mut self) -> Result<Stmt> {
        let name: Token = self.consume(TokenType::IDENTIFIER, "Expect variable name.")?;

        let initializer: Option<Expr> = if self.match_tokens(&[TokenType::EQUAL]) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            TokenType::SEMICOLON,
            "Expect ';' after variable declaration.",
        )?;

        Ok(Stmt::Var { name, initializer })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────

    fn statement(&mut self) -> Result<Stmt> {
        if self.match_tokens(&[TokenType::FOR]) {
            return self.for_statement();
        }

        if self.match_tokens(&[TokenType::IF]) {
            return self.if_statement();
        }

        if self.match_tokens(&[TokenType::PRINT]) {
            return self.print_statement();
        }

        if self.match_tokens(&[TokenType::RETURN]) {
            return self.return_statement();
        }

        if self.match_tokens(&[TokenType::WHILE]) {
            return self.while_statement();
        }

        if self.match_tokens(&[TokenType::LEFT_BRACE]) {
            return Ok(Stmt::Block(self.block()?));
        }

        self.expression_statement()
    }

    /// `for` has no statement node of its own: it is desugared into the
    /// `block`/`while`/`expression` primitives it is made of.
    fn for_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expect '(' after 'for'.")?;

        let initializer: Option<Stmt> = if self.match_tokens(&[TokenType::SEMICOLON]) {
            None
        } else if self.match_tokens(&[TokenType::VAR]) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition: Option<Expr> = if !self.check(&TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expect ';' after loop condition.")?;

        let increment: Option<Expr> = if !self.check(&TokenType::RIGHT_PAREN) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::RIGHT_PAREN, "Expect ')' after for clauses.")?;

        let mut body: Stmt = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        let condition: Expr = condition.unwrap_or(Expr::Literal(LiteralValue::True));

        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expect '(' after 'if'.")?;
        let condition: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expect ')' after if condition.")?;

        let then_branch: Stmt = self.statement()?;

        let else_branch: Option<Box<Stmt>> = if self.match_tokens(&[TokenType::ELSE]) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch: Box::new(then_branch),
            else_branch,
        })
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        let value: Expr = self.expression()?;
        self.consume(TokenType::SEMICOLON, "Expect ';' after value.")?;

        Ok(Stmt::Print(value))
    }

    fn return_statement(&mut self) -> Result<Stmt> {
        let keyword: Token = self.previous().clone();

        let value: Option<Expr> = if !self.check(&TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expect ';' after return value.")?;

        Ok(Stmt::Return { keyword, value })
    }

    fn while_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expect '(' after 'while'.")?;
        let condition: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expect ')' after condition.")?;

        let body: Stmt = self.statement()?;

        Ok(Stmt::While {
            condition,
            body: Box::new(body),
        })
    }

    fn block(&mut self) -> Result<Vec<Stmt>> {
        let mut statements: Vec<Stmt> = Vec::new();

        while !self.check(&TokenType::RIGHT_BRACE) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(TokenType::RIGHT_BRACE, "Expect '}' after block.")?;

        Ok(statements)
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let expr: Expr = self.expression()?;
        self.consume(TokenType::SEMICOLON, "Expect ';' after expression.")?;

        Ok(Stmt::Expression(expr))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Expressions, lowest precedence first
    // ─────────────────────────────────────────────────────────────────────

    fn expression(&mut self) -> Result<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr> {
        let expr: Expr = self.or()?;

        if self.match_tokens(&[TokenType::EQUAL]) {
            let equals: Token = self.previous().clone();
            let value: Expr = self.assignment()?;

            return Ok(match expr {
                Expr::Variable { name, .. } => Expr::Assign {
                    id: self.new_id(),
                    name,
                    value: Box::new(value),
                },

                Expr::Get { object, name } => Expr::Set {
                    object,
                    name,
                    value: Box::new(value),
                },

                // Reported without synchronizing: the right-hand side has
                // already been consumed and the parser is at a known spot.
                other => {
                    let e = self.error_at(&equals, "Invalid assignment target.");
                    self.errors.push(e);
                    other
                }
            });
        }

        Ok(expr)
    }

    fn or(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.and()?;

        while self.match_tokens(&[TokenType::OR]) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.and()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn and(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.equality()?;

        while self.match_tokens(&[TokenType::AND]) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.equality()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.comparison()?;

        while self.match_tokens(&[TokenType::BANG_EQUAL, TokenType::EQUAL_EQUAL]) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.comparison()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.term()?;

        while self.match_tokens(&[
            TokenType::GREATER,
            TokenType::GREATER_EQUAL,
            TokenType::LESS,
            TokenType::LESS_EQUAL,
        ]) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.term()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.factor()?;

        while self.match_tokens(&[TokenType::MINUS, TokenType::PLUS]) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.factor()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.unary()?;

        while self.match_tokens(&[TokenType::SLASH, TokenType::STAR]) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.unary()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.match_tokens(&[TokenType::BANG, TokenType::MINUS]) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.unary()?;

            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }

        self.call()
    }

    fn call(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.primary()?;

        loop {
            if self.match_tokens(&[TokenType::LEFT_PAREN]) {
                expr = self.finish_call(expr)?;
            } else if self.match_tokens(&[TokenType::DOT]) {
                let name: Token =
                    self.consume(TokenType::IDENTIFIER, "Expect property name after '.'.")?;

                expr = Expr::Get {
                    object: Box::new(expr),
                    name,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr> {
        let mut arguments: Vec<Expr> = Vec::new();

        if !self.check(&TokenType::RIGHT_PAREN) {
            loop {
                if arguments.len() >= MAX_ARITY {
                    let e = self.error_at(
                        &self.lookahead.clone(),
                        "Can't have more than 255 arguments.",
                    );
                    self.errors.push(e);
                }

                arguments.push(self.expression()?);

                if !self.match_tokens(&[TokenType::COMMA]) {
                    break;
                }
            }
        }

        let paren: Token = self.consume(TokenType::RIGHT_PAREN, "Expect ')' after arguments.")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    fn primary(&mut self) -> Result<Expr> {
        if self.match_tokens(&[TokenType::FALSE]) {
            return Ok(Expr::Literal(LiteralValue::False));
        }

        if self.match_tokens(&[TokenType::TRUE]) {
            return Ok(Expr::Literal(LiteralValue::True));
        }

        if self.match_tokens(&[TokenType::NIL]) {
            return Ok(Expr::Literal(LiteralValue::Nil));
        }

        if self.match_tokens(&[TokenType::NUMBER(0.0), TokenType::STRING(String::new())]) {
            let literal: LiteralValue = match &self.previous().token_type {
                TokenType::NUMBER(n) => LiteralValue::Number(*n),
                TokenType::STRING(s) => LiteralValue::Str(s.clone()),
                _ => unreachable!("literal token just matched"),
            };

            return Ok(Expr::Literal(literal));
        }

        if self.match_tokens(&[TokenType::SUPER]) {
            let keyword: Token = self.previous().clone();
            self.consume(TokenType::DOT, "Expect '.' after 'super'.")?;

            let method: Token =
                self.consume(TokenType::IDENTIFIER, "Expect superclass method name.")?;

            return Ok(Expr::Super {
                id: self.new_id(),
                keyword,
                method,
            });
        }

        if self.match_tokens(&[TokenType::THIS]) {
            return Ok(Expr::This {
                id: self.new_id(),
                keyword: self.previous().clone(),
            });
        }

        if self.match_tokens(&[TokenType::IDENTIFIER]) {
            return Ok(Expr::Variable {
                id: self.new_id(),
                name: self.previous().clone(),
            });
        }

        if self.match_tokens(&[TokenType::LEFT_PAREN]) {
            let expr: Expr = self.expression()?;
            self.consume(TokenType::RIGHT_PAREN, "Expect ')' after expression.")?;

            return Ok(Expr::Grouping(Box::new(expr)));
        }

        Err(self.error_at(&self.lookahead.clone(), "Expect expression."))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Token-stream primitives
    // ─────────────────────────────────────────────────────────────────────

    fn match_tokens(&mut self, types: &[TokenType]) -> bool {
        for token_type in types {
            if self.check(token_type) {
                self.advance();
                return true;
            }
        }

        false
    }

    fn check(&self, token_type: &TokenType) -> bool {
        &self.lookahead.token_type == token_type
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> Result<Token> {
        if self.check(&token_type) {
            return Ok(self.advance());
        }

        Err(self.error_at(&self.lookahead.clone(), message))
    }

    /// Consume the lookahead and return it.  At `EOF` the cursor stays put.
    fn advance(&mut self) -> Token {
        if self.lookahead.token_type != TokenType::EOF {
            let line: usize = self.lookahead.line;
            let next: Token = next_good_token(&mut self.scanner, &mut self.errors, line);
            let consumed: Token = std::mem::replace(&mut self.lookahead, next);

            self.previous = Some(consumed.clone());

            consumed
        } else {
            self.lookahead.clone()
        }
    }

    fn is_at_end(&self) -> bool {
        self.lookahead.token_type == TokenType::EOF
    }

    fn previous(&self) -> &Token {
        self.previous.as_ref().expect("No previous token")
    }

    fn new_id(&mut self) -> ExprId {
        let id: ExprId = self.next_id;
        self.next_id += 1;
        id
    }

    fn error_at(&self, token: &Token, message: &str) -> LoxError {
        let location: String = if token.token_type == TokenType::EOF {
            "at end".to_string()
        } else {
            format!("at '{}'", token.lexeme)
        };

        LoxError::parse(token.line, format!("{}: {}", location, message))
    }

    /// Discard tokens until just past a `;` or just before a token that
    /// opens a new statement, so one syntax error doesn't cascade.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if let Some(prev) = &self.previous {
                if prev.token_type == TokenType::SEMICOLON {
                    return;
                }
            }

            match self.lookahead.token_type {
                TokenType::CLASS
                | TokenType::FUN
                | TokenType::VAR
                | TokenType::FOR
                | TokenType::IF
                | TokenType::WHILE
                | TokenType::PRINT
                | TokenType::RETURN => return,

                _ => {
                    self.advance();
                }
            }
        }
    }
}

/// Pull the next token, routing lexical errors into `errors` so scanning
/// continues past them.  The scanner always terminates with `EOF`; the
/// fallback token only exists for the exhausted-iterator case.
fn next_good_token(scanner: &mut Scanner, errors: &mut Vec<LoxError>, line_hint: usize) -> Token {
    loop {
        match scanner.next() {
            Some(Ok(token)) => return token,

            Some(Err(e)) => errors.push(e),

            None => return Token::new(TokenType::EOF, String::new(), line_hint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast_printer::AstPrinter;

    fn parse_program(source: &str) -> (Vec<Stmt>, Vec<LoxError>) {
        let scanner = Scanner::new(source.as_bytes().to_vec());
        let mut parser = Parser::new(scanner, 0);
        let statements = parser.parse();

        (statements, parser.into_errors())
    }

    fn printed(source: &str) -> Vec<String> {
        let (statements, errors) = parse_program(source);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);

        statements.iter().map(AstPrinter::print_stmt).collect()
    }

    #[test]
    fn precedence_of_arithmetic() {
        assert_eq!(printed("1 + 2 * 3;"), vec!["(; (+ 1.0 (* 2.0 3.0)))"]);
    }

    #[test]
    fn grouping_overrides_precedence() {
        assert_eq!(
            printed("(1 + 2) * 3;"),
            vec!["(; (* (group (+ 1.0 2.0)) 3.0))"]
        );
    }

    #[test]
    fn comparison_binds_looser_than_term() {
        assert_eq!(printed("1 + 2 < 4;"), vec!["(; (< (+ 1.0 2.0) 4.0))"]);
    }

    #[test]
    fn logical_operators_build_logical_nodes() {
        assert_eq!(
            printed("print a or b and c;"),
            vec!["(print (or a (and b c)))"]
        );
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(printed("a = b = 1;"), vec!["(; (= a (= b 1.0)))"]);
    }

    #[test]
    fn property_assignment_becomes_set() {
        assert_eq!(printed("a.b = 2;"), vec!["(; (set a b 2.0))"]);
    }

    #[test]
    fn invalid_assignment_target_reports_without_sync() {
        let (statements, errors) = parse_program("1 = 2; print 3;");

        // Both statements survive: the error does not cascade.
        assert_eq!(statements.len(), 2);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("Invalid assignment target."));
    }

    #[test]
    fn for_loop_desugars_to_while() {
        let forms = printed("for (var i = 0; i < 3; i = i + 1) print i;");

        assert_eq!(forms.len(), 1);
        let form = &forms[0];
        assert!(form.starts_with("(block (var i"), "got: {}", form);
        assert!(form.contains("(while (< i 3.0)"), "got: {}", form);
        assert!(form.contains("(= i (+ i 1.0))"), "got: {}", form);
    }

    #[test]
    fn for_loop_without_clauses_runs_on_true() {
        let forms = printed("for (;;) print 1;");

        assert_eq!(forms, vec!["(while true (print 1.0))"]);
    }

    #[test]
    fn call_and_get_chain() {
        assert_eq!(
            printed("a.b(1).c;"),
            vec!["(; (get (call (get a b) 1.0) c))"]
        );
    }

    #[test]
    fn class_with_superclass_and_methods() {
        let (statements, errors) = parse_program("class B < A { init(x) {} method() {} }");

        assert!(errors.is_empty());
        assert_eq!(statements.len(), 1);

        match &statements[0] {
            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                assert_eq!(name.lexeme, "B");
                assert!(matches!(superclass, Some(Expr::Variable { .. })));
                assert_eq!(methods.len(), 2);
                assert_eq!(methods[0].name.lexeme, "init");
                assert_eq!(methods[0].params.len(), 1);
            }

            other => panic!("expected class declaration, got {:?}", other),
        }
    }

    #[test]
    fn bad_declaration_synchronizes_to_next_statement() {
        let (statements, errors) = parse_program("var = 1;\nprint 2;");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("Expect variable name."));
        assert_eq!(statements.len(), 1);
        assert!(matches!(statements[0], Stmt::Print(_)));
    }

    #[test]
    fn lexical_errors_are_collected_during_parse() {
        let (statements, errors) = parse_program("var a = 1; @ var b = 2;");

        assert_eq!(statements.len(), 2);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("Unexpected character"));
    }

    #[test]
    fn expression_ids_are_unique_and_monotonic() {
        let (statements, _) = parse_program("a = b + c;");

        fn collect_ids(expr: &Expr, ids: &mut Vec<ExprId>) {
            match expr {
                Expr::Assign { id, value, .. } => {
                    ids.push(*id);
                    collect_ids(value, ids);
                }
                Expr::Binary { left, right, .. } => {
                    collect_ids(left, ids);
                    collect_ids(right, ids);
                }
                Expr::Variable { id, .. } => ids.push(*id),
                _ => {}
            }
        }

        let mut ids = Vec::new();
        if let Stmt::Expression(expr) = &statements[0] {
            collect_ids(expr, &mut ids);
        }

        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids.len(), 3);
        assert_eq!(sorted.len(), 3);
    }
}
