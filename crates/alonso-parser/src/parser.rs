//! Pratt precedence-climbing parser for the Alonso language.
//!
//! The parser keeps a two-token window (`current`, `peek`) over the token
//! stream. Diagnostics accumulate in a list and a (possibly partial) AST is
//! always produced: a failed statement is dropped, the cursor advances one
//! token, and parsing continues, so a single run can report several errors.

use alonso_syntax::ast::{Block, Expr, InfixOp, PrefixOp, Program, Stmt};
use alonso_syntax::error::Error;
use alonso_syntax::token::{Token, TokenKind};

/// Binding strength of infix positions, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Logical, // && ||
    Equals,  // == != =
    Compare, // < <= > >=
    Sum,     // + -
    Product, // * / %
    Prefix,  // -x !x
    Call,    // f(x)
    Index,   // a[i]
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::AndAnd | TokenKind::OrOr => Precedence::Logical,
        TokenKind::EqEq | TokenKind::NotEq | TokenKind::Assign => Precedence::Equals,
        TokenKind::Less | TokenKind::LessEq | TokenKind::Greater | TokenKind::GreaterEq => {
            Precedence::Compare
        }
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

fn infix_op(kind: TokenKind) -> Option<InfixOp> {
    Some(match kind {
        TokenKind::Plus => InfixOp::Add,
        TokenKind::Minus => InfixOp::Sub,
        TokenKind::Star => InfixOp::Mul,
        TokenKind::Slash => InfixOp::Div,
        TokenKind::Percent => InfixOp::Mod,
        TokenKind::EqEq => InfixOp::Eq,
        TokenKind::NotEq => InfixOp::NotEq,
        TokenKind::Less => InfixOp::Lt,
        TokenKind::LessEq => InfixOp::Le,
        TokenKind::Greater => InfixOp::Gt,
        TokenKind::GreaterEq => InfixOp::Ge,
        TokenKind::AndAnd => InfixOp::And,
        TokenKind::OrOr => InfixOp::Or,
        _ => return None,
    })
}

/// Recursive-descent parser over a fully lexed token buffer.
pub struct Parser {
    tokens: Vec<Token>,
    next: usize,
    current: Token,
    peek: Token,
    errors: Vec<Error>,
}

impl Parser {
    /// Create a parser and prime the two-token window.
    pub fn new(tokens: Vec<Token>) -> Self {
        let placeholder = Token::new(TokenKind::Eof, "", 1, 1);
        let mut p = Self {
            tokens,
            next: 0,
            current: placeholder.clone(),
            peek: placeholder,
            errors: Vec::new(),
        };
        p.next_token();
        p.next_token();
        p
    }

    /// Diagnostics collected so far, in source order.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    fn take_next(&mut self) -> Token {
        if self.next < self.tokens.len() {
            let tk = self.tokens[self.next].clone();
            self.next += 1;
            tk
        } else {
            let (line, col) = self
                .tokens
                .last()
                .map(|t| (t.line, t.col))
                .unwrap_or((1, 1));
            Token::new(TokenKind::Eof, "", line, col)
        }
    }

    fn next_token(&mut self) {
        let upcoming = self.take_next();
        self.current = std::mem::replace(&mut self.peek, upcoming);
    }

    /// Advance when `peek` has the wanted kind; otherwise record a
    /// diagnostic and leave the cursor in place.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek.kind == kind {
            self.next_token();
            true
        } else {
            self.peek_error(kind);
            false
        }
    }

    fn peek_error(&mut self, kind: TokenKind) {
        self.errors.push(Error::parse(
            format!(
                "expected next token to be {}, got {} instead",
                kind, self.peek.kind
            ),
            self.peek.span(),
        ));
    }

    /// Parse the whole token stream into a program, skipping blank lines
    /// between statements.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while self.current.kind != TokenKind::Eof {
            if self.current.kind == TokenKind::Newline {
                self.next_token();
                continue;
            }
            if let Some(stmt) = self.parse_statement() {
                program.stmts.push(stmt);
            }
            self.next_token();
        }
        program
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.current.kind {
            TokenKind::Grid => self.parse_var_decl(),
            TokenKind::Pace => self.parse_fn_decl(),
            TokenKind::Circuit => self.parse_if(),
            TokenKind::Loop => self.parse_for(),
            TokenKind::WhileRacing => self.parse_while(),
            TokenKind::ReturnPit => self.parse_return(),
            TokenKind::BreakFlag => self.parse_break(),
            TokenKind::ContinueRace => self.parse_continue(),
            TokenKind::LBrace => Some(Stmt::Block(self.parse_block())),
            _ => self.parse_expression_statement(),
        }
    }

    /// `grid IDENT '=' expression [';']`
    fn parse_var_decl(&mut self) -> Option<Stmt> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.current.lexeme.clone();
        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek.kind == TokenKind::Semicolon {
            self.next_token();
        }
        Some(Stmt::VarDecl { name, value })
    }

    /// `pace IDENT '(' paramlist ')' block`
    fn parse_fn_decl(&mut self) -> Option<Stmt> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.current.lexeme.clone();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let params = self.parse_fn_params()?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block();
        Some(Stmt::FnDecl { name, params, body })
    }

    fn parse_fn_params(&mut self) -> Option<Vec<String>> {
        let mut params = Vec::new();
        if self.peek.kind == TokenKind::RParen {
            self.next_token();
            return Some(params);
        }
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        params.push(self.current.lexeme.clone());
        while self.peek.kind == TokenKind::Comma {
            self.next_token();
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            params.push(self.current.lexeme.clone());
        }
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(params)
    }

    /// `circuit '(' expression ')' block [else_circuit block]`
    fn parse_if(&mut self) -> Option<Stmt> {
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();
        let cond = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let then_block = self.parse_block();
        let else_block = if self.peek.kind == TokenKind::ElseCircuit {
            self.next_token();
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block())
        } else {
            None
        };
        Some(Stmt::If {
            cond,
            then_block,
            else_block,
        })
    }

    /// `loop '(' init_stmt cond ';' update ')' block`
    ///
    /// The init statement consumes its own trailing `;` (var-decl and
    /// expression statements do), and exactly one `;` separates the
    /// condition from the update.
    fn parse_for(&mut self) -> Option<Stmt> {
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();
        let init = self.parse_statement().map(Box::new);
        if self.current.kind == TokenKind::Semicolon {
            self.next_token();
        } else {
            self.errors.push(Error::parse(
                format!(
                    "expected next token to be {}, got {} instead",
                    TokenKind::Semicolon,
                    self.current.kind
                ),
                self.current.span(),
            ));
            return None;
        }
        let cond = self.parse_expression(Precedence::Lowest);
        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }
        self.next_token();
        let update = self.parse_expression_statement().map(Box::new);
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block();
        Some(Stmt::For {
            init,
            cond,
            update,
            body,
        })
    }

    /// `while_racing '(' expression ')' block`
    fn parse_while(&mut self) -> Option<Stmt> {
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();
        let cond = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block();
        Some(Stmt::While { cond, body })
    }

    /// `return_pit [expression] [';']`: a `;` or newline right after the
    /// keyword means a bare return.
    fn parse_return(&mut self) -> Option<Stmt> {
        let mut value = None;
        if self.peek.kind != TokenKind::Semicolon && self.peek.kind != TokenKind::Newline {
            self.next_token();
            value = self.parse_expression(Precedence::Lowest);
        }
        if self.peek.kind == TokenKind::Semicolon {
            self.next_token();
        }
        Some(Stmt::Return(value))
    }

    fn parse_break(&mut self) -> Option<Stmt> {
        if self.peek.kind == TokenKind::Semicolon {
            self.next_token();
        }
        Some(Stmt::Break)
    }

    fn parse_continue(&mut self) -> Option<Stmt> {
        if self.peek.kind == TokenKind::Semicolon {
            self.next_token();
        }
        Some(Stmt::Continue)
    }

    /// `'{' statement* '}'`: newlines inside blocks are skipped.
    fn parse_block(&mut self) -> Block {
        let mut stmts = Vec::new();
        self.next_token();
        while self.current.kind != TokenKind::RBrace && self.current.kind != TokenKind::Eof {
            if self.current.kind == TokenKind::Newline {
                self.next_token();
                continue;
            }
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
            }
            self.next_token();
        }
        Block { stmts }
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        if self.peek.kind == TokenKind::Semicolon {
            self.next_token();
        }
        Some(Stmt::ExprStmt(expr))
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let mut left = match self.current.kind {
            TokenKind::Ident => Expr::Ident(self.current.lexeme.clone()),
            TokenKind::Number => self.parse_number_literal()?,
            TokenKind::Str => Expr::Str(self.current.lexeme.clone()),
            TokenKind::Bool => Expr::Bool(self.current.lexeme == "true"),
            TokenKind::LBracket => self.parse_array_literal()?,
            TokenKind::Minus | TokenKind::Bang => self.parse_prefix_expression()?,
            TokenKind::LParen => self.parse_grouped_expression()?,
            other => {
                self.errors.push(Error::parse(
                    format!("no prefix parse function for {} found", other),
                    self.current.span(),
                ));
                return None;
            }
        };

        while self.peek.kind != TokenKind::Semicolon && precedence < precedence_of(self.peek.kind) {
            left = match self.peek.kind {
                TokenKind::LParen => {
                    self.next_token();
                    self.parse_call_expression(left)?
                }
                TokenKind::LBracket => {
                    self.next_token();
                    self.parse_index_expression(left)?
                }
                TokenKind::Assign => {
                    self.next_token();
                    self.parse_assignment_expression(left)?
                }
                kind if infix_op(kind).is_some() => {
                    self.next_token();
                    self.parse_infix_expression(left)?
                }
                _ => return Some(left),
            };
        }

        Some(left)
    }

    fn parse_number_literal(&mut self) -> Option<Expr> {
        match self.current.lexeme.parse::<f64>() {
            Ok(value) => Some(Expr::Number(value)),
            Err(_) => {
                self.errors.push(Error::parse(
                    format!("could not parse \"{}\" as number", self.current.lexeme),
                    self.current.span(),
                ));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let op = match self.current.kind {
            TokenKind::Bang => PrefixOp::Not,
            _ => PrefixOp::Neg,
        };
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expr::Prefix {
            op,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let op = infix_op(self.current.kind)?;
        let precedence = precedence_of(self.current.kind);
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expr::Infix {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    /// `'[' (expression (',' expression)*)? ']'`
    fn parse_array_literal(&mut self) -> Option<Expr> {
        let elems = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expr::Array(elems))
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expr>> {
        let mut items = Vec::new();
        if self.peek.kind == end {
            self.next_token();
            return Some(items);
        }
        self.next_token();
        items.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek.kind == TokenKind::Comma {
            self.next_token();
            self.next_token();
            items.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(items)
    }

    fn parse_call_expression(&mut self, callee: Expr) -> Option<Expr> {
        let args = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expr::Call {
            callee: Box::new(callee),
            args,
        })
    }

    fn parse_index_expression(&mut self, target: Expr) -> Option<Expr> {
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        Some(Expr::Index {
            target: Box::new(target),
            index: Box::new(index),
        })
    }

    /// The left-hand side must already be a bare identifier node.
    fn parse_assignment_expression(&mut self, left: Expr) -> Option<Expr> {
        let name = match left {
            Expr::Ident(name) => name,
            _ => {
                self.errors.push(Error::parse(
                    "invalid assignment target",
                    self.current.span(),
                ));
                return None;
            }
        };
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        Some(Expr::Assign {
            name,
            value: Box::new(value),
        })
    }
}
