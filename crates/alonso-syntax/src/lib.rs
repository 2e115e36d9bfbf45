//! Alonso language syntax definitions and abstract syntax tree.
//!
//! This crate provides the foundational syntax elements for the Alonso
//! programming language, including token definitions, abstract syntax tree
//! (AST) nodes, and error handling utilities. All other crates in the
//! Alonso workspace depend on these fundamental types.
//!
//! # Overview
//!
//! The crate is organized into three main modules:
//!
//! - [`token`]: token types and lexical elements
//! - [`ast`]: abstract syntax tree node definitions
//! - [`error`]: error handling types and utilities
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │              Parser                 │  <- Produces AST
//! ├─────────────────────────────────────┤
//! │               Lexer                 │  <- Produces Tokens
//! ├─────────────────────────────────────┤
//! │           Source Code               │  <- Raw text input
//! └─────────────────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ## Working with tokens
//!
//! ```rust
//! use alonso_syntax::{Token, TokenKind};
//!
//! let token = Token::new(TokenKind::Ident, "lap_count", 1, 1);
//! assert_eq!(token.kind.to_string(), "IDENTIFIER");
//! ```
//!
//! ## Building AST nodes
//!
//! ```rust
//! use alonso_syntax::{Expr, Stmt};
//!
//! let expr = Expr::Number(42.0);
//! let stmt = Stmt::ExprStmt(expr);
//! assert_eq!(stmt.to_string(), "42;");
//! ```

/// Token definitions and lexical analysis types.
pub mod token;

/// Abstract syntax tree node definitions.
pub mod ast;

/// Error handling utilities and types.
pub mod error;

pub use ast::*;
pub use error::*;
pub use token::*;
