//! AST (abstract syntax tree) types for the Alonso language.
//!
//! Trees are built once by the parser and never mutated afterwards. Every
//! node implements `Display`, rendering the canonical fully-parenthesized
//! form (`(1 + (2 * 3))`), which the parser tests assert against.

use std::fmt;

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    /// Logical negation `!`
    Not,
    /// Arithmetic negation `-`
    Neg,
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrefixOp::Not => "!",
            PrefixOp::Neg => "-",
        })
    }
}

/// Infix (binary) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Mod => "%",
            InfixOp::Eq => "==",
            InfixOp::NotEq => "!=",
            InfixOp::Lt => "<",
            InfixOp::Le => "<=",
            InfixOp::Gt => ">",
            InfixOp::Ge => ">=",
            InfixOp::And => "&&",
            InfixOp::Or => "||",
        })
    }
}

/// Expressions (literals, operations, calls, containers).
#[derive(Debug, Clone)]
pub enum Expr {
    Ident(String),
    Number(f64),
    Str(String),
    Bool(bool),
    /// Array literal `[a, b, c]`
    Array(Vec<Expr>),
    Prefix {
        op: PrefixOp,
        right: Box<Expr>,
    },
    Infix {
        left: Box<Expr>,
        op: InfixOp,
        right: Box<Expr>,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// Name-only assignment `x = expr`; indexed targets are not assignable.
    Assign {
        name: String,
        value: Box<Expr>,
    },
}

/// A braced statement sequence. Does not introduce a scope by itself.
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

/// Statements (declarations, control flow, expression statements).
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `grid name = value`: introduces or rebinds `name` in the current scope
    VarDecl { name: String, value: Expr },
    /// `pace name(params) { body }`: binds `name` to a closure over the
    /// current scope
    FnDecl {
        name: String,
        params: Vec<String>,
        body: Block,
    },
    /// `circuit (cond) { .. } [else_circuit { .. }]`
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },
    /// `loop (init cond; update) { body }`: classic three-part loop
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        update: Option<Box<Stmt>>,
        body: Block,
    },
    /// `while_racing (cond) { body }`
    While { cond: Expr, body: Block },
    /// `return_pit [value]`
    Return(Option<Expr>),
    /// `break_flag`
    Break,
    /// `continue_race`
    Continue,
    Block(Block),
    ExprStmt(Expr),
}

/// Entire program: a statement sequence.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => f.write_str(name),
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Str(s) => write!(f, "\"{}\"", s),
            Expr::Bool(b) => write!(f, "{}", b),
            Expr::Array(elems) => {
                write!(f, "[")?;
                write_joined(f, elems)?;
                write!(f, "]")
            }
            Expr::Prefix { op, right } => write!(f, "({}{})", op, right),
            Expr::Infix { left, op, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Index { target, index } => write!(f, "({}[{}])", target, index),
            Expr::Call { callee, args } => {
                write!(f, "({}(", callee)?;
                write_joined(f, args)?;
                write!(f, "))")
            }
            Expr::Assign { name, value } => write!(f, "({} = {})", name, value),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for stmt in &self.stmts {
            write!(f, "{}", stmt)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::VarDecl { name, value } => write!(f, "grid {} = {};", name, value),
            Stmt::FnDecl { name, params, body } => {
                write!(f, "pace {}({}) {}", name, params.join(", "), body)
            }
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                write!(f, "circuit ({}) {}", cond, then_block)?;
                if let Some(alt) = else_block {
                    write!(f, " else_circuit {}", alt)?;
                }
                Ok(())
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
            } => {
                write!(f, "loop (")?;
                if let Some(init) = init {
                    write!(f, "{}", init)?;
                }
                write!(f, " ")?;
                if let Some(cond) = cond {
                    write!(f, "{}", cond)?;
                }
                write!(f, "; ")?;
                if let Some(update) = update {
                    write!(f, "{}", update)?;
                }
                write!(f, ") {}", body)
            }
            Stmt::While { cond, body } => write!(f, "while_racing ({}) {}", cond, body),
            Stmt::Return(Some(value)) => write!(f, "return_pit {};", value),
            Stmt::Return(None) => write!(f, "return_pit;"),
            Stmt::Break => write!(f, "break_flag;"),
            Stmt::Continue => write!(f, "continue_race;"),
            Stmt::Block(block) => write!(f, "{}", block),
            Stmt::ExprStmt(expr) => write!(f, "{};", expr),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.stmts {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}
