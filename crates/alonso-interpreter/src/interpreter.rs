//! Tree-walking evaluator and top-level driver.
//!
//! Every statement handler returns a [`Flow`] so that `return_pit`,
//! `break_flag` and `continue_race` bubble through nested blocks until the
//! construct that consumes them; runtime failures ride the `Err` channel
//! and abort the whole run.

use std::rc::Rc;

use alonso_lexer::Lexer;
use alonso_parser::Parser;
use alonso_syntax::ast::{Block, Expr, InfixOp, PrefixOp, Program, Stmt};
use alonso_syntax::err;
use alonso_syntax::error::Result;

use crate::builtins;
use crate::env::{Env, EnvRef};
use crate::flow::Flow;
use crate::value::{Function, Value};

pub struct Interpreter {
    /// Root environment; holds the builtins and persists across `execute`
    /// calls so the REPL keeps its state.
    env: EnvRef,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        let env = Env::new_root();
        builtins::install(&env);
        Self { env }
    }

    /// Lex, parse and evaluate a source string against the interpreter's
    /// root environment.
    ///
    /// Parse diagnostics are printed one per line (`Parser error: …`) and
    /// abort the run before any evaluation.
    pub fn execute(&mut self, source: &str) -> Result<Option<Value>> {
        let tokens = Lexer::new(source).tokenize();
        let mut parser = Parser::new(tokens);
        let program = parser.parse_program();
        if !parser.errors().is_empty() {
            for diag in parser.errors() {
                println!("Parser error: {}", diag.message());
            }
            return err!("parsing failed");
        }
        self.run_program(&program)
    }

    /// Evaluate a parsed program. A top-level `return_pit` unwraps into the
    /// program result; otherwise the final statement's value is produced.
    pub fn run_program(&mut self, program: &Program) -> Result<Option<Value>> {
        let env = self.env.clone();
        let mut last = None;
        for stmt in &program.stmts {
            match self.exec_stmt(&env, stmt)? {
                Flow::Normal(v) => last = Some(v),
                Flow::Return(v) => return Ok(Some(v)),
                Flow::Break => return err!("'break_flag' outside of loop"),
                Flow::Continue => return err!("'continue_race' outside of loop"),
            }
        }
        Ok(last)
    }

    /// Statements run in order; any non-normal flow stops the block and
    /// propagates. The block itself does not open a scope.
    fn exec_block(&self, env: &EnvRef, block: &Block) -> Result<Flow> {
        let mut last = Value::Null;
        for stmt in &block.stmts {
            match self.exec_stmt(env, stmt)? {
                Flow::Normal(v) => last = v,
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal(last))
    }

    fn exec_stmt(&self, env: &EnvRef, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::VarDecl { name, value } => {
                let v = self.eval_expr(env, value)?;
                env.borrow_mut().set(name.clone(), v.clone());
                Ok(Flow::Normal(v))
            }
            Stmt::FnDecl { name, params, body } => {
                let function = Value::Function(Rc::new(Function {
                    params: params.clone(),
                    body: body.clone(),
                    env: env.clone(),
                }));
                env.borrow_mut().set(name.clone(), function.clone());
                Ok(Flow::Normal(function))
            }
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                let cond = self.eval_expr(env, cond)?;
                if cond.is_truthy() {
                    self.exec_block(env, then_block)
                } else if let Some(alt) = else_block {
                    self.exec_block(env, alt)
                } else {
                    Ok(Flow::Normal(Value::Null))
                }
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
            } => self.exec_for(env, init.as_deref(), cond.as_ref(), update.as_deref(), body),
            Stmt::While { cond, body } => self.exec_while(env, cond, body),
            Stmt::Return(value) => {
                let v = match value {
                    Some(expr) => self.eval_expr(env, expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(v))
            }
            Stmt::Break => Ok(Flow::Break),
            Stmt::Continue => Ok(Flow::Continue),
            Stmt::Block(block) => self.exec_block(env, block),
            Stmt::ExprStmt(expr) => Ok(Flow::Normal(self.eval_expr(env, expr)?)),
        }
    }

    /// The loop header opens its own scope; init, condition, update and body
    /// all run inside it.
    fn exec_for(
        &self,
        env: &EnvRef,
        init: Option<&Stmt>,
        cond: Option<&Expr>,
        update: Option<&Stmt>,
        body: &Block,
    ) -> Result<Flow> {
        let loop_env = Env::enclosed(env.clone());
        if let Some(init) = init {
            self.exec_stmt(&loop_env, init)?;
        }
        let mut last = Value::Null;
        loop {
            if let Some(cond) = cond {
                if !self.eval_expr(&loop_env, cond)?.is_truthy() {
                    break;
                }
            }
            match self.exec_block(&loop_env, body)? {
                Flow::Normal(v) => last = v,
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::Break => return Ok(Flow::Normal(Value::Null)),
                // fall through to the update expression
                Flow::Continue => {}
            }
            if let Some(update) = update {
                self.exec_stmt(&loop_env, update)?;
            }
        }
        Ok(Flow::Normal(last))
    }

    /// Unlike `loop`, the body shares the enclosing scope.
    fn exec_while(&self, env: &EnvRef, cond: &Expr, body: &Block) -> Result<Flow> {
        let mut last = Value::Null;
        loop {
            if !self.eval_expr(env, cond)?.is_truthy() {
                break;
            }
            match self.exec_block(env, body)? {
                Flow::Normal(v) => last = v,
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::Break => return Ok(Flow::Normal(Value::Null)),
                Flow::Continue => continue,
            }
        }
        Ok(Flow::Normal(last))
    }

    fn eval_expr(&self, env: &EnvRef, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Ident(name) => match env.borrow().get(name) {
                Some(v) => Ok(v),
                None => err!("identifier not found: {}", name),
            },
            Expr::Array(elems) => {
                let mut values = Vec::with_capacity(elems.len());
                for e in elems {
                    values.push(self.eval_expr(env, e)?);
                }
                Ok(Value::Array(Rc::new(values)))
            }
            Expr::Prefix { op, right } => {
                let right = self.eval_expr(env, right)?;
                self.eval_prefix(*op, right)
            }
            Expr::Infix { left, op, right } => {
                let left = self.eval_expr(env, left)?;
                let right = self.eval_expr(env, right)?;
                self.eval_infix(*op, left, right)
            }
            Expr::Index { target, index } => {
                let target = self.eval_expr(env, target)?;
                let index = self.eval_expr(env, index)?;
                self.eval_index(target, index)
            }
            Expr::Call { callee, args } => {
                let callee = self.eval_expr(env, callee)?;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_expr(env, arg)?);
                }
                self.apply_function(callee, values)
            }
            Expr::Assign { name, value } => {
                let v = self.eval_expr(env, value)?;
                env.borrow_mut().set(name.clone(), v.clone());
                Ok(v)
            }
        }
    }

    fn eval_prefix(&self, op: PrefixOp, right: Value) -> Result<Value> {
        match op {
            PrefixOp::Not => Ok(Value::Bool(!right.is_truthy())),
            PrefixOp::Neg => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => err!("unknown operator: -{}", other.type_name()),
            },
        }
    }

    fn eval_infix(&self, op: InfixOp, left: Value, right: Value) -> Result<Value> {
        match (&left, &right) {
            (Value::Number(l), Value::Number(r)) => return self.eval_number_infix(op, *l, *r),
            (Value::Str(l), Value::Str(r)) => return self.eval_string_infix(op, l, r),
            _ => {}
        }
        match op {
            // both operands were already evaluated; combination is on
            // truthiness alone, with no short circuit
            InfixOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
            InfixOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
            // identity comparison; booleans and null behave structurally
            // because they are canonical
            InfixOp::Eq => Ok(Value::Bool(left == right)),
            InfixOp::NotEq => Ok(Value::Bool(left != right)),
            _ if left.type_name() != right.type_name() => err!(
                "type mismatch: {} {} {}",
                left.type_name(),
                op,
                right.type_name()
            ),
            _ => err!(
                "unknown operator: {} {} {}",
                left.type_name(),
                op,
                right.type_name()
            ),
        }
    }

    fn eval_number_infix(&self, op: InfixOp, l: f64, r: f64) -> Result<Value> {
        match op {
            InfixOp::Add => Ok(Value::Number(l + r)),
            InfixOp::Sub => Ok(Value::Number(l - r)),
            InfixOp::Mul => Ok(Value::Number(l * r)),
            InfixOp::Div => {
                if r == 0.0 {
                    err!("division by zero")
                } else {
                    Ok(Value::Number(l / r))
                }
            }
            InfixOp::Mod => {
                // remainder over truncated 64-bit integers; the sign follows
                // the dividend
                if r as i64 == 0 {
                    err!("division by zero")
                } else {
                    Ok(Value::Number(((l as i64) % (r as i64)) as f64))
                }
            }
            InfixOp::Lt => Ok(Value::Bool(l < r)),
            InfixOp::Gt => Ok(Value::Bool(l > r)),
            InfixOp::Le => Ok(Value::Bool(l <= r)),
            InfixOp::Ge => Ok(Value::Bool(l >= r)),
            InfixOp::Eq => Ok(Value::Bool(l == r)),
            InfixOp::NotEq => Ok(Value::Bool(l != r)),
            other => err!("unknown operator: {}", other),
        }
    }

    fn eval_string_infix(&self, op: InfixOp, l: &str, r: &str) -> Result<Value> {
        match op {
            InfixOp::Add => Ok(Value::Str(format!("{}{}", l, r))),
            InfixOp::Eq => Ok(Value::Bool(l == r)),
            InfixOp::NotEq => Ok(Value::Bool(l != r)),
            other => err!("unknown operator: STRING {} STRING", other),
        }
    }

    /// Array indexing truncates the index to an integer; out-of-range reads
    /// produce null rather than an error.
    fn eval_index(&self, target: Value, index: Value) -> Result<Value> {
        match (&target, &index) {
            (Value::Array(elems), Value::Number(n)) => {
                let idx = *n as i64;
                if idx < 0 || idx as usize >= elems.len() {
                    return Ok(Value::Null);
                }
                Ok(elems[idx as usize].clone())
            }
            _ => err!("index operator not supported: {}", target.type_name()),
        }
    }

    /// Call a user function or builtin. Parameters bind positionally into a
    /// fresh scope enclosed by the function's captured environment; extra
    /// arguments are dropped and missing parameters stay unbound.
    fn apply_function(&self, callee: Value, args: Vec<Value>) -> Result<Value> {
        match callee {
            Value::Function(function) => {
                let local = Env::enclosed(function.env.clone());
                {
                    let mut scope = local.borrow_mut();
                    for (param, arg) in function.params.iter().zip(args) {
                        scope.set(param.clone(), arg);
                    }
                }
                match self.exec_block(&local, &function.body)? {
                    Flow::Return(v) | Flow::Normal(v) => Ok(v),
                    Flow::Break => err!("'break_flag' outside of loop"),
                    Flow::Continue => err!("'continue_race' outside of loop"),
                }
            }
            Value::Builtin(builtin) => (builtin.func)(args),
            other => err!("not a function: {}", other.type_name()),
        }
    }
}
