// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The tree-walking interpreter (§4.3): scope stack, jump-flag
//! discipline, statement and expression evaluation.

use std::convert::TryFrom;
use std::rc::Rc;

use crate::ast::{AssignOp, BinaryOp, Expression, ExpressionKind, Literal, Program, Statement,
                  StatementKind, Term, TermKind, UnaryOp};
use crate::builtins;
use crate::error::{RuntimeErrorInfo, SmgError, SmgResult};
use crate::scope::{ScopeStack, ScopeStackRef};
use crate::value::{Closure, Value};

/// The interpreter-wide jump register (§3 GLOSSARY, §4.3): set by
/// `return`/`break`/`continue`, cleared by the innermost construct that
/// handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JumpFlag {
    None,
    Break,
    Continue,
    Return,
}

/// Walks a `Program`, maintaining one scope stack, one jump flag and
/// one "last result" value, matching §5's single-threaded,
/// single-instance resource model.
pub struct Interpreter {
    scope_stack: ScopeStackRef,
    jump: JumpFlag,
    last_result: Value,
    decimal_mode: bool,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            scope_stack: Rc::new(std::cell::RefCell::new(ScopeStack::new())),
            jump: JumpFlag::None,
            last_result: Value::Null,
            decimal_mode: false,
        }
    }

    /// Requests that numeric arguments crossing the host boundary be
    /// marshalled through an arbitrary-precision decimal type (§6).
    /// Language-facing arithmetic semantics are untouched; this only
    /// affects future `to_host_value` calls.
    pub fn with_decimal_mode(mut self, flag: bool) -> Self {
        self.decimal_mode = flag;
        self
    }

    pub fn decimal_mode(&self) -> bool {
        self.decimal_mode
    }

    /// Pre-binds a global, e.g. the host's `print`/`println` (§6 Host
    /// API).
    pub fn define_global(&mut self, name: &str, value: Value) {
        self.scope_stack
            .borrow()
            .global()
            .borrow_mut()
            .define(name.to_string(), value);
    }

    pub fn last_result(&self) -> &Value {
        &self.last_result
    }

    /// Runs a program to completion, returning the last evaluated
    /// value. Snapshots the global scope beforehand and restores it
    /// afterward so a reusable interpreter instance behaves like a
    /// pure function of (code, globals) (§4.3).
    pub fn run(&mut self, program: &Program) -> SmgResult<Value> {
        let global = self.scope_stack.borrow().global().clone();
        let snapshot = global.borrow().snapshot_bindings();

        self.inject_builtins();
        let result = self.exec_block(program);

        global.borrow_mut().restore_bindings(snapshot);
        self.jump = JumpFlag::None;
        result.map(|()| self.last_result.clone())
    }

    fn inject_builtins(&mut self) {
        let for_exists = self.scope_stack.clone();
        self.define_global(
            "exists",
            Value::host_fn(move |args| builtins::builtin_exists(&for_exists, args)),
        );
        let for_global = self.scope_stack.clone();
        self.define_global(
            "global",
            Value::host_fn(move |args| builtins::builtin_global(&for_global, args)),
        );
        self.define_global("type", Value::host_fn(builtins::builtin_type));
    }

    // ---- statements ---------------------------------------------------

    fn exec_block(&mut self, program: &Program) -> SmgResult<()> {
        for stmt in program {
            self.exec_stmt(stmt)?;
            if self.jump != JumpFlag::None {
                break;
            }
        }
        Ok(())
    }

    /// Runs a nested block in its own fresh scope (§3: `If`/`While`
    /// bodies etc. each introduce a lexical block).
    fn run_scoped(&mut self, program: &Program) -> SmgResult<()> {
        self.scope_stack.borrow_mut().enter_new_scope();
        let result = self.exec_block(program);
        self.scope_stack.borrow_mut().exit_scope();
        result
    }

    fn exec_stmt(&mut self, stmt: &Statement) -> SmgResult<()> {
        let line = stmt.line;
        match &stmt.node {
            StatementKind::Declare { name, expr } => {
                let value = self.eval_expr(expr)?;
                if !self.scope_stack.borrow_mut().define_var(name, value) {
                    return Err(SmgError::runtime(
                        line,
                        RuntimeErrorInfo::Redefinition { name: name.clone() },
                    ));
                }
                Ok(())
            }
            StatementKind::Assign { target_term, op, expr } => {
                self.exec_assign(line, target_term, *op, expr)
            }
            StatementKind::ExprStmt { expr } => {
                self.last_result = self.eval_expr(expr)?;
                Ok(())
            }
            StatementKind::If { cond, then_scope, else_scope } => {
                let cond_val = self.eval_expr(cond)?;
                if builtins::to_boolean(&cond_val) {
                    self.run_scoped(then_scope)
                } else if let Some(else_scope) = else_scope {
                    self.run_scoped(else_scope)
                } else {
                    Ok(())
                }
            }
            StatementKind::While { cond, scope } => self.exec_while(cond, scope),
            StatementKind::For { init, cond, inc, scope } => {
                self.exec_for(init.as_deref(), cond.as_ref(), inc.as_deref(), scope)
            }
            StatementKind::ForEach { itr_name, list_term, scope } => {
                self.exec_for_each(itr_name, list_term, scope)
            }
            StatementKind::Scope { inner } => self.run_scoped(inner),
            StatementKind::Function { name, params, body } => {
                let closure = Value::Closure(Rc::new(Closure {
                    params: params.clone(),
                    body: body.clone(),
                    captured_scopes: self.scope_stack.borrow().snapshot(),
                }));
                if !self.scope_stack.borrow_mut().define_var(name, closure.clone()) {
                    self.scope_stack.borrow_mut().set_var(name, closure);
                }
                Ok(())
            }
            StatementKind::Return { expr } => {
                self.last_result = match expr {
                    Some(e) => self.eval_expr(e)?,
                    None => Value::Null,
                };
                self.jump = JumpFlag::Return;
                Ok(())
            }
            StatementKind::Break => {
                self.jump = JumpFlag::Break;
                Ok(())
            }
            StatementKind::Continue => {
                self.jump = JumpFlag::Continue;
                Ok(())
            }
            StatementKind::TryCatch { try_block, catch, err_name, finally } => {
                self.exec_try_catch(try_block, catch.as_ref(), err_name.as_deref(), finally.as_ref())
            }
        }
    }

    fn exec_while(&mut self, cond: &Expression, scope: &Program) -> SmgResult<()> {
        loop {
            let cond_val = self.eval_expr(cond)?;
            if !builtins::to_boolean(&cond_val) {
                break;
            }
            self.run_scoped(scope)?;
            match self.jump {
                JumpFlag::Break => {
                    self.jump = JumpFlag::None;
                    break;
                }
                JumpFlag::Continue => {
                    self.jump = JumpFlag::None;
                }
                JumpFlag::Return => break,
                JumpFlag::None => {}
            }
        }
        Ok(())
    }

    fn exec_for(
        &mut self,
        init: Option<&Statement>,
        cond: Option<&Expression>,
        inc: Option<&Statement>,
        scope: &Program,
    ) -> SmgResult<()> {
        self.scope_stack.borrow_mut().enter_new_scope();
        let result = (|| -> SmgResult<()> {
            if let Some(init) = init {
                self.exec_stmt(init)?;
            }
            loop {
                let keep_going = match cond {
                    Some(c) => builtins::to_boolean(&self.eval_expr(c)?),
                    None => true,
                };
                if !keep_going {
                    break;
                }
                self.run_scoped(scope)?;
                match self.jump {
                    JumpFlag::Break => {
                        self.jump = JumpFlag::None;
                        break;
                    }
                    JumpFlag::Continue => {
                        self.jump = JumpFlag::None;
                    }
                    JumpFlag::Return => break,
                    JumpFlag::None => {}
                }
                if let Some(inc) = inc {
                    self.exec_stmt(inc)?;
                }
            }
            Ok(())
        })();
        self.scope_stack.borrow_mut().exit_scope();
        result
    }

    fn exec_for_each(&mut self, itr_name: &str, list_term: &Term, scope: &Program) -> SmgResult<()> {
        let list_val = self.eval_term(list_term)?;
        let items = match &list_val {
            Value::List(items) => items.borrow().clone(),
            other => {
                return Err(SmgError::runtime(
                    list_term.line,
                    RuntimeErrorInfo::TypeMismatch {
                        reason: format!("for-each requires a list, found {}", other.type_name()),
                    },
                ))
            }
        };
        for item in items {
            self.scope_stack.borrow_mut().enter_new_scope();
            self.scope_stack.borrow_mut().define_var(itr_name, item);
            let body_result = self.exec_block(scope);
            self.scope_stack.borrow_mut().exit_scope();
            body_result?;
            match self.jump {
                JumpFlag::Break => {
                    self.jump = JumpFlag::None;
                    break;
                }
                JumpFlag::Continue => {
                    self.jump = JumpFlag::None;
                }
                JumpFlag::Return => break,
                JumpFlag::None => {}
            }
        }
        Ok(())
    }

    fn exec_try_catch(
        &mut self,
        try_block: &Program,
        catch: Option<&Program>,
        err_name: Option<&str>,
        finally: Option<&Program>,
    ) -> SmgResult<()> {
        let depth = self.scope_stack.borrow().depth();
        let mut result = self.run_scoped(try_block);
        if result.is_err() {
            let e = result.unwrap_err();
            self.scope_stack.borrow_mut().truncate(depth);
            result = match catch {
                Some(catch_block) => {
                    self.scope_stack.borrow_mut().enter_new_scope();
                    if let Some(name) = err_name {
                        let exception = Value::exception(e.to_string());
                        self.scope_stack.borrow_mut().define_var(name, exception);
                    }
                    let catch_result = self.exec_block(catch_block);
                    self.scope_stack.borrow_mut().exit_scope();
                    catch_result
                }
                None => Err(e),
            };
        }
        if let Some(finally_block) = finally {
            let pending_jump = std::mem::replace(&mut self.jump, JumpFlag::None);
            let finally_result = self.run_scoped(finally_block);
            if matches!(self.jump, JumpFlag::None) {
                self.jump = pending_jump;
            }
            if finally_result.is_err() {
                result = finally_result;
            }
        }
        result
    }

    fn exec_assign(
        &mut self,
        line: usize,
        target_term: &Term,
        op: AssignOp,
        expr: &Expression,
    ) -> SmgResult<()> {
        match &target_term.node {
            TermKind::Variable { name } => {
                let current = self
                    .scope_stack
                    .borrow()
                    .get_var(name)
                    .ok_or_else(|| {
                        SmgError::runtime(line, RuntimeErrorInfo::UndefinedVariable { name: name.clone() })
                    })?;
                let rhs = self.eval_expr(expr)?;
                let new_val =
                    apply_assign(op, current, rhs).map_err(|e| SmgError::runtime(line, e))?;
                self.scope_stack.borrow_mut().set_var(name, new_val);
                Ok(())
            }
            TermKind::ArrayAccess { term: container_term, index_expr } => {
                let container = self.eval_term(container_term)?;
                let index_val = self.eval_expr(index_expr)?;
                let rhs = self.eval_expr(expr)?;
                match (&container, &index_val) {
                    (Value::Map(entries), Value::Str(key)) => {
                        let key = key.to_string();
                        let current = entries.borrow().get(&key).cloned().unwrap_or(Value::Null);
                        let new_val = apply_assign(op, current, rhs)
                            .map_err(|e| SmgError::runtime(line, e))?;
                        entries.borrow_mut().insert(key, new_val);
                        Ok(())
                    }
                    (Value::List(items), idx_val) if value_is_number(idx_val) => {
                        let idx = to_index(idx_val).map_err(|e| SmgError::runtime(line, e))?;
                        let current = items.borrow().get(idx).cloned().ok_or_else(|| {
                            SmgError::runtime(
                                line,
                                RuntimeErrorInfo::InvalidIndex {
                                    reason: format!("index {} out of range", idx),
                                },
                            )
                        })?;
                        let new_val = apply_assign(op, current, rhs)
                            .map_err(|e| SmgError::runtime(line, e))?;
                        items.borrow_mut()[idx] = new_val;
                        Ok(())
                    }
                    (Value::Str(s), idx_val)
                        if value_is_number(idx_val)
                            && matches!(container_term.node, TermKind::Variable { .. }) =>
                    {
                        let idx = to_index(idx_val).map_err(|e| SmgError::runtime(line, e))?;
                        let chars: Vec<char> = s.chars().collect();
                        let old_char = chars.get(idx).copied().ok_or_else(|| {
                            SmgError::runtime(
                                line,
                                RuntimeErrorInfo::InvalidIndex {
                                    reason: format!("index {} out of range", idx),
                                },
                            )
                        })?;
                        let current = Value::str(old_char.to_string());
                        let new_val = apply_assign(op, current, rhs)
                            .map_err(|e| SmgError::runtime(line, e))?;
                        let casted = builtins::cast_value(&new_val, "char")
                            .map_err(|e| SmgError::runtime(line, e))?;
                        let new_char = match &casted {
                            Value::Str(s) => s.chars().next().unwrap_or('\0'),
                            _ => unreachable!("cast_value(.., \"char\") always returns a Str"),
                        };
                        let mut new_chars = chars;
                        new_chars[idx] = new_char;
                        let new_string: String = new_chars.into_iter().collect();
                        if let TermKind::Variable { name } = &container_term.node {
                            self.scope_stack.borrow_mut().set_var(name, Value::str(new_string));
                        }
                        Ok(())
                    }
                    _ => Err(SmgError::runtime(
                        line,
                        RuntimeErrorInfo::TypeMismatch {
                            reason: "invalid assignment target: incompatible container/index combination"
                                .to_string(),
                        },
                    )),
                }
            }
            TermKind::PropAccess { term: container_term, prop_name } => {
                let container = self.eval_term(container_term)?;
                let rhs = self.eval_expr(expr)?;
                match container {
                    Value::Map(entries) => {
                        let current = entries.borrow().get(prop_name).cloned().unwrap_or(Value::Null);
                        let new_val = apply_assign(op, current, rhs)
                            .map_err(|e| SmgError::runtime(line, e))?;
                        entries.borrow_mut().insert(prop_name.clone(), new_val);
                        Ok(())
                    }
                    other => Err(SmgError::runtime(
                        line,
                        RuntimeErrorInfo::TypeMismatch {
                            reason: format!("cannot assign a property of a {} value", other.type_name()),
                        },
                    )),
                }
            }
            _ => unreachable!("the parser restricts assignment targets to Variable/ArrayAccess/PropAccess"),
        }
    }

    // ---- expressions ----------------------------------------------

    fn eval_expr(&mut self, expr: &Expression) -> SmgResult<Value> {
        match &expr.node {
            ExpressionKind::TermExpr { term } => self.eval_term(term),
            ExpressionKind::BinaryExpr { op, lhs_term, rhs_term } => {
                self.eval_binary(expr.line, *op, lhs_term, rhs_term)
            }
            ExpressionKind::Lambda { params, body } => Ok(Value::Closure(Rc::new(Closure {
                params: params.clone(),
                body: body.clone(),
                captured_scopes: self.scope_stack.borrow().snapshot(),
            }))),
        }
    }

    fn eval_binary(
        &mut self,
        line: usize,
        op: BinaryOp,
        lhs_term: &Term,
        rhs_term: &Term,
    ) -> SmgResult<Value> {
        let lhs_val = self.eval_term(lhs_term)?;
        match op {
            BinaryOp::And => {
                if !builtins::to_boolean(&lhs_val) {
                    Ok(lhs_val)
                } else {
                    self.eval_term(rhs_term)
                }
            }
            BinaryOp::Or => {
                if builtins::to_boolean(&lhs_val) {
                    Ok(lhs_val)
                } else {
                    self.eval_term(rhs_term)
                }
            }
            _ => {
                let rhs_val = self.eval_term(rhs_term)?;
                builtins::apply_binary(op, lhs_val, rhs_val).map_err(|e| SmgError::runtime(line, e))
            }
        }
    }

    fn eval_term(&mut self, term: &Term) -> SmgResult<Value> {
        let line = term.line;
        match &term.node {
            TermKind::Literal { value } => Ok(literal_to_value(value)),
            TermKind::Variable { name } => {
                self.scope_stack.borrow().get_var(name).ok_or_else(|| {
                    SmgError::runtime(line, RuntimeErrorInfo::UndefinedVariable { name: name.clone() })
                })
            }
            TermKind::ParenExpr { expr } => self.eval_expr(expr),
            TermKind::UnaryExpr { op, term: operand } => {
                let val = self.eval_term(operand)?;
                apply_unary(*op, &val).map_err(|e| SmgError::runtime(line, e))
            }
            TermKind::ArrayAccess { term: container_term, index_expr } => {
                let container = self.eval_term(container_term)?;
                let index_val = self.eval_expr(index_expr)?;
                if let Value::Str(prop) = &index_val {
                    return self
                        .eval_prop_access(&container, prop, line)
                        .map_err(|e| SmgError::runtime(line, e));
                }
                match &container {
                    Value::List(items) => {
                        let idx = to_index(&index_val).map_err(|e| SmgError::runtime(line, e))?;
                        items.borrow().get(idx).cloned().ok_or_else(|| {
                            SmgError::runtime(
                                line,
                                RuntimeErrorInfo::InvalidIndex {
                                    reason: format!("index {} out of range", idx),
                                },
                            )
                        })
                    }
                    Value::Str(s) => {
                        let idx = to_index(&index_val).map_err(|e| SmgError::runtime(line, e))?;
                        s.chars().nth(idx).map(|c| Value::str(c.to_string())).ok_or_else(|| {
                            SmgError::runtime(
                                line,
                                RuntimeErrorInfo::InvalidIndex {
                                    reason: format!("index {} out of range", idx),
                                },
                            )
                        })
                    }
                    other => Err(SmgError::runtime(
                        line,
                        RuntimeErrorInfo::InvalidIndex {
                            reason: format!("cannot index into a {} value", other.type_name()),
                        },
                    )),
                }
            }
            TermKind::PropAccess { term: container_term, prop_name } => {
                let container = self.eval_term(container_term)?;
                self.eval_prop_access(&container, prop_name, line)
                    .map_err(|e| SmgError::runtime(line, e))
            }
            TermKind::Call { callee_term, args_exprs } => {
                let callee = self.eval_term(callee_term)?;
                let mut args = Vec::with_capacity(args_exprs.len());
                for a in args_exprs {
                    args.push(self.eval_expr(a)?);
                }
                match callee {
                    Value::Closure(closure) => self.call_closure(&closure, &args),
                    Value::HostFn(f) => f(&args).map_err(|e| SmgError::runtime(line, e)),
                    _ => Err(SmgError::runtime(callee_term.line, RuntimeErrorInfo::NotCallable)),
                }
            }
            TermKind::Cast { term: inner, type_name } => {
                let val = self.eval_term(inner)?;
                builtins::cast_value(&val, type_name).map_err(|e| SmgError::runtime(line, e))
            }
            TermKind::ArrayLiteral { items_exprs } => {
                let mut items = Vec::with_capacity(items_exprs.len());
                for e in items_exprs {
                    items.push(self.eval_expr(e)?);
                }
                Ok(Value::list(items))
            }
            TermKind::MapLiteral { entries } => {
                let mut map = std::collections::HashMap::with_capacity(entries.len());
                for (key, value_expr) in entries {
                    let value = self.eval_expr(value_expr)?;
                    map.insert(key.clone(), value);
                }
                Ok(Value::map(map))
            }
        }
    }

    /// Shared by `PropAccess` and the string-index form of
    /// `ArrayAccess` (§4.3: "if index is a string, behave like prop
    /// access").
    fn eval_prop_access(
        &self,
        container: &Value,
        prop_name: &str,
        _line: usize,
    ) -> Result<Value, RuntimeErrorInfo> {
        match container {
            Value::Map(entries) => Ok(entries.borrow().get(prop_name).cloned().unwrap_or(Value::Null)),
            Value::Str(s) => match prop_name {
                "size" | "length" => Ok(Value::Int(s.chars().count() as i64)),
                "split" => {
                    let s = s.clone();
                    Ok(Value::host_fn(move |args| {
                        let sep = match args.get(0) {
                            Some(Value::Str(sep)) => sep.to_string(),
                            _ => {
                                return Err(RuntimeErrorInfo::TypeMismatch {
                                    reason: "split expects a string separator".to_string(),
                                })
                            }
                        };
                        let parts: Vec<Value> = if sep.is_empty() {
                            s.chars().map(|c| Value::str(c.to_string())).collect()
                        } else {
                            s.split(sep.as_str()).map(Value::str).collect()
                        };
                        Ok(Value::list(parts))
                    }))
                }
                other => Err(RuntimeErrorInfo::InvalidProperty { name: other.to_string() }),
            },
            Value::List(items) => match prop_name {
                "size" | "length" => Ok(Value::Int(items.borrow().len() as i64)),
                other => Err(RuntimeErrorInfo::InvalidProperty { name: other.to_string() }),
            },
            _ => Err(RuntimeErrorInfo::InvalidProperty { name: prop_name.to_string() }),
        }
    }

    /// Calls a user closure (§4.3 Call/Closure): pushes the closure's
    /// captured frames on top of the current stack, binds parameters
    /// (missing args fall back to the declared default expression,
    /// evaluated in that same just-pushed context so it sees sibling
    /// parameters and the closure's lexical environment; extra args
    /// are ignored), runs the body, then unwinds.
    fn call_closure(&mut self, closure: &Rc<Closure>, args: &[Value]) -> SmgResult<Value> {
        let captured_len = closure.captured_scopes.len();
        self.scope_stack.borrow_mut().enter_snapshot(&closure.captured_scopes);
        self.scope_stack.borrow_mut().enter_new_scope();
        log::trace!("call closure params={}", closure.params.len());

        for (i, param) in closure.params.iter().enumerate() {
            let value = if let Some(arg) = args.get(i) {
                arg.clone()
            } else if let Some(default_expr) = &param.default {
                match self.eval_expr(default_expr) {
                    Ok(v) => v,
                    Err(e) => {
                        self.scope_stack.borrow_mut().exit_scope();
                        self.scope_stack.borrow_mut().exit_many(captured_len);
                        return Err(e);
                    }
                }
            } else {
                Value::Null
            };
            self.scope_stack.borrow_mut().define_var(&param.name, value);
        }

        let body_result = self.exec_block(&closure.body);
        self.jump = JumpFlag::None;
        let result = match body_result {
            Ok(()) => Ok(self.last_result.clone()),
            Err(e) => Err(e),
        };
        self.scope_stack.borrow_mut().exit_scope();
        self.scope_stack.borrow_mut().exit_many(captured_len);
        result
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn value_is_number(v: &Value) -> bool {
    matches!(v, Value::Int(_) | Value::Float(_))
}

fn to_index(v: &Value) -> Result<usize, RuntimeErrorInfo> {
    let i = match v {
        Value::Int(i) => *i,
        Value::Float(f) => *f as i64,
        other => {
            return Err(RuntimeErrorInfo::InvalidIndex {
                reason: format!("index must be numeric, found {}", other.type_name()),
            })
        }
    };
    usize::try_from(i).map_err(|_| RuntimeErrorInfo::InvalidIndex {
        reason: format!("negative index {}", i),
    })
}

fn literal_to_value(lit: &Literal) -> Value {
    match lit {
        Literal::Null => Value::Null,
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::Str(s) => Value::str(s.as_str()),
    }
}

fn apply_unary(op: UnaryOp, val: &Value) -> Result<Value, RuntimeErrorInfo> {
    match op {
        UnaryOp::Negate => match builtins::coerce_numeric(val)? {
            builtins::Num::Int(i) => Ok(Value::Int(-i)),
            builtins::Num::Float(f) => Ok(Value::Float(-f)),
        },
        UnaryOp::Invert => {
            let i = match builtins::coerce_numeric(val)? {
                builtins::Num::Int(i) => i,
                builtins::Num::Float(f) => f as i64,
            };
            Ok(Value::Int(!i))
        }
        UnaryOp::Not => Ok(Value::Boolean(!builtins::to_boolean(val))),
        UnaryOp::Increment | UnaryOp::Decrement => Err(RuntimeErrorInfo::TypeMismatch {
            reason: "increment/decrement operators are not supported at runtime".to_string(),
        }),
    }
}

fn apply_assign(op: AssignOp, current: Value, rhs: Value) -> Result<Value, RuntimeErrorInfo> {
    use AssignOp::*;
    match op {
        Assign => Ok(rhs),
        AddEq => builtins::apply_binary(BinaryOp::Add, current, rhs),
        SubEq => builtins::apply_binary(BinaryOp::Subtract, current, rhs),
        MulEq => builtins::apply_binary(BinaryOp::Multiply, current, rhs),
        DivEq => builtins::apply_binary(BinaryOp::Divide, current, rhs),
        ModEq => builtins::apply_binary(BinaryOp::Modulo, current, rhs),
        AndEq => builtins::apply_binary(BinaryOp::BitAnd, current, rhs),
        OrEq => builtins::apply_binary(BinaryOp::BitOr, current, rhs),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parse_program;

    fn run_source(src: &str) -> SmgResult<Value> {
        let program = parse_program(src)?;
        let mut interp = Interpreter::new();
        interp.run(&program)
    }

    #[test]
    fn lexical_scoping_shadows_and_restores() {
        let result = run_source("let x = 1; { let x = 2; } x").unwrap();
        assert!(matches!(result, Value::Int(1)));
    }

    #[test]
    fn closure_capture_sees_later_mutations() {
        let result = run_source(
            "let x = 1; let f = function () x; x = 2; f()",
        )
        .unwrap();
        assert!(matches!(result, Value::Int(2)));
    }

    #[test]
    fn break_clears_jump_flag_after_while() {
        let result = run_source("let i = 0; while (true) { i = i + 1; if (i == 3) break; } i").unwrap();
        assert!(matches!(result, Value::Int(3)));
    }

    #[test]
    fn return_inside_loop_inside_function_stops_only_that_call() {
        let result = run_source(
            "function f() { while (true) { return 42; } return -1; } let a = f(); let b = 7; b",
        )
        .unwrap();
        assert!(matches!(result, Value::Int(7)));
    }

    #[test]
    fn try_catch_restores_scope_depth() {
        let result = run_source(
            "let ok = false; try { let a = 1; try { let b = 2; let c = null[0]; } catch (e) { ok = true; } } catch (e) {} ok",
        )
        .unwrap();
        assert!(matches!(result, Value::Boolean(true)));
    }

    #[test]
    fn fibonacci_recursion() {
        let result = run_source(
            "function fib(n){ if (n < 2) return n; return fib(n-1) + fib(n-2) } fib(10)",
        )
        .unwrap();
        assert!(matches!(result, Value::Int(55)));
    }

    #[test]
    fn map_property_assignment() {
        let result = run_source("let m = { name: \"smg\" }; m.name = \"SMG\"; m.name").unwrap();
        match result {
            Value::Str(s) => assert_eq!(&*s, "SMG"),
            other => panic!("expected Str, got {:?}", other.type_name()),
        }
    }

    #[test]
    fn curried_lambda_call() {
        let result =
            run_source("let adder = function (x) function (y) x + y; adder(3)(4)").unwrap();
        assert!(matches!(result, Value::Int(7)));
    }
}
