// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Runtime values (§3) and closures.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::ast::{Param, Program};
use crate::error::RuntimeErrorInfo;
use crate::scope::ScopeRef;

/// A host-provided callable: variadic, returns a `Value` (host
/// callables that conceptually return nothing just return
/// `Value::Null`, matching the spec's stated "void" outcome without
/// needing a separate marker type). Errors carry no source line —
/// the interpreter attaches the calling line when propagating them as
/// an [`crate::error::SmgError`].
pub type HostFn = dyn Fn(&[Value]) -> Result<Value, RuntimeErrorInfo>;

/// The result of evaluating a `Lambda` or `Function` statement (§3): a
/// tuple of `(params, body, captured_scope_stack_snapshot)`. The
/// snapshot is a vector of shared references to the live scope frames
/// in effect at creation time, so later mutations to captured
/// variables stay visible (true lexical capture).
#[derive(Clone)]
pub struct Closure {
    pub params: Vec<Param>,
    pub body: Program,
    pub captured_scopes: Vec<ScopeRef>,
}

impl std::fmt::Debug for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params.len())
            .field("captured_scopes", &self.captured_scopes.len())
            .finish()
    }
}

/// An exception value (§3, §7): a message plus, when the raising party
/// was a host callable, the original failure attached as a suppressed
/// cause.
#[derive(Clone)]
pub struct ExceptionValue {
    pub message: String,
    pub cause: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Debug for ExceptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExceptionValue")
            .field("message", &self.message)
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .finish()
    }
}

/// The dynamic, tagged-variant value type (§3). Lists and maps use
/// interior mutability (`Rc<RefCell<_>>`) so index/property assignment
/// mutates the shared container rather than rebinding a fresh copy.
#[derive(Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    /// An instant, stored as milliseconds since the Unix epoch.
    Date(i64),
    List(Rc<RefCell<Vec<Value>>>),
    Map(Rc<RefCell<HashMap<String, Value>>>),
    HostFn(Rc<HostFn>),
    Closure(Rc<Closure>),
    Exception(Rc<ExceptionValue>),
}

impl Value {
    pub fn str(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn map(entries: HashMap<String, Value>) -> Self {
        Value::Map(Rc::new(RefCell::new(entries)))
    }

    pub fn exception(message: impl Into<String>) -> Self {
        Value::Exception(Rc::new(ExceptionValue {
            message: message.into(),
            cause: None,
        }))
    }

    pub fn host_fn<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, RuntimeErrorInfo> + 'static,
    {
        Value::HostFn(Rc::new(f))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::Float(_) => "double",
            Value::Str(_) => "string",
            Value::Date(_) => "date",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::HostFn(_) | Value::Closure(_) => "function",
            Value::Exception(_) => "exception",
        }
    }

    /// Reference/identity equality for two values, used when either
    /// side of `==`/`!=` is `null` (§4.3).
    pub fn identity_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            (Value::HostFn(a), Value::HostFn(b)) => Rc::ptr_eq(a, b),
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Exception(a), Value::Exception(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::Date(millis) => write!(f, "{}", crate::builtins::format_date(*millis)),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::HostFn(_) => write!(f, "<host function>"),
            Value::Closure(_) => write!(f, "<function>"),
            Value::Exception(e) => write!(f, "{}", e.message),
        }
    }
}
