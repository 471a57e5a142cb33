// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Abstract syntax tree (§3): three tagged-variant node families
//! (`Statement`, `Expression`, `Term`) instead of a class-per-node
//! visitor hierarchy.

/// Wraps an AST node with the source line it started on, so every node
/// family can report its position without repeating a `line` field by
/// hand in each variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub line: usize,
    pub node: T,
}

impl<T> Spanned<T> {
    pub fn new(line: usize, node: T) -> Self {
        Spanned { line, node }
    }
}

pub type Program = Vec<Statement>;
pub type Statement = Spanned<StatementKind>;
pub type Expression = Spanned<ExpressionKind>;
pub type Term = Spanned<TermKind>;

/// A formal parameter, optionally with a default-value expression
/// (evaluated in the closure's captured scope when the argument is
/// omitted at call time, §4.3 Call/Closure).
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Declare {
        name: String,
        expr: Expression,
    },
    Assign {
        target_term: Term,
        op: AssignOp,
        expr: Expression,
    },
    ExprStmt {
        expr: Expression,
    },
    If {
        cond: Expression,
        then_scope: Program,
        else_scope: Option<Program>,
    },
    While {
        cond: Expression,
        scope: Program,
    },
    For {
        init: Option<Box<Statement>>,
        cond: Option<Expression>,
        inc: Option<Box<Statement>>,
        scope: Program,
    },
    ForEach {
        itr_name: String,
        list_term: Term,
        scope: Program,
    },
    Scope {
        inner: Program,
    },
    Function {
        name: String,
        params: Vec<Param>,
        body: Program,
    },
    Return {
        expr: Option<Expression>,
    },
    Break,
    Continue,
    TryCatch {
        try_block: Program,
        catch: Option<Program>,
        err_name: Option<String>,
        finally: Option<Program>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    BinaryExpr {
        op: BinaryOp,
        lhs_term: Box<Term>,
        rhs_term: Box<Term>,
    },
    TermExpr {
        term: Box<Term>,
    },
    Lambda {
        params: Vec<Param>,
        body: Program,
    },
}

/// The canonical `NULL_EXPR` standing in for a missing initializer
/// (§3), e.g. `let x;` or a bare `return`.
pub fn null_expr(line: usize) -> Expression {
    Spanned::new(
        line,
        ExpressionKind::TermExpr {
            term: Box::new(Spanned::new(
                line,
                TermKind::Literal {
                    value: Literal::Null,
                },
            )),
        },
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
    Literal {
        value: Literal,
    },
    Variable {
        name: String,
    },
    /// Groups a sub-expression into a single term. Used both for a
    /// literal `( expr )` in source and, internally to the
    /// precedence-climbing parser, to box an already-reduced
    /// higher-precedence sub-chain so it can stand as the left- or
    /// right-hand operand of an enclosing `BinaryExpr` (whose operands
    /// are `Term`, not `Expression` — see DESIGN.md).
    ParenExpr {
        expr: Box<Expression>,
    },
    UnaryExpr {
        op: UnaryOp,
        term: Box<Term>,
    },
    ArrayAccess {
        term: Box<Term>,
        index_expr: Box<Expression>,
    },
    PropAccess {
        term: Box<Term>,
        prop_name: String,
    },
    Call {
        callee_term: Box<Term>,
        args_exprs: Vec<Expression>,
    },
    Cast {
        term: Box<Term>,
        type_name: String,
    },
    ArrayLiteral {
        items_exprs: Vec<Expression>,
    },
    MapLiteral {
        entries: Vec<(String, Expression)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Exponent,
    Multiply,
    Divide,
    Modulo,
    Add,
    Subtract,
    ShiftLeft,
    ShiftRight,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Invert,
    Not,
    // Reserved but unreachable from parsed input (§9): no canonical
    // token sequence ever produces these.
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddEq,
    SubEq,
    MulEq,
    DivEq,
    ModEq,
    AndEq,
    OrEq,
}
