// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Error taxonomy (§7): lexical, syntactic and semantic/runtime errors,
//! unified into a single [`SmgError`] carried by every fallible
//! operation in the crate.

use std::sync::Arc;

use snafu::Snafu;

use crate::span::Pos;

/// Lexical errors (§4.1 failure semantics).
#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum LexError {
    #[snafu(display("unterminated string literal at {}", at))]
    UnterminatedString { at: Pos },
    #[snafu(display("newline in string literal at {}", at))]
    NewlineInString { at: Pos },
    #[snafu(display("unrecognized character {:?} at {}", ch, at))]
    UnrecognizedChar { ch: char, at: Pos },
}

/// Syntactic errors (§4.2 error semantics).
#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum ParseErrorInfo {
    #[snafu(display("expected one of {:?}, found {:?}", expected, found))]
    UnexpectedToken {
        expected: Vec<String>,
        found: String,
    },
    #[snafu(display("unexpected end of input, expected one of {:?}", expected))]
    UnexpectedEof { expected: Vec<String> },
    #[snafu(display("invalid assignment target"))]
    InvalidAssignTarget,
    #[snafu(display("unsupported operator {:?}", op))]
    UnsupportedOperator { op: String },
    #[snafu(display("unterminated {}", what))]
    UnterminatedConstruct { what: String },
}

/// Semantic / runtime errors (§4.3, §4.4, §7).
#[derive(Debug, Clone, Snafu)]
pub enum RuntimeErrorInfo {
    #[snafu(display("undefined variable {:?}", name))]
    UndefinedVariable { name: String },
    #[snafu(display("{:?} is already defined in this scope", name))]
    Redefinition { name: String },
    #[snafu(display("invalid index: {}", reason))]
    InvalidIndex { reason: String },
    #[snafu(display("invalid property {:?}", name))]
    InvalidProperty { name: String },
    #[snafu(display("cannot cast {} to {}", from, to))]
    InvalidCast { from: String, to: String },
    #[snafu(display("type error: {}", reason))]
    TypeMismatch { reason: String },
    #[snafu(display("value is not callable"))]
    NotCallable,
    #[snafu(display("host error: {}", message))]
    HostError {
        message: String,
        #[snafu(source(false))]
        cause: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },
}

impl PartialEq for RuntimeErrorInfo {
    fn eq(&self, other: &Self) -> bool {
        // Host error causes are not comparable; tests only compare the
        // display-relevant fields.
        format!("{}", self) == format!("{}", other)
    }
}

/// The kind of a [`SmgError`], one variant per error-taxonomy phase.
#[derive(Debug, Clone, PartialEq)]
pub enum SmgErrorKind {
    Lex(LexError),
    Parse(ParseErrorInfo),
    Runtime(RuntimeErrorInfo),
}

impl std::fmt::Display for SmgErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmgErrorKind::Lex(e) => write!(f, "{}", e),
            SmgErrorKind::Parse(e) => write!(f, "{}", e),
            SmgErrorKind::Runtime(e) => write!(f, "{}", e),
        }
    }
}

impl LexError {
    /// The position the error occurred at, used to fill in
    /// [`SmgError::line`] when the tokenizer is driven by the parser.
    pub fn at(&self) -> Pos {
        match self {
            LexError::UnterminatedString { at }
            | LexError::NewlineInString { at }
            | LexError::UnrecognizedChar { at, .. } => *at,
        }
    }
}

/// Every error raised anywhere in the crate, unified with the source
/// line it occurred on (§7: "every error carries a human-readable
/// message with the current source line number").
#[derive(Debug, Clone, PartialEq)]
pub struct SmgError {
    pub line: usize,
    pub kind: SmgErrorKind,
}

impl SmgError {
    pub fn lex(line: usize, err: LexError) -> Self {
        SmgError {
            line,
            kind: SmgErrorKind::Lex(err),
        }
    }

    pub fn parse(line: usize, err: ParseErrorInfo) -> Self {
        SmgError {
            line,
            kind: SmgErrorKind::Parse(err),
        }
    }

    pub fn runtime(line: usize, err: RuntimeErrorInfo) -> Self {
        SmgError {
            line,
            kind: SmgErrorKind::Runtime(err),
        }
    }
}

impl std::fmt::Display for SmgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for SmgError {}

pub type SmgResult<T> = Result<T, SmgError>;
