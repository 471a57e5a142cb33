// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Recursive-descent parser with a precedence-climbing expression
//! sub-parser (§4.2).

use crate::ast::*;
use crate::error::{ParseErrorInfo, SmgError};
use crate::lexer::Tokenizer;
use crate::span::LineMap;
use crate::token::{Token, TokenKind};

/// Parses a complete program from source text (§4.2 `parse() ->
/// Program`).
pub fn parse_program(source: &str) -> Result<Program, SmgError> {
    let mut parser = Parser::new(source)?;
    parser.parse()
}

/// Consumes tokens from a pre-tokenized buffer through a small cursor
/// supporting `peek`/`consume`/`try_consume` — the teacher's
/// `Parser<'a> { tokens: &'a [Token], current_token: usize }` shape,
/// generalized from its single `parse_exp` entry point into the full
/// statement/expression/term grammar below.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    offsets: Vec<usize>,
    line_map: LineMap<'a>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Result<Self, SmgError> {
        let mut tokenizer = Tokenizer::new(source);
        let mut tokens = Vec::new();
        let mut offsets = Vec::new();
        loop {
            let start = tokenizer.offset();
            match tokenizer.next_token() {
                Ok(None) => break,
                Ok(Some(tok)) => {
                    if tok.is(TokenKind::Comment) {
                        continue;
                    }
                    offsets.push(start);
                    tokens.push(tok);
                }
                Err(e) => {
                    let pos = e.at();
                    return Err(SmgError::lex(pos.line, e));
                }
            }
        }
        Ok(Parser {
            tokens,
            offsets,
            line_map: LineMap::new(source),
            pos: 0,
        })
    }

    pub fn parse(&mut self) -> Result<Program, SmgError> {
        self.parse_block_body(false)
    }

    // ---- token cursor -----------------------------------------------

    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn peek_is_value(&self, value: &str) -> bool {
        self.peek(0).map(|t| t.value == value).unwrap_or(false)
    }

    fn peek_value_at(&self, offset: usize) -> Option<&str> {
        self.peek(offset).map(|t| t.value.as_str())
    }

    fn peek_is_qualifier(&self, offset: usize) -> bool {
        self.peek(offset)
            .map(|t| t.is(TokenKind::Qualifier))
            .unwrap_or(false)
    }

    fn consume(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn try_consume_value(&mut self, value: &str) -> Option<Token> {
        if self.peek_is_value(value) {
            self.consume()
        } else {
            None
        }
    }

    fn expect_value(&mut self, value: &str) -> Result<Token, SmgError> {
        self.try_consume_value(value)
            .ok_or_else(|| self.unexpected(vec![value.to_string()]))
    }

    fn expect_qualifier(&mut self) -> Result<String, SmgError> {
        match self.peek(0).cloned() {
            Some(t) if t.is(TokenKind::Qualifier) => {
                self.consume();
                Ok(t.value)
            }
            _ => Err(self.unexpected(vec!["identifier".to_string()])),
        }
    }

    fn expect_cast_type(&mut self) -> Result<String, SmgError> {
        match self.peek(0).cloned() {
            Some(t) if t.is(TokenKind::CastType) => {
                self.consume();
                Ok(t.value)
            }
            _ => Err(self.unexpected(vec!["cast type".to_string()])),
        }
    }

    fn expect_map_key(&mut self) -> Result<String, SmgError> {
        match self.peek(0).cloned() {
            Some(t)
                if t.is(TokenKind::Qualifier)
                    || t.is(TokenKind::StringLiteral)
                    || t.is(TokenKind::Keyword) =>
            {
                self.consume();
                Ok(t.value)
            }
            _ => Err(self.unexpected(vec!["map key".to_string()])),
        }
    }

    fn current_line(&self) -> usize {
        if let Some(&offset) = self.offsets.get(self.pos) {
            self.line_map.offset_to_pos(offset).line
        } else if let Some(&offset) = self.offsets.last() {
            self.line_map.offset_to_pos(offset).line
        } else {
            1
        }
    }

    fn unexpected(&self, expected: Vec<String>) -> SmgError {
        let line = self.current_line();
        match self.peek(0) {
            Some(t) => SmgError::parse(
                line,
                ParseErrorInfo::UnexpectedToken {
                    expected,
                    found: t.value.clone(),
                },
            ),
            None => SmgError::parse(line, ParseErrorInfo::UnexpectedEof { expected }),
        }
    }

    fn at_eof(&self) -> bool {
        self.peek(0).is_none()
    }

    fn at_statement_end(&self) -> bool {
        match self.peek(0) {
            None => true,
            Some(t) => t.is(TokenKind::StatementTerminator) || t.value == "}",
        }
    }

    /// Consumes zero or more terminator tokens; returns whether any
    /// were consumed (§4.2 "any number may be consumed between
    /// statements").
    fn skip_terminators(&mut self) -> bool {
        let mut any = false;
        while self
            .peek(0)
            .map(|t| t.is(TokenKind::StatementTerminator))
            .unwrap_or(false)
        {
            self.consume();
            any = true;
        }
        any
    }

    // ---- statements ---------------------------------------------------

    /// Parses statements until EOT (`in_braces = false`) or a `}`
    /// (`in_braces = true`), enforcing that every statement but the
    /// last is followed by a terminator, `}`, or EOT.
    fn parse_block_body(&mut self, in_braces: bool) -> Result<Program, SmgError> {
        let mut stmts = Vec::new();
        self.skip_terminators();
        loop {
            if self.at_eof() {
                break;
            }
            if in_braces && self.peek_is_value("}") {
                break;
            }
            let stmt = self.parse_statement()?;
            stmts.push(stmt);
            // A statement whose last consumed token was a scope's closing
            // `}` (an `if`/`while`/`function`/... body, or a bare `{ }`)
            // already reads as terminated, the same way the following
            // `}` closing the *enclosing* block does (§4.2 "a statement
            // not followed by a terminator, EOT, or `}`"): §8 scenario 2
            // relies on this to put a function statement directly before
            // the next statement with nothing but whitespace between.
            let prev_was_brace = self.pos > 0 && self.tokens[self.pos - 1].value == "}";
            let terminated = self.skip_terminators();
            let at_end = self.at_eof() || (in_braces && self.peek_is_value("}"));
            if !terminated && !at_end && !prev_was_brace {
                return Err(self.unexpected(vec!["newline".to_string(), ";".to_string()]));
            }
        }
        Ok(stmts)
    }

    /// `Scope := '{' Program '}'`, generalized to also accept a single
    /// bare statement without braces: §8 scenario 2's
    /// `if (n < 2) return n;` has no braces around the `if` body, which
    /// the abbreviated grammar's strict `Scope` production alone
    /// wouldn't admit (see DESIGN.md).
    fn parse_scope(&mut self) -> Result<Program, SmgError> {
        if self.peek_is_value("{") {
            self.consume();
            let body = self.parse_block_body(true)?;
            self.expect_value("}")?;
            Ok(body)
        } else {
            let stmt = self.parse_statement()?;
            Ok(vec![stmt])
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, SmgError> {
        let line = self.current_line();
        let tok = self
            .peek(0)
            .cloned()
            .ok_or_else(|| self.unexpected(vec!["statement".to_string()]))?;
        match tok.value.as_str() {
            "let" => self.parse_declare(line),
            "if" => self.parse_if(line),
            "while" => self.parse_while(line),
            "for" => self.parse_for(line),
            "break" => {
                self.consume();
                Ok(Spanned::new(line, StatementKind::Break))
            }
            "continue" => {
                self.consume();
                Ok(Spanned::new(line, StatementKind::Continue))
            }
            "return" => self.parse_return(line),
            "function" if self.peek_is_qualifier(1) => self.parse_function_stmt(line),
            "try" => self.parse_try_catch(line),
            "{" => {
                let inner = self.parse_scope()?;
                Ok(Spanned::new(line, StatementKind::Scope { inner }))
            }
            _ => self.parse_assign_or_expr_stmt(line),
        }
    }

    fn parse_declare(&mut self, line: usize) -> Result<Statement, SmgError> {
        self.consume(); // 'let'
        let name = self.expect_qualifier()?;
        let expr = if self.try_consume_value("=").is_some() {
            self.parse_expression()?
        } else {
            null_expr(line)
        };
        Ok(Spanned::new(line, StatementKind::Declare { name, expr }))
    }

    fn parse_if(&mut self, line: usize) -> Result<Statement, SmgError> {
        self.consume(); // 'if'
        let cond = self.parse_expression()?;
        let then_scope = self.parse_scope()?;
        let else_scope = if self.try_consume_value("else").is_some() {
            if self.peek_is_value("if") {
                let nested_line = self.current_line();
                Some(vec![self.parse_if(nested_line)?])
            } else {
                Some(self.parse_scope()?)
            }
        } else {
            None
        };
        Ok(Spanned::new(
            line,
            StatementKind::If {
                cond,
                then_scope,
                else_scope,
            },
        ))
    }

    fn parse_while(&mut self, line: usize) -> Result<Statement, SmgError> {
        self.consume(); // 'while'
        let cond = self.parse_expression()?;
        let scope = self.parse_scope()?;
        Ok(Spanned::new(line, StatementKind::While { cond, scope }))
    }

    /// Parses either a `let` declaration or an assign/expr statement,
    /// used both at statement level and inside `for(...)` headers,
    /// where no trailing terminator is consumed.
    fn parse_for_clause(&mut self) -> Result<Statement, SmgError> {
        let line = self.current_line();
        if self.peek_is_value("let") {
            self.parse_declare(line)
        } else {
            self.parse_assign_or_expr_stmt(line)
        }
    }

    fn parse_for(&mut self, line: usize) -> Result<Statement, SmgError> {
        self.consume(); // 'for'
        self.expect_value("(")?;
        if self.peek_is_qualifier(0) && self.peek_value_at(1) == Some("in") {
            let itr_name = self.expect_qualifier()?;
            self.expect_value("in")?;
            let list_term = self.parse_term()?;
            self.expect_value(")")?;
            let scope = self.parse_scope()?;
            Ok(Spanned::new(
                line,
                StatementKind::ForEach {
                    itr_name,
                    list_term,
                    scope,
                },
            ))
        } else {
            let init = if self.peek_is_value(";") {
                None
            } else {
                Some(Box::new(self.parse_for_clause()?))
            };
            self.expect_value(";")?;
            let cond = if self.peek_is_value(";") {
                None
            } else {
                Some(self.parse_expression()?)
            };
            self.expect_value(";")?;
            let inc = if self.peek_is_value(")") {
                None
            } else {
                Some(Box::new(self.parse_for_clause()?))
            };
            self.expect_value(")")?;
            let scope = self.parse_scope()?;
            Ok(Spanned::new(
                line,
                StatementKind::For {
                    init,
                    cond,
                    inc,
                    scope,
                },
            ))
        }
    }

    fn parse_param_list(&mut self) -> Result<Vec<Param>, SmgError> {
        self.expect_value("(")?;
        let mut params = Vec::new();
        if !self.peek_is_value(")") {
            loop {
                let name = self.expect_qualifier()?;
                let default = if self.try_consume_value("=").is_some() {
                    Some(self.parse_expression()?)
                } else {
                    None
                };
                params.push(Param { name, default });
                if self.try_consume_value(",").is_some() {
                    continue;
                }
                break;
            }
        }
        self.expect_value(")")?;
        Ok(params)
    }

    fn parse_function_stmt(&mut self, line: usize) -> Result<Statement, SmgError> {
        self.consume(); // 'function'
        let name = self.expect_qualifier()?;
        let params = self.parse_param_list()?;
        let body = self.parse_scope()?;
        Ok(Spanned::new(
            line,
            StatementKind::Function { name, params, body },
        ))
    }

    fn parse_return(&mut self, line: usize) -> Result<Statement, SmgError> {
        self.consume(); // 'return'
        let expr = if self.at_statement_end() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        Ok(Spanned::new(line, StatementKind::Return { expr }))
    }

    fn parse_try_catch(&mut self, line: usize) -> Result<Statement, SmgError> {
        self.consume(); // 'try'
        let try_block = self.parse_scope()?;
        let mut catch = None;
        let mut err_name = None;
        if self.try_consume_value("catch").is_some() {
            if self.try_consume_value("(").is_some() {
                if !self.peek_is_value(")") {
                    err_name = Some(self.expect_qualifier()?);
                }
                self.expect_value(")")?;
            } else if self.peek_is_qualifier(0) {
                err_name = Some(self.expect_qualifier()?);
            }
            catch = Some(self.parse_scope()?);
        }
        let finally = if self.try_consume_value("finally").is_some() {
            Some(self.parse_scope()?)
        } else {
            None
        };
        Ok(Spanned::new(
            line,
            StatementKind::TryCatch {
                try_block,
                catch,
                err_name,
                finally,
            },
        ))
    }

    fn check_assign_target(&self, term: &Term) -> Result<(), SmgError> {
        match &term.node {
            TermKind::Variable { .. } | TermKind::ArrayAccess { .. } | TermKind::PropAccess { .. } => {
                Ok(())
            }
            _ => Err(SmgError::parse(term.line, ParseErrorInfo::InvalidAssignTarget)),
        }
    }

    /// Implements §4.2's "statement/expression disambiguation": parse a
    /// `Term` speculatively, then check for an `AssignOperator`; if
    /// absent, fold the term into a full expression via precedence
    /// climbing and emit an `ExprStmt`.
    fn parse_assign_or_expr_stmt(&mut self, line: usize) -> Result<Statement, SmgError> {
        if self.peek_is_value("function") && self.peek_value_at(1) == Some("(") {
            let expr = self.parse_lambda()?;
            return Ok(Spanned::new(line, StatementKind::ExprStmt { expr }));
        }
        let term = self.parse_term()?;
        if let Some(op_tok) = self.peek(0).cloned() {
            if op_tok.is(TokenKind::AssignOperator) {
                self.check_assign_target(&term)?;
                self.consume();
                let op = assign_op_from_token(&op_tok);
                let expr = self.parse_expression()?;
                return Ok(Spanned::new(
                    line,
                    StatementKind::Assign {
                        target_term: term,
                        op,
                        expr,
                    },
                ));
            }
        }
        let expr = self.parse_precedence_from(term, 0)?;
        Ok(Spanned::new(line, StatementKind::ExprStmt { expr }))
    }

    // ---- expressions ----------------------------------------------

    fn parse_expression(&mut self) -> Result<Expression, SmgError> {
        if self.peek_is_value("function") && self.peek_value_at(1) == Some("(") {
            return self.parse_lambda();
        }
        let term = self.parse_term()?;
        self.parse_precedence_from(term, 0)
    }

    fn parse_lambda(&mut self) -> Result<Expression, SmgError> {
        let line = self.current_line();
        self.consume(); // 'function'
        let params = self.parse_param_list()?;
        let body = if self.peek_is_value("{") {
            self.parse_scope()?
        } else {
            let expr = self.parse_expression()?;
            let expr_line = expr.line;
            vec![Spanned::new(
                expr_line,
                StatementKind::Return { expr: Some(expr) },
            )]
        };
        Ok(Spanned::new(line, ExpressionKind::Lambda { params, body }))
    }

    fn peek_binary_op_at_least(&self, min_prec: u8) -> Option<Token> {
        self.peek(0)
            .cloned()
            .filter(|t| t.is(TokenKind::BinaryArithmetic) && t.precedence >= min_prec)
    }

    /// Precedence climbing (§4.2): given an already-parsed left term
    /// and a minimum precedence, folds in every following binary
    /// operator at or above that precedence, recursing to fold a
    /// strictly-tighter or equal-and-right-associative run into the
    /// right operand first.
    fn parse_precedence_from(&mut self, lhs_term: Term, min_prec: u8) -> Result<Expression, SmgError> {
        let line = lhs_term.line;
        let mut lhs_expr = Spanned::new(line, ExpressionKind::TermExpr {
            term: Box::new(lhs_term),
        });
        loop {
            let op_tok = match self.peek_binary_op_at_least(min_prec) {
                Some(t) => t,
                None => break,
            };
            self.consume();
            let op = binary_op_from_token(&op_tok)
                .map_err(|e| SmgError::parse(self.current_line(), e))?;
            let rhs_term0 = self.parse_term()?;
            let mut rhs_expr = Spanned::new(rhs_term0.line, ExpressionKind::TermExpr {
                term: Box::new(rhs_term0),
            });
            loop {
                match self.peek_binary_op_at_least(op_tok.precedence) {
                    Some(next_tok)
                        if next_tok.precedence > op_tok.precedence
                            || (next_tok.precedence == op_tok.precedence
                                && next_tok.right_associative) =>
                    {
                        let bump = if next_tok.precedence > op_tok.precedence { 1 } else { 0 };
                        let rhs_as_term = expr_to_term(rhs_expr);
                        rhs_expr = self.parse_precedence_from(rhs_as_term, op_tok.precedence + bump)?;
                    }
                    _ => break,
                }
            }
            let lhs_as_term = expr_to_term(lhs_expr);
            let rhs_as_term = expr_to_term(rhs_expr);
            lhs_expr = Spanned::new(
                line,
                ExpressionKind::BinaryExpr {
                    op,
                    lhs_term: Box::new(lhs_as_term),
                    rhs_term: Box::new(rhs_as_term),
                },
            );
        }
        Ok(lhs_expr)
    }

    // ---- terms ------------------------------------------------------

    fn parse_term(&mut self) -> Result<Term, SmgError> {
        let mut term = self.parse_primary()?;
        loop {
            let tok = match self.peek(0) {
                Some(t) => t.value.clone(),
                None => break,
            };
            match tok.as_str() {
                "[" => {
                    self.consume();
                    let index_expr = self.parse_expression()?;
                    self.expect_value("]")?;
                    let line = term.line;
                    term = Spanned::new(
                        line,
                        TermKind::ArrayAccess {
                            term: Box::new(term),
                            index_expr: Box::new(index_expr),
                        },
                    );
                }
                "." => {
                    self.consume();
                    let prop_name = self.expect_qualifier()?;
                    let line = term.line;
                    term = Spanned::new(
                        line,
                        TermKind::PropAccess {
                            term: Box::new(term),
                            prop_name,
                        },
                    );
                }
                "(" => {
                    self.consume();
                    let mut args = Vec::new();
                    if !self.peek_is_value(")") {
                        loop {
                            args.push(self.parse_expression()?);
                            if self.try_consume_value(",").is_some() {
                                continue;
                            }
                            break;
                        }
                    }
                    self.expect_value(")")?;
                    let line = term.line;
                    term = Spanned::new(
                        line,
                        TermKind::Call {
                            callee_term: Box::new(term),
                            args_exprs: args,
                        },
                    );
                }
                "as" => {
                    self.consume();
                    let type_name = self.expect_cast_type()?;
                    let line = term.line;
                    term = Spanned::new(
                        line,
                        TermKind::Cast {
                            term: Box::new(term),
                            type_name,
                        },
                    );
                }
                _ => break,
            }
        }
        Ok(term)
    }

    fn parse_primary(&mut self) -> Result<Term, SmgError> {
        let line = self.current_line();
        let tok = self
            .peek(0)
            .cloned()
            .ok_or_else(|| self.unexpected(vec!["expression".to_string()]))?;
        match tok.value.as_str() {
            "(" => {
                self.consume();
                let expr = self.parse_expression()?;
                self.expect_value(")")?;
                Ok(Spanned::new(line, TermKind::ParenExpr { expr: Box::new(expr) }))
            }
            "[" => self.parse_array_literal(line),
            "{" => self.parse_map_literal(line),
            "-" | "~" | "!" | "not" => self.parse_unary(line),
            "null" => {
                self.consume();
                Ok(Spanned::new(line, TermKind::Literal { value: Literal::Null }))
            }
            "true" => {
                self.consume();
                Ok(Spanned::new(
                    line,
                    TermKind::Literal {
                        value: Literal::Boolean(true),
                    },
                ))
            }
            "false" => {
                self.consume();
                Ok(Spanned::new(
                    line,
                    TermKind::Literal {
                        value: Literal::Boolean(false),
                    },
                ))
            }
            _ if tok.is(TokenKind::NumberLiteral) => {
                self.consume();
                Ok(Spanned::new(
                    line,
                    TermKind::Literal {
                        value: parse_number_literal(&tok.value),
                    },
                ))
            }
            _ if tok.is(TokenKind::StringLiteral) => {
                self.consume();
                Ok(Spanned::new(
                    line,
                    TermKind::Literal {
                        value: Literal::Str(tok.value.clone()),
                    },
                ))
            }
            _ if tok.is(TokenKind::Qualifier) => {
                self.consume();
                Ok(Spanned::new(line, TermKind::Variable { name: tok.value.clone() }))
            }
            _ => Err(self.unexpected(vec!["expression".to_string()])),
        }
    }

    fn parse_unary(&mut self, line: usize) -> Result<Term, SmgError> {
        let op_tok = self.consume().expect("caller peeked a unary operator");
        let op = match op_tok.value.as_str() {
            "-" => UnaryOp::Negate,
            "~" => UnaryOp::Invert,
            "!" | "not" => UnaryOp::Not,
            _ => unreachable!("parse_primary only dispatches recognized unary operators"),
        };
        let operand = self.parse_term()?;
        Ok(Spanned::new(
            line,
            TermKind::UnaryExpr {
                op,
                term: Box::new(operand),
            },
        ))
    }

    fn parse_array_literal(&mut self, line: usize) -> Result<Term, SmgError> {
        self.consume(); // '['
        let mut items = Vec::new();
        if !self.peek_is_value("]") {
            loop {
                items.push(self.parse_expression()?);
                if self.try_consume_value(",").is_some() {
                    continue;
                }
                break;
            }
        }
        self.expect_value("]")?;
        Ok(Spanned::new(line, TermKind::ArrayLiteral { items_exprs: items }))
    }

    fn parse_map_literal(&mut self, line: usize) -> Result<Term, SmgError> {
        self.consume(); // '{'
        let mut entries = Vec::new();
        if !self.peek_is_value("}") {
            loop {
                let key_name = self.expect_map_key()?;
                self.expect_value(":")?;
                let value_expr = self.parse_expression()?;
                entries.push((key_name, value_expr));
                if self.try_consume_value(",").is_some() {
                    continue;
                }
                break;
            }
        }
        self.expect_value("}")?;
        Ok(Spanned::new(line, TermKind::MapLiteral { entries }))
    }
}

/// Turns a fully-reduced operand back into a `Term`: a bare `TermExpr`
/// unwraps to its inner term (avoiding a redundant wrapper when no
/// operator applied at this level); anything else (a `BinaryExpr` or
/// `Lambda`) is boxed via `ParenExpr` so it can stand as the Term
/// operand an enclosing `BinaryExpr` requires (see `ast.rs`).
fn expr_to_term(expr: Expression) -> Term {
    match expr.node {
        ExpressionKind::TermExpr { term } => *term,
        other => Spanned::new(
            expr.line,
            TermKind::ParenExpr {
                expr: Box::new(Spanned::new(expr.line, other)),
            },
        ),
    }
}

fn parse_number_literal(text: &str) -> Literal {
    if !text.contains('.') {
        if let Ok(i) = text.parse::<i64>() {
            return Literal::Int(i);
        }
    }
    Literal::Float(text.parse::<f64>().unwrap_or(0.0))
}

fn assign_op_from_token(tok: &Token) -> AssignOp {
    match tok.value.as_str() {
        "=" => AssignOp::Assign,
        "+=" => AssignOp::AddEq,
        "-=" => AssignOp::SubEq,
        "*=" => AssignOp::MulEq,
        "/=" => AssignOp::DivEq,
        "%=" => AssignOp::ModEq,
        "&=" => AssignOp::AndEq,
        "|=" => AssignOp::OrEq,
        other => unreachable!("not an assign operator: {:?}", other),
    }
}

/// Maps an operator token to its `BinaryOp` (§3); `xor` is rejected
/// here rather than in the tokenizer, per §9.
fn binary_op_from_token(tok: &Token) -> Result<BinaryOp, ParseErrorInfo> {
    use BinaryOp::*;
    Ok(match tok.value.as_str() {
        "^" => Exponent,
        "*" => Multiply,
        "/" => Divide,
        "%" => Modulo,
        "+" => Add,
        "-" => Subtract,
        "<<" => ShiftLeft,
        ">>" => ShiftRight,
        "<" => Less,
        "<=" => LessEqual,
        ">" => Greater,
        ">=" => GreaterEqual,
        "==" => Equal,
        "!=" => NotEqual,
        "&" => BitAnd,
        "|" => BitOr,
        "and" => And,
        "or" => Or,
        other => {
            return Err(ParseErrorInfo::UnsupportedOperator {
                op: other.to_string(),
            })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Program {
        parse_program(source).unwrap_or_else(|e| panic!("parse error: {}", e))
    }

    #[test]
    fn precedence_multiply_binds_tighter_than_add() {
        let program = parse_ok("1 + 2 * 3");
        let stmt = &program[0];
        match &stmt.node {
            StatementKind::ExprStmt { expr } => match &expr.node {
                ExpressionKind::BinaryExpr { op, rhs_term, .. } => {
                    assert_eq!(*op, BinaryOp::Add);
                    match &rhs_term.node {
                        TermKind::ParenExpr { expr } => match &expr.node {
                            ExpressionKind::BinaryExpr { op, .. } => {
                                assert_eq!(*op, BinaryOp::Multiply)
                            }
                            other => panic!("expected nested BinaryExpr, got {:?}", other),
                        },
                        other => panic!("expected ParenExpr, got {:?}", other),
                    }
                }
                other => panic!("expected BinaryExpr, got {:?}", other),
            },
            other => panic!("expected ExprStmt, got {:?}", other),
        }
    }

    #[test]
    fn exponent_is_right_associative() {
        // 2 ^ 3 ^ 2 should parse as 2 ^ (3 ^ 2), i.e. the *lhs* stays a
        // bare term while the rhs nests the next exponent.
        let program = parse_ok("2 ^ 3 ^ 2");
        match &program[0].node {
            StatementKind::ExprStmt { expr } => match &expr.node {
                ExpressionKind::BinaryExpr { lhs_term, rhs_term, .. } => {
                    assert!(matches!(lhs_term.node, TermKind::Literal { .. }));
                    assert!(matches!(rhs_term.node, TermKind::ParenExpr { .. }));
                }
                other => panic!("expected BinaryExpr, got {:?}", other),
            },
            other => panic!("expected ExprStmt, got {:?}", other),
        }
    }

    #[test]
    fn xor_is_a_parse_error() {
        assert!(parse_program("1 xor 2").is_err());
    }

    #[test]
    fn assignment_targets_are_restricted() {
        assert!(parse_program("1 + 1 = 2").is_err());
        assert!(parse_program("a = 1").is_ok());
        assert!(parse_program("a[0] = 1").is_ok());
        assert!(parse_program("a.b = 1").is_ok());
    }

    #[test]
    fn if_without_braces_is_accepted() {
        let program = parse_ok("if (n < 2) return n;");
        assert!(matches!(program[0].node, StatementKind::If { .. }));
    }

    #[test]
    fn postfix_chain_parses_left_to_right() {
        let program = parse_ok("f(a).b[0] as int");
        match &program[0].node {
            StatementKind::ExprStmt { expr } => match &expr.node {
                ExpressionKind::TermExpr { term } => {
                    assert!(matches!(term.node, TermKind::Cast { .. }))
                }
                other => panic!("expected TermExpr, got {:?}", other),
            },
            other => panic!("expected ExprStmt, got {:?}", other),
        }
    }

    #[test]
    fn lambda_expression_form_rewrites_to_return() {
        let program = parse_ok("let adder = function (x) function (y) x + y;");
        match &program[0].node {
            StatementKind::Declare { expr, .. } => match &expr.node {
                ExpressionKind::Lambda { body, .. } => {
                    assert_eq!(body.len(), 1);
                    assert!(matches!(body[0].node, StatementKind::Return { .. }));
                }
                other => panic!("expected Lambda, got {:?}", other),
            },
            other => panic!("expected Declare, got {:?}", other),
        }
    }
}
