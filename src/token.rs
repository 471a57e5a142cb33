// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Tokens and the canonical token table that drives the tokenizer's
//! longest-match scanning and the parser's precedence climbing.

/// Closed set of token classifications. A token may belong to more than
/// one kind, e.g. `-` is both `BinaryArithmetic` and `UnaryArithmetic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Qualifier,
    Keyword,
    CastType,
    Punctuation,
    Whitespace,
    Comment,
    NumberLiteral,
    StringLiteral,
    BooleanLiteral,
    FunctionDecl,
    DateLiteral,
    BinaryArithmetic,
    UnaryArithmetic,
    AssignOperator,
    StatementTerminator,
    ScopeTerminator,
}

/// An immutable token record.
///
/// Canonical tokens (keywords, punctuation, operators) are produced
/// from the table below; dynamically produced tokens (qualifiers,
/// literals, comments) are built ad hoc by the tokenizer and carry a
/// single kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub value: String,
    pub kinds: Vec<TokenKind>,
    pub precedence: u8,
    pub right_associative: bool,
}

impl Token {
    pub fn new(value: impl Into<String>, kinds: Vec<TokenKind>) -> Self {
        Token {
            value: value.into(),
            kinds,
            precedence: 0,
            right_associative: false,
        }
    }

    pub fn with_precedence(mut self, precedence: u8, right_associative: bool) -> Self {
        self.precedence = precedence;
        self.right_associative = right_associative;
        self
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Canonical token definition: value, kinds, precedence (0 if
/// inapplicable) and right-associativity, as built by [`canonical_table`].
fn tok(value: &str, kinds: &[TokenKind]) -> Token {
    Token::new(value, kinds.to_vec())
}

fn op(value: &str, kinds: &[TokenKind], precedence: u8, right_assoc: bool) -> Token {
    tok(value, kinds).with_precedence(precedence, right_assoc)
}

/// The reserved words of the language (§6), excluding cast type names.
pub const KEYWORDS: &[&str] = &[
    "null", "if", "else", "while", "for", "in", "let", "function", "break", "continue", "try",
    "catch", "finally", "return", "as", "true", "false", "and", "or", "xor", "not",
];

/// Cast type names (§6), also reserved words.
pub const CAST_TYPES: &[&str] = &[
    "int", "long", "double", "float", "char", "string", "boolean", "date",
];

/// All canonical tokens whose text begins with an identifier character
/// (`_` or alphabetic). These are never matched by the longest-match
/// scan; the tokenizer only consults them by exact-text lookup once a
/// `WORD` has been fully accumulated, so that e.g. `android` never
/// partially matches the keyword `and` (§8 maximal-munch law).
pub fn keyword_table() -> Vec<Token> {
    use TokenKind::*;
    vec![
        tok("null", &[Keyword]),
        tok("if", &[Keyword]),
        tok("else", &[Keyword]),
        tok("while", &[Keyword]),
        tok("for", &[Keyword]),
        tok("in", &[Keyword]),
        tok("let", &[Keyword]),
        tok("function", &[Keyword, FunctionDecl]),
        tok("break", &[Keyword]),
        tok("continue", &[Keyword]),
        tok("try", &[Keyword]),
        tok("catch", &[Keyword]),
        tok("finally", &[Keyword]),
        tok("return", &[Keyword]),
        tok("as", &[Keyword]),
        tok("true", &[Keyword, BooleanLiteral]),
        tok("false", &[Keyword, BooleanLiteral]),
        op("and", &[Keyword, BinaryArithmetic], 1, false),
        op("or", &[Keyword, BinaryArithmetic], 1, false),
        // `xor` tokenizes with a precedence slot but is rejected by the
        // parser's binary-node factory; see DESIGN.md Open Questions.
        op("xor", &[Keyword, BinaryArithmetic], 2, false),
        tok("not", &[Keyword, UnaryArithmetic]),
        tok("int", &[CastType]),
        tok("long", &[CastType]),
        tok("double", &[CastType]),
        tok("float", &[CastType]),
        tok("char", &[CastType]),
        tok("string", &[CastType]),
        tok("boolean", &[CastType]),
        tok("date", &[CastType]),
    ]
}

/// All canonical tokens made of punctuation/operator characters, sorted
/// by descending `value` length so the tokenizer can greedily
/// longest-match them (§4.1, §9).
pub fn punctuation_table() -> Vec<Token> {
    use TokenKind::*;
    let mut table = vec![
        // two-character operators
        op("<<", &[BinaryArithmetic], 5, false),
        op(">>", &[BinaryArithmetic], 5, false),
        op("<=", &[BinaryArithmetic], 4, false),
        op(">=", &[BinaryArithmetic], 4, false),
        op("==", &[BinaryArithmetic], 3, false),
        op("!=", &[BinaryArithmetic], 3, false),
        tok("+=", &[AssignOperator]),
        tok("-=", &[AssignOperator]),
        tok("*=", &[AssignOperator]),
        tok("/=", &[AssignOperator]),
        tok("%=", &[AssignOperator]),
        tok("&=", &[AssignOperator]),
        tok("|=", &[AssignOperator]),
        // one-character operators
        op("^", &[BinaryArithmetic], 8, true),
        op("*", &[BinaryArithmetic], 7, false),
        op("/", &[BinaryArithmetic], 7, false),
        op("%", &[BinaryArithmetic], 7, false),
        op("+", &[BinaryArithmetic, UnaryArithmetic], 6, false),
        op("-", &[BinaryArithmetic, UnaryArithmetic], 6, false),
        op("<", &[BinaryArithmetic], 4, false),
        op(">", &[BinaryArithmetic], 4, false),
        op("&", &[BinaryArithmetic], 2, false),
        op("|", &[BinaryArithmetic], 2, false),
        tok("~", &[UnaryArithmetic]),
        tok("!", &[UnaryArithmetic]),
        tok("=", &[AssignOperator]),
        // grouping / structural punctuation
        tok("(", &[Punctuation]),
        tok(")", &[Punctuation]),
        tok("{", &[Punctuation]),
        tok("}", &[Punctuation, ScopeTerminator]),
        tok("[", &[Punctuation]),
        tok("]", &[Punctuation]),
        tok(".", &[Punctuation]),
        tok(",", &[Punctuation]),
        tok(":", &[Punctuation]),
        tok(";", &[Punctuation, StatementTerminator]),
        // quote / comment entry tokens: the tokenizer transitions state
        // on these rather than emitting them as-is.
        tok("'", &[Punctuation]),
        tok("\"", &[Punctuation]),
        tok("#", &[Punctuation]),
    ];
    table.sort_by(|a, b| b.value.len().cmp(&a.value.len()));
    table
}

/// The `Newline` token: a statement terminator that also counts as
/// whitespace (§4.1 observable order).
pub fn newline_token() -> Token {
    tok("\n", &[TokenKind::StatementTerminator, TokenKind::Whitespace])
}
