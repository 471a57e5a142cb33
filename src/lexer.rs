// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The tokenizer (§4.1): a small state machine over the raw character
//! stream. `next_token` returns `Ok(None)` for the sentinel `EOT` once
//! all source has been consumed.

use std::collections::HashMap;

use crate::error::LexError;
use crate::span::LineMap;
use crate::token::{self, Token, TokenKind};

pub type LexResult<T> = Result<T, LexError>;

/// State names from §4.1/§2, kept only for documentation purposes —
/// each is implemented as its own method below rather than as an
/// explicit enum, since the dispatch in `next_token` already encodes
/// the transition table.
#[allow(dead_code)]
enum State {
    Waiting,
    Word,
    Number,
    StringSingle,
    StringDouble,
    Comment,
}

pub struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
    line_map: LineMap<'a>,
    keywords: HashMap<String, Token>,
    punctuation: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        let keywords = token::keyword_table()
            .into_iter()
            .map(|t| (t.value.clone(), t))
            .collect();
        Tokenizer {
            source,
            pos: 0,
            line_map: LineMap::new(source),
            keywords,
            punctuation: token::punctuation_table(),
        }
    }

    /// Rewinds the read cursor to the start of the source.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// The current byte offset of the read cursor.
    pub fn offset(&self) -> usize {
        self.pos
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Longest-match scan over the canonical punctuation/operator
    /// table, which is kept sorted by descending `value` length.
    fn match_punctuation(&self) -> Option<Token> {
        let rest = self.rest();
        self.punctuation
            .iter()
            .find(|t| rest.starts_with(t.value.as_str()))
            .cloned()
    }

    /// Produces the next token, or `None` at end of input (the `EOT`
    /// sentinel of §4.1).
    pub fn next_token(&mut self) -> LexResult<Option<Token>> {
        loop {
            let ch = match self.current_char() {
                None => return Ok(None),
                Some(ch) => ch,
            };

            if ch == '\n' {
                self.pos += 1;
                let tok = token::newline_token();
                log::trace!("token {:?} {:?}", tok.value, tok.kinds);
                return Ok(Some(tok));
            }

            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
                continue;
            }

            if let Some(canonical) = self.match_punctuation() {
                if canonical.value == "#" {
                    return Ok(Some(self.lex_comment()));
                }
                self.pos += canonical.value.len();
                match canonical.value.as_str() {
                    "'" => return self.lex_string('\'').map(Some),
                    "\"" => return self.lex_string('"').map(Some),
                    _ => {
                        log::trace!("token {:?} {:?}", canonical.value, canonical.kinds);
                        return Ok(Some(canonical));
                    }
                }
            }

            if ch == '_' || ch.is_alphabetic() {
                let tok = self.lex_word();
                log::trace!("token {:?} {:?}", tok.value, tok.kinds);
                return Ok(Some(tok));
            }

            if ch.is_ascii_digit() {
                let tok = self.lex_number();
                log::trace!("token {:?} {:?}", tok.value, tok.kinds);
                return Ok(Some(tok));
            }

            let at = self.line_map.offset_to_pos(self.pos);
            return Err(LexError::UnrecognizedChar { ch, at });
        }
    }

    fn lex_word(&mut self) -> Token {
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if ch == '_' || ch.is_alphanumeric() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        let text = &self.source[start..self.pos];
        if let Some(canonical) = self.keywords.get(text) {
            canonical.clone()
        } else {
            Token::new(text, vec![TokenKind::Qualifier])
        }
    }

    fn lex_number(&mut self) -> Token {
        let start = self.pos;
        let mut dot_seen = false;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.pos += 1;
            } else if ch == '.' && !dot_seen {
                dot_seen = true;
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = &self.source[start..self.pos];
        Token::new(text, vec![TokenKind::NumberLiteral])
    }

    fn lex_string(&mut self, quote: char) -> LexResult<Token> {
        let mut value = String::new();
        loop {
            let ch = match self.current_char() {
                None => {
                    let at = self.line_map.offset_to_pos(self.pos);
                    return Err(LexError::UnterminatedString { at });
                }
                Some(ch) => ch,
            };
            if ch == '\n' {
                let at = self.line_map.offset_to_pos(self.pos);
                return Err(LexError::NewlineInString { at });
            }
            if ch == quote {
                self.pos += ch.len_utf8();
                break;
            }
            if ch == '\\' {
                self.pos += 1;
                let raw = match self.current_char() {
                    None => {
                        let at = self.line_map.offset_to_pos(self.pos);
                        return Err(LexError::UnterminatedString { at });
                    }
                    Some(raw) => raw,
                };
                let escaped = match raw {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    'b' => '\u{8}',
                    '"' => '"',
                    '\'' => '\'',
                    other => other,
                };
                self.pos += raw.len_utf8();
                value.push(escaped);
                continue;
            }
            value.push(ch);
            self.pos += ch.len_utf8();
        }
        Ok(Token::new(value, vec![TokenKind::StringLiteral]))
    }

    fn lex_comment(&mut self) -> Token {
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if ch == '\n' {
                break;
            }
            self.pos += ch.len_utf8();
        }
        let text = &self.source[start..self.pos];
        Token::new(text, vec![TokenKind::Comment])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(source);
        let mut tokens = Vec::new();
        while let Some(tok) = tokenizer.next_token().unwrap() {
            tokens.push(tok);
        }
        tokens
    }

    #[test]
    fn keywords_are_maximal_munch() {
        let tokens = lex_all("and android");
        assert_eq!(tokens[0].value, "and");
        assert!(tokens[0].is(TokenKind::Keyword));
        assert_eq!(tokens[2].value, "android");
        assert!(tokens[2].is(TokenKind::Qualifier));
    }

    #[test]
    fn longest_match_operators() {
        let tokens = lex_all("a <= b");
        assert_eq!(tokens[1].value, "<=");
    }

    #[test]
    fn number_literal_with_one_dot() {
        let tokens = lex_all("3.14");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "3.14");
    }

    #[test]
    fn string_escapes() {
        let tokens = lex_all("\"a\\nb\"");
        assert_eq!(tokens[0].value, "a\nb");
    }

    #[test]
    fn unterminated_string_errors() {
        let mut tokenizer = Tokenizer::new("\"abc");
        assert!(matches!(
            tokenizer.next_token(),
            Err(LexError::UnterminatedString { .. })
        ));
    }

    #[test]
    fn newline_in_string_errors() {
        let mut tokenizer = Tokenizer::new("\"abc\ndef\"");
        assert!(matches!(
            tokenizer.next_token(),
            Err(LexError::NewlineInString { .. })
        ));
    }

    #[test]
    fn comment_runs_to_newline() {
        let tokens = lex_all("# hello\n1");
        assert!(tokens[0].is(TokenKind::Comment));
        assert_eq!(tokens[0].value, "# hello");
        assert!(tokens[1].is(TokenKind::StatementTerminator));
        assert_eq!(tokens[2].value, "1");
    }

    #[test]
    fn reset_rewinds_cursor() {
        let mut tokenizer = Tokenizer::new("1 2");
        tokenizer.next_token().unwrap();
        tokenizer.reset();
        let tok = tokenizer.next_token().unwrap().unwrap();
        assert_eq!(tok.value, "1");
    }
}
