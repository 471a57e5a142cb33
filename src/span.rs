// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Line/column tracking for source positions, used by error reporting.

/// A 1-based line/column position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets into a source string to line/column positions.
///
/// Built once per source file; `offset_to_pos` is then O(log n) via
/// binary search over the recorded line start offsets.
pub struct LineMap<'a> {
    source: &'a str,
    line_offsets: Vec<usize>,
}

impl<'a> LineMap<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_offsets = vec![0];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_offsets.push(i + 1);
            }
        }
        LineMap {
            source,
            line_offsets,
        }
    }

    /// Converts a byte offset into the source into a 1-based line/column.
    pub fn offset_to_pos(&self, offset: usize) -> Pos {
        let line_idx = match self.line_offsets.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_offsets[line_idx];
        let column = self.source[line_start..offset].chars().count();
        Pos {
            line: line_idx + 1,
            column: column + 1,
        }
    }

    /// The byte span of the given 1-based line number, excluding the
    /// trailing newline.
    pub fn line_span(&self, line: usize) -> (usize, usize) {
        let start = self.line_offsets[line - 1];
        let end = self
            .line_offsets
            .get(line)
            .map(|&o| o.saturating_sub(1))
            .unwrap_or(self.source.len());
        (start, end)
    }

    /// Renders the given 1-based line with a `^` marker under `column`,
    /// for CLI diagnostics.
    pub fn highlight(&self, line: usize, column: usize) -> String {
        let (start, end) = self.line_span(line);
        let text = &self.source[start..end];
        let marker: String = std::iter::repeat(' ')
            .take(column.saturating_sub(1))
            .chain(std::iter::once('^'))
            .collect();
        format!("{}\n{}", text, marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_to_pos_first_line() {
        let map = LineMap::new("abc\ndef\n");
        assert_eq!(map.offset_to_pos(0), Pos { line: 1, column: 1 });
        assert_eq!(map.offset_to_pos(2), Pos { line: 1, column: 3 });
    }

    #[test]
    fn offset_to_pos_second_line() {
        let map = LineMap::new("abc\ndef\n");
        assert_eq!(map.offset_to_pos(4), Pos { line: 2, column: 1 });
        assert_eq!(map.offset_to_pos(6), Pos { line: 2, column: 3 });
    }

    #[test]
    fn highlight_marks_column() {
        let map = LineMap::new("let x = 1\nprint(x)\n");
        let rendered = map.highlight(2, 7);
        assert_eq!(rendered, "print(x)\n      ^");
    }
}
