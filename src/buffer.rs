//! Component G: the cursor-position mapping helpers, as inherent
//! methods on [`TextBuffer`], the facade that owns a [`PieceTree`] and
//! the document-level flags (EOL convention, RTL/ASCII hints) a
//! [`TextSource`] provides at construction.

use crate::indentation::LineSource;
use crate::piece_table::PieceTree;
use crate::text_source::{Eol, TextSource};

/// A 1-based (line, column) position; column 1 is before the first
/// character of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Range { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

pub struct TextBuffer {
    tree: PieceTree,
    pub eol: Eol,
    pub might_contain_rtl: bool,
    pub might_contain_non_basic_ascii: bool,
}

impl TextBuffer {
    pub fn from_source(source: &dyn TextSource) -> Self {
        let text = source.raw_buffer().text.clone();
        TextBuffer {
            tree: PieceTree::new(text),
            eol: source.eol(),
            might_contain_rtl: source.contains_rtl(),
            might_contain_non_basic_ascii: !source.is_basic_ascii(),
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        TextBuffer {
            tree: PieceTree::new(bytes),
            eol: Eol::Lf,
            might_contain_rtl: false,
            might_contain_non_basic_ascii: false,
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.tree.line_count()
    }

    pub fn get_offset_at(&self, pos: Position) -> usize {
        self.tree.offset_at(pos.line, pos.column)
    }

    pub fn get_position_at(&self, offset: usize) -> Position {
        let (line, column) = self.tree.position_at(offset);
        Position::new(line, column)
    }

    pub fn get_range_at(&self, offset: usize, length: usize) -> Range {
        Range::new(
            self.get_position_at(offset),
            self.get_position_at(offset + length),
        )
    }

    pub fn get_value_in_range(&self, range: Range) -> Vec<u8> {
        let start = self.get_offset_at(range.start);
        let end = self.get_offset_at(range.end);
        self.tree.value_in_range(start, end)
    }

    pub fn get_line_content(&self, line: usize) -> Vec<u8> {
        self.tree.line_content(line)
    }

    pub fn get_line_length(&self, line: usize) -> usize {
        self.tree.line_length(line)
    }

    pub fn get_line_min_column(&self, _line: usize) -> usize {
        1
    }

    pub fn get_line_max_column(&self, line: usize) -> usize {
        self.tree.line_length(line) + 1
    }

    /// Column of the first non-whitespace character, or 0 if the line
    /// is empty or whitespace-only.
    pub fn get_line_first_nonwhitespace_column(&self, line: usize) -> usize {
        let content = self.tree.line_content(line);
        match content.iter().position(|&b| b != b' ' && b != b'\t') {
            Some(i) => i + 1,
            None => 0,
        }
    }

    /// Column just past the last non-whitespace character, or 0 if the
    /// line is empty or whitespace-only.
    pub fn get_line_last_nonwhitespace_column(&self, line: usize) -> usize {
        let content = self.tree.line_content(line);
        match content.iter().rposition(|&b| b != b' ' && b != b'\t') {
            Some(i) => i + 2,
            None => 0,
        }
    }

    pub(crate) fn tree(&self) -> &PieceTree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut PieceTree {
        &mut self.tree
    }
}

impl LineSource for TextBuffer {
    fn line_count(&self) -> usize {
        TextBuffer::line_count(self)
    }

    fn line_content(&self, line: usize) -> Vec<u8> {
        TextBuffer::get_line_content(self, line)
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
