//! `computeInverseEditRanges`: reconstruct, for a batch of edits sorted
//! ascending by end-position, the range each edit's inserted text will
//! occupy in the *post*-edit document, without touching the buffer.
//!
//! Ported from the chained-delta algorithm described in §4.E: each
//! edit's start position shifts by the net line/column delta left
//! behind by every edit before it, and the column delta only survives
//! onto the next edit when both lie on the same final line.

use crate::buffer::{Position, Range};

use super::ValidatedEdit;

pub(super) fn compute_inverse_ranges(edits: &[ValidatedEdit]) -> Vec<Range> {
    let mut result = Vec::with_capacity(edits.len());

    let mut prev_op_end_line = 0usize;
    let mut delta_line = 0isize;
    let mut delta_column = 0isize;

    for edit in edits {
        let start_line = edit.range.start.line;
        let start_column = edit.range.start.column;

        let result_start_line = (start_line as isize + delta_line) as usize;
        let result_start_column = if start_line == prev_op_end_line {
            (start_column as isize + delta_column) as usize
        } else {
            start_column
        };

        let line_count = edit.lines.as_ref().map_or(1, |lines| lines.len());
        let last_line_len = edit
            .lines
            .as_ref()
            .and_then(|lines| lines.last())
            .map_or(0, |l| l.len());

        let (result_end_line, result_end_column) = if line_count == 1 {
            (result_start_line, result_start_column + last_line_len)
        } else {
            (result_start_line + line_count - 1, last_line_len + 1)
        };

        result.push(Range::new(
            Position::new(result_start_line, result_start_column),
            Position::new(result_end_line, result_end_column),
        ));

        let end_line = edit.range.end.line;
        let end_column = edit.range.end.column;

        delta_line = result_end_line as isize - end_line as isize;
        // Only meaningful when the next edit's start line still equals
        // `prev_op_end_line`, checked above before it's applied.
        delta_column = result_end_column as isize - end_column as isize;

        prev_op_end_line = end_line;
    }

    result
}

#[cfg(test)]
#[path = "inverse_tests.rs"]
mod tests;
