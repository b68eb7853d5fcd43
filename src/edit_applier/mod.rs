//! Component E: validate, order, and execute a batch of ranged
//! replacements, per §4.E.

mod inverse;

use crate::buffer::{Position, Range, TextBuffer};
use crate::error::{BufferError, Result};
use crate::events::{ContentChangeEvent, ContentChangeListener};
use crate::text_source::{contains_rtl_bytes, is_basic_ascii_bytes};

/// One requested replacement: replace `range` with `text` (empty `text`
/// means delete-only).
#[derive(Debug, Clone)]
pub struct EditOperation {
    pub identifier: Option<u64>,
    pub range: Range,
    pub text: Vec<u8>,
    pub force_move_markers: bool,
    pub is_auto_whitespace_edit: bool,
}

impl EditOperation {
    pub fn new(range: Range, text: impl Into<Vec<u8>>) -> Self {
        EditOperation {
            identifier: None,
            range,
            text: text.into(),
            force_move_markers: false,
            is_auto_whitespace_edit: false,
        }
    }
}

/// `{ identifier, range, text, forceMoveMarkers }`: enables a
/// caller-managed undo stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseEdit {
    pub identifier: Option<u64>,
    pub range: Range,
    pub text: Vec<u8>,
    pub force_move_markers: bool,
}

pub struct ApplyEditsResult {
    pub reverse_edits: Vec<ReverseEdit>,
    pub trim_auto_whitespace_line_numbers: Vec<usize>,
}

/// An edit after range validation: byte offsets resolved and `text`
/// split into lines, ready for sorting and execution.
struct ValidatedEdit {
    sort_index: usize,
    identifier: Option<u64>,
    range: Range,
    range_offset: usize,
    range_length: usize,
    lines: Option<Vec<Vec<u8>>>,
    text: Vec<u8>,
    force_move_markers: bool,
    is_auto_whitespace_edit: bool,
}

struct AutoWhitespaceCandidate {
    line: usize,
    old_content: Vec<u8>,
}

/// `applyEdits`: the full 9-step pipeline described in §4.E.
pub fn apply_edits(
    buffer: &mut TextBuffer,
    ops: Vec<EditOperation>,
    record_trim_auto_whitespace: bool,
    mut listener: Option<&mut dyn ContentChangeListener>,
) -> Result<ApplyEditsResult> {
    // Step 7 (P7): a batch of pure no-ops changes nothing and emits
    // nothing, short-circuiting before any of the ordering/overlap
    // machinery below.
    if ops.iter().all(|op| op.range.is_empty() && op.text.is_empty()) {
        return Ok(ApplyEditsResult {
            reverse_edits: Vec::new(),
            trim_auto_whitespace_line_numbers: Vec::new(),
        });
    }

    // Step 1: build validated records, tracking whether any edit text
    // would newly set the RTL/ASCII hints (scanned only while the
    // corresponding flag is still false).
    let mut would_contain_rtl = buffer.might_contain_rtl;
    let mut would_contain_non_basic_ascii = buffer.might_contain_non_basic_ascii;
    let mut validated = Vec::with_capacity(ops.len());
    for (sort_index, op) in ops.into_iter().enumerate() {
        if !would_contain_rtl && contains_rtl_bytes(&op.text) {
            would_contain_rtl = true;
        }
        if !would_contain_non_basic_ascii && !is_basic_ascii_bytes(&op.text) {
            would_contain_non_basic_ascii = true;
        }

        validate_position(buffer, op.range.start)?;
        validate_position(buffer, op.range.end)?;

        let range_offset = buffer.get_offset_at(op.range.start);
        let range_end_offset = buffer.get_offset_at(op.range.end);
        if range_end_offset < range_offset {
            return Err(BufferError::invalid_range(
                "edit range end precedes its start",
            ));
        }
        let lines = if op.text.is_empty() {
            None
        } else {
            Some(split_lines(&op.text))
        };
        validated.push(ValidatedEdit {
            sort_index,
            identifier: op.identifier,
            range: op.range,
            range_offset,
            range_length: range_end_offset - range_offset,
            lines,
            text: op.text,
            force_move_markers: op.force_move_markers,
            is_auto_whitespace_edit: op.is_auto_whitespace_edit,
        });
    }

    // Step 2: sort ascending by end-range, tie-break by sortIndex;
    // reject overlaps.
    validated.sort_by(|a, b| {
        let a_end = a.range_offset + a.range_length;
        let b_end = b.range_offset + b.range_length;
        a_end.cmp(&b_end).then(a.sort_index.cmp(&b.sort_index))
    });
    for pair in validated.windows(2) {
        let prev_end = pair[0].range_offset + pair[0].range_length;
        let next_start = pair[1].range_offset;
        if next_start < prev_end {
            return Err(BufferError::overlapping_ranges(format!(
                "edit at byte {} overlaps a prior edit ending at byte {}",
                next_start, prev_end
            )));
        }
    }

    // Step 3: inverse ranges, in the same ascending order.
    let inverse_ranges = inverse::compute_inverse_ranges(&validated);

    // Step 4: auto-whitespace candidates, captured against the
    // pre-edit buffer.
    let mut candidates = Vec::new();
    if record_trim_auto_whitespace {
        for (edit, inv_range) in validated.iter().zip(&inverse_ranges) {
            if edit.is_auto_whitespace_edit && edit.range.is_empty() {
                candidates.push(AutoWhitespaceCandidate {
                    line: inv_range.start.line,
                    old_content: buffer.get_line_content(edit.range.start.line),
                });
            }
        }
    }

    // Step 5: reverse operations, captured against the pre-edit buffer.
    let reverse_edits: Vec<ReverseEdit> = validated
        .iter()
        .zip(&inverse_ranges)
        .map(|(edit, inv_range)| ReverseEdit {
            identifier: edit.identifier,
            range: *inv_range,
            text: buffer.get_value_in_range(edit.range),
            force_move_markers: edit.force_move_markers,
        })
        .collect();

    // Step 6: commit the RTL/ASCII hints now that validation succeeded.
    buffer.might_contain_rtl = would_contain_rtl;
    buffer.might_contain_non_basic_ascii = would_contain_non_basic_ascii;

    // Step 7: re-sort descending and apply. Descending order keeps
    // earlier offsets valid throughout, since every edit already
    // applied lies strictly after the one about to be applied.
    validated.sort_by(|a, b| {
        let a_end = a.range_offset + a.range_length;
        let b_end = b.range_offset + b.range_length;
        b_end.cmp(&a_end).then(b.sort_index.cmp(&a.sort_index))
    });

    for edit in &validated {
        if edit.range_length > 0 {
            buffer.tree_mut().delete(edit.range_offset, edit.range_length);
        }
        if !edit.text.is_empty() {
            buffer.tree_mut().insert(edit.range_offset, &edit.text);
        }

        // Step 8: emit content-change events against the now-mutated
        // buffer; this edit's own start line is still valid since
        // nothing before it (in document order) has changed yet.
        if let Some(listener) = listener.as_deref_mut() {
            emit_events_for_edit(buffer, edit, listener);
        }
    }

    // Step 9: finalize the trim-candidate list.
    let trim_auto_whitespace_line_numbers = finalize_trim_candidates(buffer, candidates);

    Ok(ApplyEditsResult {
        reverse_edits,
        trim_auto_whitespace_line_numbers,
    })
}

fn emit_events_for_edit(buffer: &TextBuffer, edit: &ValidatedEdit, listener: &mut dyn ContentChangeListener) {
    let deleted_line_span = edit.range.end.line - edit.range.start.line;
    let inserted_line_span = edit.lines.as_ref().map_or(0, |lines| lines.len() - 1);
    let start_line = edit.range.start.line;
    let common = deleted_line_span.min(inserted_line_span);

    for i in 0..=common {
        let line = start_line + i;
        listener.on_content_change(&ContentChangeEvent::LineChanged {
            line,
            new_content: buffer.get_line_content(line),
        });
    }

    if deleted_line_span > inserted_line_span {
        listener.on_content_change(&ContentChangeEvent::LinesDeleted {
            from: start_line + common + 1,
            to: edit.range.end.line,
        });
    } else if inserted_line_span > deleted_line_span {
        let lines = edit.lines.as_ref().expect("inserted_line_span > 0 implies lines");
        listener.on_content_change(&ContentChangeEvent::LinesInserted {
            from: start_line + common + 1,
            to: start_line + inserted_line_span,
            joined_content: join_lines(&lines[(common + 1)..]),
        });
    }
}

fn finalize_trim_candidates(buffer: &TextBuffer, candidates: Vec<AutoWhitespaceCandidate>) -> Vec<usize> {
    let mut lines: Vec<usize> = candidates.iter().map(|c| c.line).collect();
    lines.sort_unstable_by(|a, b| b.cmp(a));
    lines.dedup();

    lines
        .into_iter()
        .filter(|&line| {
            let current = buffer.get_line_content(line);
            if current.is_empty() {
                return false;
            }
            if current.iter().any(|&b| b != b' ' && b != b'\t') {
                return false;
            }
            let old = candidates
                .iter()
                .find(|c| c.line == line)
                .map(|c| c.old_content.as_slice())
                .unwrap_or(&[]);
            current != old
        })
        .collect()
}

/// Reject a position outside the document rather than silently
/// clamping it, per the boundary-misuse handling policy: line 0,
/// column 0, or a line past the document's last line are contract
/// violations the applier fails on, not inputs it repairs.
fn validate_position(buffer: &TextBuffer, pos: Position) -> Result<()> {
    if pos.line == 0 || pos.column == 0 {
        return Err(BufferError::invalid_range(format!(
            "position ({}, {}) uses a 0 line or column; both are 1-based",
            pos.line, pos.column
        )));
    }
    if pos.line > buffer.line_count() {
        return Err(BufferError::invalid_offset(format!(
            "line {} exceeds document line count {}",
            pos.line,
            buffer.line_count()
        )));
    }
    if pos.column > buffer.get_line_max_column(pos.line) {
        return Err(BufferError::invalid_offset(format!(
            "column {} exceeds line {}'s max column {}",
            pos.column,
            pos.line,
            buffer.get_line_max_column(pos.line)
        )));
    }
    Ok(())
}

/// Split `text` at any `\r\n`, `\r`, or `\n`, keeping the separators
/// out of the fragments. A `k`-line-break input yields `k + 1`
/// fragments, matching the `lines` field's role in §3's
/// validated-edit record.
fn split_lines(text: &[u8]) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < text.len() {
        match text[i] {
            b'\n' => {
                lines.push(text[start..i].to_vec());
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(text[start..i].to_vec());
                i += if text.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push(text[start..].to_vec());
    lines
}

fn join_lines(lines: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push(b'\n');
        }
        out.extend_from_slice(line);
    }
    out
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
