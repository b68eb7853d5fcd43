use super::*;
use crate::buffer::Position;
use crate::events::RecordingListener;

#[test]
fn batch_edit_returns_reverse_edits_that_undo_it() {
    // "aaa\nbbb\nccc" -> replace "bbb" with "XY", then insert "!" after "ccc".
    let mut buf = TextBuffer::from_bytes(b"aaa\nbbb\nccc".to_vec());
    let ops = vec![
        EditOperation::new(Range::new(Position::new(2, 1), Position::new(2, 4)), b"XY".to_vec()),
        EditOperation::new(Range::new(Position::new(3, 4), Position::new(3, 4)), b"!".to_vec()),
    ];
    let result = apply_edits(&mut buf, ops, false, None).unwrap();
    assert_eq!(buf.get_value_in_range(Range::new(Position::new(1, 1), Position::new(3, 5))), b"aaa\nXY\nccc!");
    assert_eq!(result.reverse_edits.len(), 2);

    // Undo in the same batch-apply machinery, from the recorded ranges/text.
    let undo_ops: Vec<EditOperation> = result
        .reverse_edits
        .into_iter()
        .map(|r| EditOperation::new(r.range, r.text))
        .collect();
    apply_edits(&mut buf, undo_ops, false, None).unwrap();
    assert_eq!(buf.get_value_in_range(Range::new(Position::new(1, 1), Position::new(3, 4))), b"aaa\nbbb\nccc");
}

#[test]
fn overlapping_edits_in_one_batch_are_rejected() {
    let mut buf = TextBuffer::from_bytes(b"abcdef".to_vec());
    let ops = vec![
        EditOperation::new(Range::new(Position::new(1, 1), Position::new(1, 4)), b"X".to_vec()),
        EditOperation::new(Range::new(Position::new(1, 3), Position::new(1, 6)), b"Y".to_vec()),
    ];
    let err = apply_edits(&mut buf, ops, false, None).unwrap_err();
    assert_eq!(err.kind, crate::error::ErrorKind::OverlappingRanges);
    // The buffer is untouched since validation failed before any mutation.
    assert_eq!(buf.get_value_in_range(Range::new(Position::new(1, 1), Position::new(1, 7))), b"abcdef");
}

#[test]
fn no_op_batch_changes_nothing_and_emits_nothing() {
    let mut buf = TextBuffer::from_bytes(b"abc".to_vec());
    let mut listener = RecordingListener::default();
    let ops = vec![EditOperation::new(Range::new(Position::new(1, 2), Position::new(1, 2)), Vec::new())];
    apply_edits(&mut buf, ops, false, Some(&mut listener)).unwrap();
    assert!(listener.events.is_empty());
    assert_eq!(buf.get_value_in_range(Range::new(Position::new(1, 1), Position::new(1, 4))), b"abc");
}

#[test]
fn single_line_replacement_emits_line_changed() {
    let mut buf = TextBuffer::from_bytes(b"abc\ndef".to_vec());
    let mut listener = RecordingListener::default();
    let ops = vec![EditOperation::new(Range::new(Position::new(1, 1), Position::new(1, 4)), b"XYZ".to_vec())];
    apply_edits(&mut buf, ops, false, Some(&mut listener)).unwrap();
    assert_eq!(
        listener.events,
        vec![ContentChangeEvent::LineChanged { line: 1, new_content: b"XYZ".to_vec() }]
    );
}

#[test]
fn inserting_lines_emits_lines_inserted() {
    let mut buf = TextBuffer::from_bytes(b"abc\ndef".to_vec());
    let mut listener = RecordingListener::default();
    let ops = vec![EditOperation::new(Range::new(Position::new(1, 4), Position::new(1, 4)), b"\nX\nY".to_vec())];
    apply_edits(&mut buf, ops, false, Some(&mut listener)).unwrap();
    assert_eq!(buf.line_count(), 4);
    assert!(matches!(listener.events[0], ContentChangeEvent::LineChanged { line: 1, .. }));
    assert!(matches!(listener.events[1], ContentChangeEvent::LinesInserted { from: 2, to: 3, .. }));
}

#[test]
fn deleting_lines_emits_lines_deleted() {
    let mut buf = TextBuffer::from_bytes(b"aaa\nbbb\nccc\nddd".to_vec());
    let mut listener = RecordingListener::default();
    let ops = vec![EditOperation::new(Range::new(Position::new(1, 4), Position::new(3, 4)), Vec::new())];
    apply_edits(&mut buf, ops, false, Some(&mut listener)).unwrap();
    assert_eq!(buf.get_value_in_range(Range::new(Position::new(1, 1), Position::new(2, 4))), b"aaa\nddd");
    assert!(matches!(listener.events[0], ContentChangeEvent::LineChanged { line: 1, .. }));
    assert!(matches!(listener.events[1], ContentChangeEvent::LinesDeleted { from: 2, to: 3 }));
}

#[test]
fn position_past_the_last_line_is_rejected() {
    let mut buf = TextBuffer::from_bytes(b"abc".to_vec());
    let ops = vec![EditOperation::new(Range::new(Position::new(5, 1), Position::new(5, 1)), b"x".to_vec())];
    let err = apply_edits(&mut buf, ops, false, None).unwrap_err();
    assert_eq!(err.kind, crate::error::ErrorKind::InvalidOffset);
}

#[test]
fn column_zero_is_rejected() {
    let mut buf = TextBuffer::from_bytes(b"abc".to_vec());
    let ops = vec![EditOperation::new(Range::new(Position::new(1, 0), Position::new(1, 1)), b"x".to_vec())];
    let err = apply_edits(&mut buf, ops, false, None).unwrap_err();
    assert_eq!(err.kind, crate::error::ErrorKind::InvalidRange);
}

#[test]
fn split_lines_counts_breaks_correctly() {
    assert_eq!(split_lines(b"a\nb\r\nc\rd").len(), 4);
    assert_eq!(split_lines(b"no breaks").len(), 1);
}
