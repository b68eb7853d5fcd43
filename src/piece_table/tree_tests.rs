use super::*;

fn content(t: &PieceTree) -> Vec<u8> {
    t.value_in_range(0, t.len())
}

#[test]
fn basic_insert_into_empty() {
    let mut t = PieceTree::new(Vec::new());
    t.insert(0, b"hello");
    assert_eq!(content(&t), b"hello");
    assert_eq!(t.line_count(), 1);
    assert_eq!(t.line_content(1), b"hello");
    t.validate();
}

#[test]
fn coalescing_appends_stay_one_piece() {
    let mut t = PieceTree::new(Vec::new());
    t.insert(0, b"a");
    t.insert(1, b"b");
    t.insert(2, b"c");
    assert_eq!(content(&t), b"abc");
    // A single coalesced piece means the tree is a single node.
    assert!(t.root.as_ref().unwrap().left.is_none());
    assert!(t.root.as_ref().unwrap().right.is_none());
    t.validate();
}

#[test]
fn line_split_and_merge() {
    let mut t = PieceTree::new(b"abc\ndef".to_vec());
    t.insert(3, b"X");
    assert_eq!(content(&t), b"abcX\ndef");
    assert_eq!(t.line_count(), 2);
    assert_eq!(t.line_content(1), b"abcX");
    assert_eq!(t.line_content(2), b"def");
    t.validate();

    t.delete(3, 1);
    assert_eq!(content(&t), b"abc\ndef");
    t.validate();
}

#[test]
fn cross_node_deletion() {
    let mut t = PieceTree::new(b"aaa\nbbb\nccc".to_vec());
    t.insert(4, b"XYZ");
    assert_eq!(content(&t), b"aaa\nXYZbbb\nccc");
    t.delete(2, 7);
    assert_eq!(content(&t), b"aab\nccc");
    assert_eq!(t.line_content(1), b"aab");
    assert_eq!(t.line_content(2), b"ccc");
    assert_eq!(t.line_count(), 2);
    t.validate();
}

#[test]
fn offset_and_position_round_trip_on_single_piece() {
    let t = PieceTree::new(b"line one\nline two\nline three".to_vec());
    for k in 0..=t.len() {
        let (line, col) = t.position_at(k);
        assert_eq!(t.offset_at(line, col), k, "round trip failed at offset {k}");
    }
}

#[test]
fn value_in_range_reads_exact_slice() {
    let t = PieceTree::new(b"0123456789".to_vec());
    assert_eq!(t.value_in_range(2, 5), b"234");
    assert_eq!(t.value_in_range(0, 10), b"0123456789");
}

#[test]
fn line_count_matches_newline_count() {
    let t = PieceTree::new(b"a\nb\nc\nd".to_vec());
    assert_eq!(t.line_count(), 4);
    assert_eq!(t.line_content(4), b"d");
}

#[test]
fn delete_entire_document() {
    let mut t = PieceTree::new(b"hello world".to_vec());
    t.delete(0, t.len());
    assert_eq!(t.len(), 0);
    assert_eq!(content(&t), b"");
    t.validate();
}

#[test]
fn many_small_inserts_keep_rb_invariants() {
    let mut t = PieceTree::new(Vec::new());
    for (i, ch) in "the quick brown fox jumps over the lazy dog"
        .bytes()
        .enumerate()
    {
        t.insert(i, &[ch]);
    }
    assert_eq!(content(&t), b"the quick brown fox jumps over the lazy dog");
    t.validate();
}

#[test]
fn position_at_counts_a_left_siblings_open_run() {
    // "ab" + insert "X" at offset 1 -> "aXb", one logical line split
    // across three pieces ("a", "X", "b"); offset 2 sits at the start
    // of "b", which continues the still-open line opened by "a".
    let mut t = PieceTree::new(b"ab".to_vec());
    t.insert(1, b"X");
    assert_eq!(content(&t), b"aXb");
    assert_eq!(t.position_at(2), (1, 3));
    for k in 0..=t.len() {
        let (line, col) = t.position_at(k);
        assert_eq!(t.offset_at(line, col), k, "round trip failed at offset {k}");
    }
    t.validate();
}

#[test]
fn single_line_built_from_many_non_coalescing_pieces_round_trips() {
    // Each insert lands at offset 0, ahead of the previous piece, so
    // none of them coalesce: "abcde" ends up as five single-byte
    // pieces all on one still-open logical line.
    let mut t = PieceTree::new(Vec::new());
    for ch in [b'e', b'd', b'c', b'b', b'a'] {
        t.insert(0, &[ch]);
    }
    assert_eq!(content(&t), b"abcde");
    for k in 0..=t.len() {
        let (line, col) = t.position_at(k);
        assert_eq!(line, 1);
        assert_eq!(col, k + 1);
        assert_eq!(t.offset_at(line, col), k, "round trip failed at offset {k}");
    }
    t.validate();
}
