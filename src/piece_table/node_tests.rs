use super::super::piece::{BufferTag, Piece};
use super::*;

fn leaf(tag: BufferTag, offset: usize, bytes: &[u8]) -> Piece {
    Piece::new(tag, offset, bytes)
}

fn insert_all(bytes_list: &[&[u8]]) -> Tree {
    let mut tree: Tree = None;
    let mut offset = 0;
    for bytes in bytes_list {
        let piece = leaf(BufferTag::Original, offset, bytes);
        offset += bytes.len();
        let (l, r) = split(tree, size_of(&tree));
        tree = Some(join(l, piece, r));
    }
    tree
}

fn collect(tree: &Tree, out: &mut Vec<u8>, text: &[u8]) {
    if let Some(n) = tree {
        collect(&n.left, out, text);
        out.extend_from_slice(&text[n.piece.offset..n.piece.offset + n.piece.length]);
        collect(&n.right, out, text);
    }
}

#[test]
fn join_single_piece_is_black_root() {
    let piece = leaf(BufferTag::Original, 0, b"hello");
    let root = join(None, piece, None);
    assert_eq!(root.color, Color::Black);
    assert_eq!(root.size, 5);
    validate(&Some(root));
}

#[test]
fn repeated_append_keeps_rb_invariants() {
    let text = b"abcdefghijklmnopqrstuvwxyz";
    let mut tree: Tree = None;
    for (i, &b) in text.iter().enumerate() {
        let piece = leaf(BufferTag::Original, i, std::slice::from_ref(&b));
        let (l, r) = split(tree, size_of(&tree));
        tree = Some(join(l, piece, r));
        validate(&tree);
    }
    assert_eq!(size_of(&tree), text.len());
    let mut out = Vec::new();
    collect(&tree, &mut out, text);
    assert_eq!(out, text);
}

#[test]
fn split_at_piece_boundary_is_clean() {
    let tree = insert_all(&[b"hello", b"world"]);
    let (l, r) = split(tree, 5);
    assert_eq!(size_of(&l), 5);
    assert_eq!(size_of(&r), 5);
    validate(&l);
    validate(&r);
}

#[test]
fn split_inside_piece_divides_it() {
    let piece = leaf(BufferTag::Original, 0, b"helloworld");
    let tree = Some(join(None, piece, None));
    let (l, r) = split(tree, 3);
    assert_eq!(size_of(&l), 3);
    assert_eq!(size_of(&r), 7);
    let full = b"helloworld";
    let mut out = Vec::new();
    collect(&l, &mut out, full);
    assert_eq!(out, b"hel");
    out.clear();
    collect(&r, &mut out, full);
    assert_eq!(out, b"loworld");
}

#[test]
fn join2_concatenates_in_order() {
    let left = insert_all(&[b"ab", b"cd"]);
    let right = insert_all(&[b"ef", b"gh"]);
    let joined = join2(left, right);
    validate(&joined);
    assert_eq!(size_of(&joined), 8);
}

#[test]
fn split_then_join2_round_trips() {
    let original = b"the quick brown fox";
    let tree = Some(join(None, leaf(BufferTag::Original, 0, original), None));
    let (l, r) = split(tree, 9);
    let rejoined = join2(l, r);
    validate(&rejoined);
    let mut out = Vec::new();
    collect(&rejoined, &mut out, original);
    assert_eq!(out, original);
}

#[test]
fn black_height_matches_across_subtrees_after_many_inserts() {
    let mut tree: Tree = None;
    for i in 0..64usize {
        let byte = [b'a' + (i % 26) as u8];
        let piece = leaf(BufferTag::Original, i, &byte);
        let pos = size_of(&tree) / 2;
        let (l, r) = split(tree, pos);
        tree = Some(join(l, piece, r));
    }
    validate(&tree);
}
