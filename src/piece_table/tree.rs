//! Component D: the piece-table tree's public contract — insert,
//! delete, offset/line navigation, and range reads — built on top of
//! the join/split primitives in `node.rs`.
//!
//! `insert` and `delete` are expressed purely in terms of `split`/`join`
//! rather than the pointer-surgery `insertLeft`/`insertRight`/`rbDelete`
//! described for a parent-pointer tree: splitting at the edit's
//! boundaries and rejoining subsumes the left-edge / interior-split /
//! right-edge insert cases and the five delete sub-cases uniformly,
//! since `split` already divides a straddling piece via
//! `Piece::split_at`. This mirrors the teacher's own `split`/`merge`
//! pair in `buffer/rope/mod.rs`, generalized from AVL- to
//! black-height-based rebalancing.

use std::fmt;

use super::node::{self, blacken, join, join2, lf_of, size_of, split, Tree};
use super::piece::{BufferTag, Piece};

/// A piece-table-backed byte buffer: an immutable `original` buffer, an
/// append-only `changes` buffer, and a red-black tree of pieces
/// referencing slices of either.
pub struct PieceTree {
    original: Vec<u8>,
    changes: Vec<u8>,
    root: Tree,
}

impl PieceTree {
    /// Build a tree from the initial immutable document bytes.
    pub fn new(original: Vec<u8>) -> Self {
        let root = if original.is_empty() {
            None
        } else {
            let piece = Piece::new(BufferTag::Original, 0, &original);
            blacken(Some(join(None, piece, None)))
        };
        PieceTree {
            original,
            changes: Vec::new(),
            root,
        }
    }

    pub fn len(&self) -> usize {
        size_of(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn line_count(&self) -> usize {
        1 + lf_of(&self.root)
    }

    /// Append `bytes` to the change buffer and link them into the tree
    /// at `offset`, per §4.D.1.
    pub fn insert(&mut self, offset: usize, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let tail_start = self.changes.len();
        self.changes.extend_from_slice(bytes);

        let root = self.root.take();
        if root.is_none() {
            let piece = Piece::new(BufferTag::Changes, tail_start, bytes);
            self.root = blacken(Some(join(None, piece, None)));
            return;
        }

        let (left, right) = split(root, offset);

        if let Some((rest, mut last)) = node::extract_max(left) {
            if last.tag == BufferTag::Changes && last.offset + last.length == tail_start {
                last.coalesce_append(bytes);
                self.root = blacken(Some(join(rest, last, right)));
                return;
            }
            let restored_left = Some(join(rest, last, None));
            let piece = Piece::new(BufferTag::Changes, tail_start, bytes);
            self.root = blacken(Some(join(restored_left, piece, right)));
            return;
        }

        let piece = Piece::new(BufferTag::Changes, tail_start, bytes);
        self.root = blacken(Some(join(None, piece, right)));
    }

    /// Remove `count` bytes starting at `offset`, per §4.D.2. Splitting
    /// twice and rejoining the surviving halves covers all five
    /// sub-cases (whole-node, prefix, suffix, interior-split,
    /// multi-node span) without case analysis: `split` elides
    /// zero-length fragments automatically since it never constructs a
    /// piece for an empty remainder.
    pub fn delete(&mut self, offset: usize, count: usize) {
        if count == 0 {
            return;
        }
        let root = self.root.take();
        let (left, rest) = split(root, offset);
        let (_removed, right) = split(rest, count);
        self.root = blacken(join2(left, right));
    }

    /// `getOffsetAt`: convert a 1-based (line, column) to a 0-based byte
    /// offset. When the target line is still open at this piece (no
    /// newline reached yet in the left subtree), a column that falls
    /// within the left subtree's own open run is resolved there via
    /// [`Self::open_tail`] rather than assumed to start fresh at this
    /// piece. When `column` instead reaches past this piece's own
    /// contribution to the line, continue into the inorder successor,
    /// consuming `piece.length - prevAccumulated` per hop, per §4.D.3.
    pub fn offset_at(&self, line: usize, column: usize) -> usize {
        let line0 = line.saturating_sub(1);
        let col0 = column.saturating_sub(1);
        Self::offset_at_rec(&self.root, line0, col0, 0)
    }

    fn offset_at_rec(tree: &Tree, line0: usize, mut remaining_col: usize, offset_base: usize) -> usize {
        let node = match tree {
            None => return offset_base,
            Some(n) => n,
        };
        let lf_left = lf_of(&node.left);
        if line0 < lf_left {
            return Self::offset_at_rec(&node.left, line0, remaining_col, offset_base);
        }
        let offset_here = offset_base + size_of(&node.left);
        let rel_line = line0 - lf_left;
        let piece_lf = node.piece.line_feed_count();

        if rel_line > piece_lf {
            // The target line starts somewhere past every line this
            // piece itself carries; skip it whole and keep chasing right.
            return Self::offset_at_rec(
                &node.right,
                rel_line - piece_lf,
                remaining_col,
                offset_here + node.piece.length,
            );
        }

        if rel_line == 0 {
            let tail = Self::open_tail(&node.left);
            if remaining_col <= tail {
                return offset_here - tail + remaining_col;
            }
            remaining_col -= tail;
        }

        let line_len = node.piece.line_starts.values()[rel_line] as usize;
        let line_start = node.piece.line_starts.accumulated_value(rel_line) as usize;

        if rel_line < piece_lf || remaining_col <= line_len || node.right.is_none() {
            let clamped = remaining_col.min(line_len);
            return offset_here + line_start + clamped;
        }

        Self::offset_at_rec(
            &node.right,
            0,
            remaining_col - line_len,
            offset_here + node.piece.length,
        )
    }

    /// `getPositionAt`: convert a 0-based byte offset to a 1-based
    /// (line, column). When the located piece's first line segment
    /// continues a still-open line opened by earlier pieces, the
    /// column adds the accumulated open-run length contributed by
    /// everything before this piece (via [`Self::open_tail_before`]),
    /// so this holds exactly even when a logical line is fragmented
    /// across several piece boundaries.
    pub fn position_at(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len());
        Self::position_at_rec(&self.root, offset, 0, 0, &self.root)
    }

    fn position_at_rec(
        tree: &Tree,
        offset: usize,
        lines_before: usize,
        offset_base: usize,
        root: &Tree,
    ) -> (usize, usize) {
        let node = match tree {
            None => return (lines_before + 1, 1),
            Some(n) => n,
        };
        let left_size = size_of(&node.left);
        if offset < left_size {
            return Self::position_at_rec(&node.left, offset, lines_before, offset_base, root);
        }
        let lines_before_piece = lines_before + lf_of(&node.left);
        let local = offset - left_size;
        if local < node.piece.length || node.right.is_none() {
            let (line_idx, col) = node
                .piece
                .line_starts
                .index_of(local.min(node.piece.length) as u32);
            let column = if line_idx == 0 {
                let piece_start = offset_base + left_size;
                col as usize + Self::open_tail_before(root, piece_start) + 1
            } else {
                col as usize + 1
            };
            return (lines_before_piece + line_idx + 1, column);
        }
        let lines_after_piece = lines_before_piece + node.piece.line_feed_count();
        Self::position_at_rec(
            &node.right,
            local - node.piece.length,
            lines_after_piece,
            offset_base + left_size + node.piece.length,
            root,
        )
    }

    /// Bytes since the most recent newline within `tree`, measured
    /// backward from its own rightmost edge; equals the subtree's full
    /// size when it contains no newline at all. Self-contained to
    /// `tree`'s own subtree, never looks beyond it — the caller (this
    /// piece's parent) is responsible for continuing the chase further
    /// left when this comes back equal to the subtree's whole size.
    fn open_tail(tree: &Tree) -> usize {
        let node = match tree {
            None => return 0,
            Some(n) => n,
        };
        if lf_of(&node.right) > 0 {
            return Self::open_tail(&node.right);
        }
        let piece_lf = node.piece.line_feed_count();
        if piece_lf > 0 {
            let last = *node.piece.line_starts.values().last().unwrap() as usize;
            return last + size_of(&node.right);
        }
        Self::open_tail(&node.left) + node.piece.length + size_of(&node.right)
    }

    /// Bytes immediately preceding the piece-boundary offset `boundary`
    /// that continue a still-open logical line (no intervening `\n`
    /// between them and `boundary`). `boundary` is always exactly the
    /// start offset of some piece, so at every node it falls at-or-before
    /// the left subtree's span or at-or-after this piece's own end —
    /// never strictly inside this piece.
    fn open_tail_before(tree: &Tree, boundary: usize) -> usize {
        let node = match tree {
            None => return 0,
            Some(n) => n,
        };
        let left_size = size_of(&node.left);
        if boundary <= left_size {
            return Self::open_tail_before(&node.left, boundary);
        }
        let piece_end = left_size + node.piece.length;
        let right_boundary = boundary - piece_end;
        let beyond = Self::open_tail_before(&node.right, right_boundary);
        if beyond != right_boundary {
            // A newline already terminated the run within the right
            // subtree; this piece and everything left of it is moot.
            return beyond;
        }
        let trailing = *node
            .piece
            .line_starts
            .values()
            .last()
            .expect("line_starts is never empty") as usize;
        let total = beyond + trailing;
        if node.piece.line_starts.len() == 1 {
            // This piece itself carries no newline, so the open run
            // continues leftward through it too.
            total + Self::open_tail_before(&node.left, left_size)
        } else {
            total
        }
    }

    /// `getValueInRange`: concatenate the bytes in `[start, end)`.
    pub fn value_in_range(&self, start: usize, end: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(end.saturating_sub(start));
        self.collect_range(&self.root, start, end, 0, &mut out);
        out
    }

    fn collect_range(&self, tree: &Tree, start: usize, end: usize, offset_base: usize, out: &mut Vec<u8>) {
        let node = match tree {
            None => return,
            Some(n) => n,
        };
        let left_size = size_of(&node.left);
        let node_start = offset_base + left_size;
        let node_end = node_start + node.piece.length;

        if start < node_start {
            self.collect_range(&node.left, start, end, offset_base, out);
        }
        if end > node_start && start < node_end {
            let lo = start.max(node_start) - node_start;
            let hi = end.min(node_end) - node_start;
            out.extend_from_slice(self.piece_bytes(&node.piece, lo, hi));
        }
        if end > node_end {
            self.collect_range(&node.right, start, end, node_end, out);
        }
    }

    fn piece_bytes(&self, piece: &Piece, lo: usize, hi: usize) -> &[u8] {
        let buf = match piece.tag {
            BufferTag::Original => &self.original,
            BufferTag::Changes => &self.changes,
        };
        &buf[piece.offset + lo..piece.offset + hi]
    }

    /// `getLineContent`: the bytes of `line` with any trailing `\r\n` or
    /// `\n` stripped. Built from `offset_at`, which already performs the
    /// successor chase needed when the line spans multiple pieces, so
    /// this does not need its own per-piece walk.
    pub fn line_content(&self, line: usize) -> Vec<u8> {
        let (start, end) = self.line_span(line);
        let mut content = self.value_in_range(start, end);
        strip_trailing_eol(&mut content);
        content
    }

    /// `getLineLength`: byte length of `line`'s content, EOL excluded.
    pub fn line_length(&self, line: usize) -> usize {
        self.line_content(line).len()
    }

    fn line_span(&self, line: usize) -> (usize, usize) {
        let start = self.offset_at(line, 1);
        let end = if line >= self.line_count() {
            self.len()
        } else {
            self.offset_at(line + 1, 1)
        };
        (start, end)
    }

    /// Every line's content, 1..=`line_count()`, in order.
    pub fn lines(&self) -> impl Iterator<Item = Vec<u8>> + '_ {
        (1..=self.line_count()).map(move |ln| self.line_content(ln))
    }

    #[cfg(any(test, debug_assertions))]
    pub fn validate(&self) {
        node::validate(&self.root);
        assert_eq!(
            size_of(&self.root),
            self.value_in_range(0, self.len()).len(),
            "tree size out of sync with actual content"
        );
    }
}

fn strip_trailing_eol(bytes: &mut Vec<u8>) {
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
    }
}

impl fmt::Display for PieceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.value_in_range(0, self.len());
        write!(f, "{}", String::from_utf8_lossy(&bytes))
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
