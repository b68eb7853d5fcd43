//! Component C & part of D: the augmented red-black node and the
//! join-based rebalancing primitives built on top of it.
//!
//! Rather than a CLRS-style tree with parent pointers and a shared
//! `NIL` sentinel (spec.md §9's open question), nodes use
//! `Option<Box<Node>>` children and insert/delete are expressed with two
//! primitives, `split` and `join`, in the same spirit as the teacher
//! crate's AVL `split`/`merge`/`join_with_root` (`buffer/rope/mod.rs`).
//! `join` rebalances using black-height instead of AVL height, following
//! the standard join-based red-black algorithm (Blelloch, Ferizovic &
//! Sun, "Just Join for Parallel Ordered Sets"): `insert(pos, piece) =
//! join(left, piece, right)` where `(left, right) = split(t, pos)`, and
//! `delete` splits twice and joins the two surviving halves with `join2`.

use super::piece::Piece;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

pub type Tree = Option<Box<Node>>;

#[derive(Clone)]
pub struct Node {
    pub color: Color,
    pub left: Tree,
    pub right: Tree,
    pub piece: Piece,
    /// Total bytes in the subtree rooted here (left + this piece + right).
    pub size: usize,
    /// Total line feeds in the subtree rooted here.
    pub lf: usize,
}

impl Node {
    /// `size_left(n)`: bytes in n's left subtree.
    pub fn size_left(&self) -> usize {
        size_of(&self.left)
    }

    /// `lf_left(n)`: line feeds in n's left subtree.
    pub fn lf_left(&self) -> usize {
        lf_of(&self.left)
    }
}

pub fn size_of(t: &Tree) -> usize {
    t.as_ref().map_or(0, |n| n.size)
}

pub fn lf_of(t: &Tree) -> usize {
    t.as_ref().map_or(0, |n| n.lf)
}

pub fn color_of(t: &Tree) -> Color {
    t.as_ref().map_or(Color::Black, |n| n.color)
}

pub fn is_red(t: &Tree) -> bool {
    color_of(t) == Color::Red
}

/// Force a tree's root black. `join`/`join2`/`split` may hand back a red
/// root when used as an intermediate result (standard for the join
/// algorithm); whoever installs a tree as an actual `PieceTree::root`
/// must call this, since blackening a root can never introduce a
/// red-red violation or unbalance black heights (it only uniformly adds
/// one to the black height measured from that root).
pub fn blacken(mut t: Tree) -> Tree {
    if let Some(n) = t.as_mut() {
        n.color = Color::Black;
    }
    t
}

/// Number of black nodes from (not counting) this subtree's root down to
/// a leaf. Every RB invariant we maintain guarantees both children of a
/// node have equal black height, so reading either spine suffices.
pub fn black_height(t: &Tree) -> usize {
    match t {
        None => 0,
        Some(n) => black_height(&n.left) + if n.color == Color::Black { 1 } else { 0 },
    }
}

fn recompute(node: &mut Node) {
    node.size = size_of(&node.left) + node.piece.length + size_of(&node.right);
    node.lf = lf_of(&node.left) + node.piece.line_feed_count() + lf_of(&node.right);
}

pub fn make_node(color: Color, left: Tree, piece: Piece, right: Tree) -> Box<Node> {
    let mut node = Box::new(Node {
        color,
        left,
        right,
        piece,
        size: 0,
        lf: 0,
    });
    recompute(&mut node);
    node
}

/// Standard single left rotation: promotes `node.right` to the root of
/// this subtree, keeping the promoted node's own color.
fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let mut new_root = node.right.take().expect("rotate_left needs a right child");
    node.right = new_root.left.take();
    recompute(&mut node);
    new_root.left = Some(node);
    recompute(&mut new_root);
    new_root
}

/// Symmetric single right rotation.
fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let mut new_root = node.left.take().expect("rotate_right needs a left child");
    node.left = new_root.right.take();
    recompute(&mut node);
    new_root.right = Some(node);
    recompute(&mut new_root);
    new_root
}

// --- Join-based rebalancing -------------------------------------------------

/// Join `left`, `mid`, and `right` into one red-black tree, where every
/// byte in `left` precedes `mid` which precedes every byte in `right`.
/// The returned root is always black, so callers can use the result
/// directly as a new tree root.
pub fn join(left: Tree, mid: Piece, right: Tree) -> Box<Node> {
    let lh = black_height(&left);
    let rh = black_height(&right);
    if lh > rh {
        let mut t = join_right(left.expect("lh > rh implies left is non-empty"), mid, right);
        if t.color == Color::Red && is_red(&t.right) {
            t.color = Color::Black;
        }
        t
    } else if rh > lh {
        let mut t = join_left(left, mid, right.expect("rh > lh implies right is non-empty"));
        if t.color == Color::Red && is_red(&t.left) {
            t.color = Color::Black;
        }
        t
    } else if is_red(&left) || is_red(&right) {
        make_node(Color::Black, left, mid, right)
    } else {
        make_node(Color::Red, left, mid, right)
    }
}

/// Two-way join (no explicit middle piece): lifts the rightmost piece of
/// `left` up to serve as the join key, exactly as the teacher's
/// `merge`/`delete_max` pair does for its AVL tree.
pub fn join2(left: Tree, right: Tree) -> Tree {
    match (left, right) {
        (None, r) => r,
        (l, None) => l,
        (Some(l), Some(r)) => {
            let (rest, max_piece) = delete_max(l);
            Some(join(rest, max_piece, Some(r)))
        }
    }
}

/// Public wrapper over [`delete_max`] for callers that only have a
/// `Tree` (not a guaranteed-non-empty `Box<Node>`).
pub fn extract_max(tree: Tree) -> Option<(Tree, Piece)> {
    tree.map(delete_max)
}

/// Remove and return the inorder-last piece of a non-empty tree, along
/// with the tree that remains.
fn delete_max(node: Box<Node>) -> (Tree, Piece) {
    let Node { left, right, piece, .. } = *node;
    match right {
        None => (left, piece),
        Some(right) => {
            let (new_right, max_piece) = delete_max(right);
            (Some(join(left, piece, new_right)), max_piece)
        }
    }
}

/// `black_height(left) > black_height(right)`: walk down `left`'s right
/// spine until reaching a black node at the same black height as
/// `right`, splice a new red node there, and repair any red-red
/// violation introduced on the way back up with at most one rotation
/// per level.
fn join_right(left: Box<Node>, mid: Piece, right: Tree) -> Box<Node> {
    if left.color == Color::Black && black_height(&left.right) == black_height(&right) {
        return make_node(Color::Red, Some(left), mid, right);
    }
    let Node {
        color,
        left: ll,
        right: lr,
        piece,
        ..
    } = *left;
    let new_right = join_right(
        lr.expect("join_right: black height mismatch implies a right child exists"),
        mid,
        right,
    );
    if color == Color::Black && new_right.color == Color::Red && is_red(&new_right.right) {
        let mut nr = new_right;
        if let Some(rr) = nr.right.as_mut() {
            rr.color = Color::Black;
        }
        let top = make_node(color, ll, piece, Some(nr));
        rotate_left(top)
    } else {
        make_node(color, ll, piece, Some(new_right))
    }
}

/// Symmetric to [`join_right`]: used when `right`'s black height exceeds
/// `left`'s, descending down `right`'s left spine.
fn join_left(left: Tree, mid: Piece, right: Box<Node>) -> Box<Node> {
    if right.color == Color::Black && black_height(&right.left) == black_height(&left) {
        return make_node(Color::Red, left, mid, Some(right));
    }
    let Node {
        color,
        left: rl,
        right: rr,
        piece,
        ..
    } = *right;
    let new_left = join_left(
        left,
        mid,
        rl.expect("join_left: black height mismatch implies a left child exists"),
    );
    if color == Color::Black && new_left.color == Color::Red && is_red(&new_left.left) {
        let mut nl = new_left;
        if let Some(ll) = nl.left.as_mut() {
            ll.color = Color::Black;
        }
        let top = make_node(color, Some(nl), piece, rr);
        rotate_right(top)
    } else {
        make_node(color, Some(new_left), piece, rr)
    }
}

/// Split a tree at byte offset `pos` into everything before and
/// everything from `pos` onward, splitting a straddling piece in place
/// via [`Piece::split_at`] when `pos` falls strictly inside it.
pub fn split(tree: Tree, pos: usize) -> (Tree, Tree) {
    let node = match tree {
        None => return (None, None),
        Some(n) => n,
    };
    let Node {
        left, right, piece, ..
    } = *node;
    let left_size = size_of(&left);

    if pos < left_size {
        let (ll, lr) = split(left, pos);
        (ll, Some(join(lr, piece, right)))
    } else if pos > left_size + piece.length {
        let (rl, rr) = split(right, pos - left_size - piece.length);
        (Some(join(left, piece, rl)), rr)
    } else if pos == left_size {
        (left, Some(join(None, piece, right)))
    } else if pos == left_size + piece.length {
        (Some(join(left, piece, None)), right)
    } else {
        let (left_piece, right_piece) = piece.split_at(pos - left_size);
        (
            Some(join(left, left_piece, None)),
            Some(join(None, right_piece, right)),
        )
    }
}

#[cfg(any(test, debug_assertions))]
pub fn validate(tree: &Tree) {
    if let Some(n) = tree {
        assert_eq!(n.color, Color::Black, "root must be black");
    }
    let mut expected_black_depth = None;
    check_node(tree, 0, &mut expected_black_depth);
}

#[cfg(any(test, debug_assertions))]
fn check_node(t: &Tree, black_depth: usize, expected: &mut Option<usize>) {
    match t {
        None => match expected {
            None => *expected = Some(black_depth),
            Some(e) => assert_eq!(*e, black_depth, "unequal black heights across leaves"),
        },
        Some(n) => {
            if n.color == Color::Red {
                assert!(!is_red(&n.left), "red node with red left child");
                assert!(!is_red(&n.right), "red node with red right child");
            }
            let depth = black_depth + if n.color == Color::Black { 1 } else { 0 };
            check_node(&n.left, depth, expected);
            check_node(&n.right, depth, expected);
            assert_eq!(
                n.size,
                size_of(&n.left) + n.piece.length + size_of(&n.right),
                "cached size out of sync"
            );
            assert_eq!(
                n.lf,
                lf_of(&n.left) + n.piece.line_feed_count() + lf_of(&n.right),
                "cached line-feed count out of sync"
            );
        }
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
