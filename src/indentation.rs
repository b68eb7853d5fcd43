//! Component F: guess `(insertSpaces, tabSize)` from existing document
//! content, per §4.F.

const MAX_LINES_TO_SCAN: usize = 10_000;
const CANDIDATE_TAB_SIZES: [usize; 4] = [2, 4, 6, 8];

/// A narrow reader interface so the guesser doesn't need the whole
/// buffer contract, just line count and per-line content.
pub trait LineSource {
    fn line_count(&self) -> usize;
    /// 1-based line content, EOL excluded.
    fn line_content(&self, line: usize) -> Vec<u8>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentationGuess {
    pub insert_spaces: bool,
    pub tab_size: usize,
}

pub fn guess_indentation(
    source: &dyn LineSource,
    default_tab_size: usize,
    default_insert_spaces: bool,
) -> IndentationGuess {
    let line_count = source.line_count().min(MAX_LINES_TO_SCAN);
    let mut buckets = [0usize; 9];
    let mut lines_with_spaces = 0usize;
    let mut lines_with_tabs = 0usize;
    let mut prev_indent: Option<Vec<u8>> = None;

    for ln in 1..=line_count {
        let content = source.line_content(ln);
        let indent = leading_whitespace(&content);
        if indent.len() == content.len() {
            // blank (or empty) line: not a data point, and doesn't reset
            // the "previous non-blank line" comparison baseline.
            continue;
        }

        let (spaces, tabs) = count_spaces_tabs(&indent);
        if spaces > 0 && tabs == 0 {
            lines_with_spaces += 1;
        } else if tabs > 0 && spaces == 0 {
            lines_with_tabs += 1;
        }

        if let Some(prev) = &prev_indent {
            let diff = spaces_diff(prev, &indent);
            if diff > 0 {
                buckets[diff.min(8)] += 1;
            }
        }
        prev_indent = Some(indent);
    }

    let insert_spaces = if lines_with_spaces != lines_with_tabs {
        lines_with_spaces > lines_with_tabs
    } else {
        default_insert_spaces
    };

    let threshold = if insert_spaces {
        0.0
    } else {
        0.1 * line_count as f64
    };

    let mut tab_size = default_tab_size;
    let mut best_score = threshold;
    for &size in &CANDIDATE_TAB_SIZES {
        let score = buckets[size] as f64;
        if score > best_score {
            best_score = score;
            tab_size = size;
        }
    }

    IndentationGuess {
        insert_spaces,
        tab_size,
    }
}

fn leading_whitespace(line: &[u8]) -> Vec<u8> {
    let end = line
        .iter()
        .position(|&b| b != b' ' && b != b'\t')
        .unwrap_or(line.len());
    line[..end].to_vec()
}

fn count_spaces_tabs(indent: &[u8]) -> (usize, usize) {
    let spaces = indent.iter().filter(|&&b| b == b' ').count();
    let tabs = indent.iter().filter(|&&b| b == b'\t').count();
    (spaces, tabs)
}

/// Compare two lines' leading whitespace after skipping their common
/// prefix. Returns 0 if either remaining suffix mixes spaces and tabs
/// (ambiguous), since no single tab-size interpretation is consistent.
fn spaces_diff(a: &[u8], b: &[u8]) -> usize {
    let common = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
    let (sa, ta) = count_spaces_tabs(&a[common..]);
    let (sb, tb) = count_spaces_tabs(&b[common..]);
    if (sa > 0 && ta > 0) || (sb > 0 && tb > 0) {
        return 0;
    }
    let t = ta.abs_diff(tb);
    let s = sa.abs_diff(sb);
    if t == 0 {
        s
    } else if s % t == 0 {
        s / t
    } else {
        0
    }
}

#[cfg(test)]
#[path = "indentation_tests.rs"]
mod tests;
