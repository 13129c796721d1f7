//! String similarity metrics used to rank correction candidates.
//!
//! Every metric compares case-insensitively and returns a ratio in `0.0..=1.0`
//! where `1.0` means the strings are equal ignoring case.

/// A normalized, case-insensitive string similarity.
pub trait SimilarityMetric {
    /// Similarity of `a` and `b` in `0.0..=1.0`.
    fn ratio(&self, a: &str, b: &str) -> f64;
}

/// Matching-blocks ratio: twice the number of characters in matching blocks
/// over the total length of both strings.
///
/// Blocks are found Ratcliff/Obershelp style: take the longest common
/// substring (leftmost in `a`, then leftmost in `b`), then recurse on the
/// pieces to its left and right.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRatio;

impl SimilarityMetric for SequenceRatio {
    fn ratio(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.to_lowercase().chars().collect();
        let b: Vec<char> = b.to_lowercase().chars().collect();
        let total = a.len() + b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * matched_chars(&a, &b) as f64 / total as f64
    }
}

fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        matched += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }

    matched
}

/// Longest common substring of `a[a_lo..a_hi]` and `b[b_lo..b_hi]` as
/// `(start_in_a, start_in_b, len)`.
fn longest_match(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (a_lo, b_lo, 0);
    // run[j + 1] is the length of the match ending at a[i - 1], b[j].
    let mut run = vec![0usize; b.len() + 1];
    let mut next = vec![0usize; b.len() + 1];

    for i in a_lo..a_hi {
        for j in b_lo..b_hi {
            next[j + 1] = if a[i] == b[j] { run[j] + 1 } else { 0 };
            let size = next[j + 1];
            if size > best_size {
                best_i = i + 1 - size;
                best_j = j + 1 - size;
                best_size = size;
            }
        }
        std::mem::swap(&mut run, &mut next);
    }

    (best_i, best_j, best_size)
}

/// Levenshtein distance normalized by the longer string:
/// `1 - distance / max(len_a, len_b)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinRatio;

impl SimilarityMetric for LevenshteinRatio {
    fn ratio(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.to_lowercase().chars().collect();
        let b: Vec<char> = b.to_lowercase().chars().collect();
        let longest = a.len().max(b.len());
        if longest == 0 {
            return 1.0;
        }
        1.0 - levenshtein(&a, &b) as f64 / longest as f64
    }
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
