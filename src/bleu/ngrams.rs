// N-gram counting over token sequences.

use std::collections::HashMap;

/// Count every contiguous n-gram of `tokens`.
///
/// Keys borrow from the input. An order of zero, or a sequence shorter
/// than `n`, yields an empty map.
pub fn count_ngrams<S: AsRef<str>>(tokens: &[S], n: usize) -> HashMap<Vec<&str>, usize> {
    let mut counts = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }

    for window in tokens.windows(n) {
        let key: Vec<&str> = window.iter().map(|t| t.as_ref()).collect();
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}
