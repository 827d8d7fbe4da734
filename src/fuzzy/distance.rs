// Indel distance — edit distance with insertions and deletions only.
//
// An indel distance of d between strings of lengths m and n means their
// longest common subsequence has (m + n - d) / 2 characters, so the
// distance falls out of an LCS table.

/// Length of the longest common subsequence of two character slices.
pub fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Single rolling row over the shorter side
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut row = vec![0usize; inner.len() + 1];

    for &oc in outer {
        let mut diag = 0;
        for (j, &ic) in inner.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if oc == ic {
                diag + 1
            } else {
                above.max(row[j])
            };
            diag = above;
        }
    }
    row[inner.len()]
}

/// Minimum number of single-character insertions and deletions turning `a` into `b`.
pub fn indel_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    a.len() + b.len() - 2 * lcs_len(&a, &b)
}

/// Indel similarity scaled to 0.0-1.0. Two empty inputs are identical.
pub fn normalized_similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let dist = total - 2 * lcs_len(a, b);
    1.0 - dist as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_lcs_basic() {
        assert_eq!(lcs_len(&chars("kitten"), &chars("sitting")), 4);
        assert_eq!(lcs_len(&chars("abc"), &chars("")), 0);
        assert_eq!(lcs_len(&chars("same"), &chars("same")), 4);
    }

    #[test]
    fn test_indel_distance() {
        // kitten -> sitting: drop k,e; add s,i,g
        assert_eq!(indel_distance("kitten", "sitting"), 5);
        assert_eq!(indel_distance("", "abc"), 3);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(normalized_similarity(&chars("abc"), &chars("abc")), 1.0);
        assert_eq!(normalized_similarity(&chars("abc"), &chars("xyz")), 0.0);
    }
}
