// Similarity ratios on a 0-100 scale.
//
// Every public scorer returns an integer in [0, 100] and scores 0 when
// either side is empty (after processing, for the processed scorers).
// Internal helpers keep full f64 precision so blended scorers like
// `wratio` only round once at the end.

use std::collections::{BTreeSet, HashSet};

use super::distance::normalized_similarity;
use super::process::full_process;

/// Plain indel ratio, no preprocessing.
pub fn ratio(a: &str, b: &str) -> u8 {
    to_score(raw_ratio(a, b))
}

/// Best ratio of the shorter string against any same-length window of the longer.
///
/// Useful when one string is an abbreviation or excerpt of the other:
/// "yankees" vs "new york yankees" scores 100.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    to_score(raw_partial_ratio(a, b))
}

/// Ratio after processing and sorting the words of each side.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    to_score(raw_token_sort(a, b, false))
}

/// `partial_ratio` over sorted, processed words.
pub fn partial_token_sort_ratio(a: &str, b: &str) -> u8 {
    to_score(raw_token_sort(a, b, true))
}

/// Ratio that ignores word order and duplicated words.
///
/// The shared words are compared against each side's shared-plus-leftover
/// words, and the best of the three pairings wins.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    to_score(raw_token_set(a, b, false))
}

/// `token_set_ratio` with partial matching for each pairing.
pub fn partial_token_set_ratio(a: &str, b: &str) -> u8 {
    to_score(raw_token_set(a, b, true))
}

/// Ratio of the fully processed strings.
pub fn qratio(a: &str, b: &str) -> u8 {
    let pa = full_process(a, true);
    let pb = full_process(b, true);
    to_score(raw_ratio(&pa, &pb))
}

/// Weighted blend of the other scorers, picking the strategy by length ratio.
///
/// Similar lengths use the token scorers; strings whose lengths differ by
/// 1.5x or more switch to the partial scorers, discounted further when the
/// gap exceeds 8x. This is the default scorer for extraction.
pub fn wratio(a: &str, b: &str) -> u8 {
    const UNBASE_SCALE: f64 = 0.95;

    let pa = full_process(a, true);
    let pb = full_process(b, true);
    if pa.is_empty() || pb.is_empty() {
        return 0;
    }

    let base = raw_ratio(&pa, &pb);
    let (la, lb) = (pa.chars().count() as f64, pb.chars().count() as f64);
    let len_ratio = la.max(lb) / la.min(lb);

    let best = if len_ratio < 1.5 {
        let tsor = raw_token_sort(&pa, &pb, false) * UNBASE_SCALE;
        let tser = raw_token_set(&pa, &pb, false) * UNBASE_SCALE;
        base.max(tsor).max(tser)
    } else {
        let partial_scale = if len_ratio > 8.0 { 0.6 } else { 0.9 };
        let partial = raw_partial_ratio(&pa, &pb) * partial_scale;
        let ptsor = raw_token_sort(&pa, &pb, true) * UNBASE_SCALE * partial_scale;
        let ptser = raw_token_set(&pa, &pb, true) * UNBASE_SCALE * partial_scale;
        base.max(partial).max(ptsor).max(ptser)
    };

    to_score(best)
}

fn to_score(raw: f64) -> u8 {
    raw.clamp(0.0, 100.0).round_ties_even() as u8
}

fn raw_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    normalized_similarity(&a, &b) * 100.0
}

fn raw_partial_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len() == b.len() {
        return best_window(&a, &b).max(best_window(&b, &a));
    }
    if a.len() < b.len() {
        best_window(&a, &b)
    } else {
        best_window(&b, &a)
    }
}

/// Slide `needle` across `haystack`, including windows hanging off either end.
///
/// A window that starts inside the haystack on a character the needle lacks
/// never beats the window one step to its right, so it is skipped.
fn best_window(needle: &[char], haystack: &[char]) -> f64 {
    let m = needle.len() as isize;
    let n = haystack.len() as isize;
    let alphabet: HashSet<char> = needle.iter().copied().collect();
    let mut best: f64 = 0.0;

    for start in (1 - m)..n {
        let lo = start.max(0) as usize;
        let hi = (start + m).min(n) as usize;
        if lo >= hi || (start >= 0 && !alphabet.contains(&haystack[lo])) {
            continue;
        }
        let score = normalized_similarity(needle, &haystack[lo..hi]) * 100.0;
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

fn sorted_words(s: &str) -> String {
    let mut words: Vec<&str> = s.split_whitespace().collect();
    words.sort_unstable();
    words.join(" ")
}

fn raw_token_sort(a: &str, b: &str, partial: bool) -> f64 {
    let sa = sorted_words(&full_process(a, true));
    let sb = sorted_words(&full_process(b, true));
    if partial {
        raw_partial_ratio(&sa, &sb)
    } else {
        raw_ratio(&sa, &sb)
    }
}

fn raw_token_set(a: &str, b: &str, partial: bool) -> f64 {
    let pa = full_process(a, true);
    let pb = full_process(b, true);
    if pa.is_empty() || pb.is_empty() {
        return 0.0;
    }

    let words_a: BTreeSet<&str> = pa.split_whitespace().collect();
    let words_b: BTreeSet<&str> = pb.split_whitespace().collect();

    let sect = words_a.intersection(&words_b).copied().collect::<Vec<_>>().join(" ");
    let diff_ab = words_a.difference(&words_b).copied().collect::<Vec<_>>().join(" ");
    let diff_ba = words_b.difference(&words_a).copied().collect::<Vec<_>>().join(" ");

    let combined_ab = format!("{sect} {diff_ab}").trim().to_string();
    let combined_ba = format!("{sect} {diff_ba}").trim().to_string();

    let score = |x: &str, y: &str| {
        if partial {
            raw_partial_ratio(x, y)
        } else {
            raw_ratio(x, y)
        }
    };

    score(&sect, &combined_ab)
        .max(score(&sect, &combined_ba))
        .max(score(&combined_ab, &combined_ba))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_identical_and_empty() {
        assert_eq!(ratio("this is a test", "this is a test"), 100);
        assert_eq!(ratio("", "anything"), 0);
    }

    #[test]
    fn test_ratio_is_case_sensitive() {
        assert!(ratio("Hello", "hello") < 100);
        assert_eq!(qratio("Hello", "hello"), 100);
    }

    #[test]
    fn test_partial_ratio_substring() {
        assert_eq!(partial_ratio("yankees", "new york yankees"), 100);
    }

    #[test]
    fn test_token_set_ignores_duplicates() {
        assert_eq!(token_set_ratio("fuzzy was a bear", "fuzzy fuzzy was a bear"), 100);
        assert!(token_sort_ratio("fuzzy was a bear", "fuzzy fuzzy was a bear") < 100);
    }

    #[test]
    fn test_wratio_discounts_partial_matches() {
        // Length ratio of 2: partial path scaled by 0.9
        assert_eq!(wratio("cowboys", "Dallas Cowboys"), 90);
    }

    fn all_windows(needle: &[char], haystack: &[char]) -> f64 {
        let m = needle.len() as isize;
        let n = haystack.len() as isize;
        ((1 - m)..n)
            .filter_map(|start| {
                let lo = start.max(0) as usize;
                let hi = (start + m).min(n) as usize;
                (lo < hi).then(|| normalized_similarity(needle, &haystack[lo..hi]) * 100.0)
            })
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_skipped_windows_never_hold_the_best_score() {
        let pairs = [
            ("abc", "zzzzzzzzabd"),
            ("abcd", "cdxxxxxx"),
            ("yankees", "new york yankees"),
            ("kitten", "qqqsittingqqq"),
            ("mets", "zzzz"),
            ("ab", "xbxaxbx"),
        ];
        for (needle, haystack) in pairs {
            let needle: Vec<char> = needle.chars().collect();
            let haystack: Vec<char> = haystack.chars().collect();
            assert_eq!(
                best_window(&needle, &haystack),
                all_windows(&needle, &haystack),
                "{needle:?} in {haystack:?}"
            );
        }
    }

    #[test]
    fn test_rounding_is_half_to_even() {
        assert_eq!(to_score(84.5), 84);
        assert_eq!(to_score(85.5), 86);
    }
}
