// Query processing — normalize strings and rank choices against a query.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ratio::{token_set_ratio, wratio};

/// A scoring function on two strings, returning 0-100.
pub type Scorer = fn(&str, &str) -> u8;

/// One ranked choice from an extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// The original (unprocessed) choice text
    pub choice: String,
    pub score: u8,
    /// Position of the choice in the input list
    pub index: usize,
}

/// Normalize a string for comparison.
///
/// Every character that is not alphanumeric or `_` becomes a space, the
/// result is lowercased and trimmed. With `force_ascii`, non-ASCII
/// characters are dropped first.
pub fn full_process(s: &str, force_ascii: bool) -> String {
    let mapped: String = s
        .chars()
        .filter(|c| !force_ascii || c.is_ascii())
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();
    mapped.to_lowercase().trim().to_string()
}

/// Rank `choices` against `query` with the default scorer and return the top `limit`.
///
/// Ties keep input order.
pub fn extract<S: AsRef<str>>(query: &str, choices: &[S], limit: usize) -> Vec<Match> {
    extract_bests(query, choices, wratio, 0, Some(limit))
}

/// Rank `choices` with a custom scorer, keeping scores at or above `cutoff`.
///
/// `limit` of `None` returns every surviving choice.
pub fn extract_bests<S: AsRef<str>>(
    query: &str,
    choices: &[S],
    scorer: Scorer,
    cutoff: u8,
    limit: Option<usize>,
) -> Vec<Match> {
    let processed_query = full_process(query, true);

    let mut matches: Vec<Match> = choices
        .iter()
        .enumerate()
        .filter_map(|(index, choice)| {
            let choice = choice.as_ref();
            let score = scorer(&processed_query, &full_process(choice, true));
            (score >= cutoff).then(|| Match {
                choice: choice.to_string(),
                score,
                index,
            })
        })
        .collect();

    // Stable sort: equal scores stay in input order
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    if let Some(limit) = limit {
        matches.truncate(limit);
    }

    debug!(
        query,
        choices = choices.len(),
        returned = matches.len(),
        "Ranked fuzzy choices"
    );
    matches
}

/// The single best choice for `query`, or `None` when there are no choices.
pub fn extract_one<S: AsRef<str>>(query: &str, choices: &[S]) -> Option<Match> {
    extract_bests(query, choices, wratio, 0, Some(1))
        .into_iter()
        .next()
}

/// Collapse fuzzy duplicates in a list of strings.
///
/// Each item is matched against the whole list with `token_set_ratio`; the
/// longest match scoring at least `threshold` (alphabetically last on equal
/// length) stands in for the group. Representatives keep first-seen order.
/// When nothing collapses, the input comes back unchanged.
pub fn dedupe<S: AsRef<str>>(items: &[S], threshold: u8) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut deduped = Vec::new();

    for item in items {
        let matches = extract_bests(item.as_ref(), items, token_set_ratio, threshold, None);
        let representative = matches
            .iter()
            .map(|m| m.choice.as_str())
            .max_by(|a, b| a.chars().count().cmp(&b.chars().count()).then(a.cmp(b)))
            .unwrap_or(item.as_ref())
            .to_string();

        if seen.insert(representative.clone()) {
            deduped.push(representative);
        }
    }

    if deduped.len() == items.len() {
        return items.iter().map(|s| s.as_ref().to_string()).collect();
    }
    deduped
}
