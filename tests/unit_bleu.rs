// Unit tests for BLEU scoring.
//
// Covers the sentence and corpus entry points end to end plus the pieces
// they are built from: clipped precision, reference length selection, and
// the brevity penalty.

use lexis::bleu::score::{
    brevity_penalty, closest_ref_length, modified_precision, score_corpus, Precision,
};
use lexis::bleu::{corpus_bleu, sentence_bleu, BleuConfig, Smoothing};

fn toks(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

// ============================================================
// sentence_bleu
// ============================================================

#[test]
fn identical_candidate_scores_exactly_one() {
    let reference = toks("this is a test");
    let score = sentence_bleu(&[reference.clone()], &reference, &BleuConfig::default());
    assert_eq!(score, 1.0);
}

#[test]
fn candidate_matching_one_of_several_references_scores_one() {
    let references = vec![toks("this is a test"), toks("this is test")];
    let candidate = toks("this is a test");
    assert_eq!(
        sentence_bleu(&references, &candidate, &BleuConfig::default()),
        1.0
    );
    assert_eq!(
        sentence_bleu(
            &references,
            &candidate,
            &BleuConfig::with_weights(&[1.0, 0.0, 0.0, 0.0])
        ),
        1.0
    );
}

#[test]
fn no_shared_unigram_scores_zero() {
    let references = vec![toks("the cat sat on the mat")];
    let candidate = toks("quantum flux capacitor");
    assert_eq!(
        sentence_bleu(&references, &candidate, &BleuConfig::default()),
        0.0
    );

    let smoothed = BleuConfig {
        smoothing: Smoothing::AddOne,
        ..BleuConfig::default()
    };
    assert_eq!(sentence_bleu(&references, &candidate, &smoothed), 0.0);
}

#[test]
fn missing_order_without_smoothing_scores_zero() {
    // Three tokens have no 4-grams at all
    let reference = toks("the cat sat");
    let score = sentence_bleu(&[reference.clone()], &reference, &BleuConfig::default());
    assert_eq!(score, 0.0);
}

#[test]
fn weights_shorter_than_candidate_orders() {
    let reference = toks("the cat sat");
    let config = BleuConfig::with_weights(&[1.0 / 3.0; 3]);
    let score = sentence_bleu(&[reference.clone()], &reference, &config);
    assert!((score - 1.0).abs() < 1e-12);
}

#[test]
fn epsilon_smoothing_rescues_missing_order() {
    let reference = toks("the cat sat");
    let config = BleuConfig {
        smoothing: Smoothing::Epsilon(0.1),
        ..BleuConfig::default()
    };
    let score = sentence_bleu(&[reference.clone()], &reference, &config);
    // Three perfect orders and 0.1 / 1 for the 4-grams
    assert!((score - 0.1f64.powf(0.25)).abs() < 1e-9);
}

#[test]
fn score_stays_in_unit_range() {
    let references = vec![
        toks("the quick brown fox jumps over the lazy dog"),
        toks("a fast brown fox leaps over a lazy dog"),
    ];
    let candidate = toks("the fast brown fox jumped over the lazy dog");
    let score = sentence_bleu(&references, &candidate, &BleuConfig::default());
    assert!(score > 0.0 && score < 1.0, "score = {score}");
}

// ============================================================
// building blocks
// ============================================================

#[test]
fn modified_precision_clips_repeated_words() {
    let references = vec![toks("the cat is on the mat"), toks("there is a cat on the mat")];
    let candidate = toks("the the the the the the the");
    let p = modified_precision(&references, &candidate, 1);
    assert_eq!(
        p,
        Precision {
            numerator: 2,
            denominator: 7
        }
    );
}

#[test]
fn modified_precision_denominator_never_zero() {
    let references = vec![toks("a b")];
    let candidate = toks("a b");
    let p = modified_precision(&references, &candidate, 3);
    assert_eq!(p.numerator, 0);
    assert_eq!(p.denominator, 1);
}

#[test]
fn closest_ref_length_prefers_shorter_on_tie() {
    let references = vec![toks("a b c d e"), toks("a b c")];
    assert_eq!(closest_ref_length(&references, 4), 3);
    assert_eq!(closest_ref_length(&references, 5), 5);
}

#[test]
fn brevity_penalty_cases() {
    assert_eq!(brevity_penalty(3, 5), 1.0);
    assert_eq!(brevity_penalty(4, 4), 1.0);
    assert_eq!(brevity_penalty(4, 0), 0.0);
    assert!((brevity_penalty(4, 2) - (-1.0f64).exp()).abs() < 1e-12);
}

// ============================================================
// corpus_bleu
// ============================================================

#[test]
fn corpus_of_one_matches_sentence() {
    let references = vec![toks("this is a test"), toks("this is test")];
    let candidate = toks("this is a test");
    let corpus = corpus_bleu(&[references.clone()], &[candidate.clone()], &BleuConfig::default())
        .unwrap();
    assert_eq!(
        corpus,
        sentence_bleu(&references, &candidate, &BleuConfig::default())
    );
}

#[test]
fn corpus_sums_counts_before_scoring() {
    let list_of_references = vec![
        vec![toks("the cat sat on the mat today")],
        vec![toks("a dog ran in the park")],
    ];
    let candidates = vec![toks("the cat sat on the mat today"), toks("a dog ran")];

    let detail = score_corpus(&list_of_references, &candidates, &BleuConfig::default()).unwrap();
    assert_eq!(detail.hyp_len, 10);
    assert_eq!(detail.ref_len, 13);
    assert_eq!(detail.precisions[0].numerator, 10);
    assert_eq!(detail.precisions[0].denominator, 10);
    assert!(detail.brevity_penalty < 1.0);
    assert!(detail.score > 0.0 && detail.score < 1.0);
}

#[test]
fn corpus_length_mismatch_is_an_error() {
    let list_of_references = vec![vec![toks("a b c")]];
    let candidates: Vec<Vec<String>> = vec![toks("a b c"), toks("d e f")];
    assert!(corpus_bleu(&list_of_references, &candidates, &BleuConfig::default()).is_err());
}
