// Fuzzy string matching — edit-based similarity ratios and ranked extraction.

pub mod distance;
pub mod process;
pub mod ratio;

pub use process::{dedupe, extract, extract_bests, extract_one, full_process, Match};
pub use ratio::{
    partial_ratio, partial_token_set_ratio, partial_token_sort_ratio, qratio, ratio,
    token_set_ratio, token_sort_ratio, wratio,
};
