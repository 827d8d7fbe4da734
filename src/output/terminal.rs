// Colored terminal output for scores, matches, sweeps, and concepts.
//
// main.rs gathers results from the library modules and hands them here;
// nothing in this file computes anything beyond layout.

use colored::Colorize;

use crate::fuzzy::Match;
use crate::ontology::download::CacheStatus;
use crate::ontology::{Ontology, Term};
use crate::tagging::TaggedDoc;
use crate::topics::sweep::SweepPoint;

/// Display labelled BLEU scores, one per line.
pub fn display_bleu_scores(rows: &[(String, f64)]) {
    println!("\n{}", "=== BLEU ===".bold());
    println!();

    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, score) in rows {
        println!("  {:<width$}  {}", label, colorize_unit(*score));
    }
    println!();
}

/// Display labelled similarity ratios, one per line.
pub fn display_ratios(rows: &[(String, u8)]) {
    println!("\n{}", "=== Fuzzy ratios ===".bold());
    println!();

    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, score) in rows {
        println!("  {:<width$}  {}", label, colorize_percent(*score));
    }
    println!();
}

/// Display ranked extraction results.
pub fn display_matches(query: &str, matches: &[Match]) {
    println!(
        "\n{}",
        format!("=== Best matches for \"{query}\" ===").bold()
    );
    if matches.is_empty() {
        println!("  {}", "No choices to rank.".dimmed());
        return;
    }
    println!();

    for (rank, m) in matches.iter().enumerate() {
        println!(
            "  {:>2}. {:<32} {}",
            rank + 1,
            m.choice,
            colorize_percent(m.score)
        );
    }
    println!();
}

/// Display a coherence sweep as a horizontal bar chart.
///
/// Bars are scaled between the lowest and highest coherence in the sweep so
/// small differences stay visible; the best topic count is highlighted.
pub fn display_sweep(points: &[SweepPoint], best: Option<&SweepPoint>) {
    println!("\n{}", "=== Coherence by number of topics ===".bold());
    if points.is_empty() {
        println!("  {}", "No topic counts in range.".dimmed());
        return;
    }
    println!();

    let bar_width: usize = 40;
    let lo = points.iter().map(|p| p.coherence).fold(f64::INFINITY, f64::min);
    let hi = points
        .iter()
        .map(|p| p.coherence)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;

    for point in points {
        let fraction = if span > 0.0 {
            (point.coherence - lo) / span
        } else {
            1.0
        };
        // Always draw at least one cell so the lowest row is not blank
        let filled = ((fraction * (bar_width - 1) as f64).round() as usize + 1).min(bar_width);
        let bar = "#".repeat(filled);

        let is_best = best.is_some_and(|b| b.num_topics == point.num_topics);
        let bar = if is_best {
            bar.bright_green().bold()
        } else {
            bar.bright_blue()
        };

        let note = if point.fitted_topics < point.num_topics {
            format!(" (only {} fitted)", point.fitted_topics).dimmed().to_string()
        } else {
            String::new()
        };

        println!(
            "  {:>3}  {:<width$}  {:.4}{}",
            point.num_topics,
            bar,
            point.coherence,
            note,
            width = bar_width
        );
    }

    if let Some(best) = best {
        println!(
            "\n  Best: {} topics (coherence {:.4})",
            best.num_topics.to_string().bold(),
            best.coherence
        );
    }
    println!();
}

/// Display ontology terms, one per line with id and name.
pub fn display_terms(title: &str, terms: &[&Term]) {
    println!("\n{}", format!("=== {title} ({} terms) ===", terms.len()).bold());
    println!();

    for term in terms {
        let name = term.name.as_deref().unwrap_or("(unnamed)");
        let name = if term.obsolete {
            format!("{name} [obsolete]").dimmed()
        } else {
            name.normal()
        };
        println!("  {:<16} {}", term.id.as_str().cyan(), name);
    }
    println!();
}

/// Display the ontology's cache state and basic statistics.
pub fn display_ontology_info(status: &CacheStatus, ontology: Option<&Ontology>) {
    println!("\n{}", "=== Ontology ===".bold());
    println!();

    println!("  Cache file:  {}", status.path.display());
    match (status.modified, status.age_days) {
        (Some(modified), Some(days)) => {
            let freshness = if status.fresh {
                "fresh".green()
            } else {
                "stale".yellow()
            };
            println!(
                "  Downloaded:  {} ({} days ago, {})",
                modified.format("%Y-%m-%d %H:%M"),
                days,
                freshness
            );
        }
        _ => println!("  Downloaded:  {}", "never".dimmed()),
    }

    if let Some(ontology) = ontology {
        println!("  Terms:       {}", ontology.len());
        if let Some(version) = ontology.data_version() {
            println!("  Version:     {version}");
        }
        let obsolete = ontology.terms().filter(|t| t.obsolete).count();
        if obsolete > 0 {
            println!("  Obsolete:    {obsolete}");
        }
    }
    println!();
}

/// Print each term token as `<iri>\t\t<text>`, then a short summary.
pub fn display_concepts(doc: &TaggedDoc) {
    for (token, id) in doc.term_tokens() {
        println!("{}\t\t{}", id.iri(), token.text);
    }

    if !doc.has_concepts() {
        println!("{}", "No ontology concepts found.".dimmed());
        return;
    }

    let shared: Vec<_> = doc
        .concepts()
        .iter()
        .filter(|c| !c.alternative_ids.is_empty())
        .collect();
    if !shared.is_empty() {
        println!();
        for concept in shared {
            let others: Vec<&str> = concept.alternative_ids.iter().map(|id| id.as_str()).collect();
            println!(
                "  {} \"{}\" also names {}",
                "~".yellow(),
                super::truncate_chars(&concept.text, 40),
                others.join(", ")
            );
        }
    }
}

/// Color a score in [0, 1].
fn colorize_unit(score: f64) -> colored::ColoredString {
    let text = format!("{score:.4}");
    if score >= 0.75 {
        text.green().bold()
    } else if score >= 0.25 {
        text.yellow()
    } else {
        text.red()
    }
}

/// Color a score in [0, 100].
fn colorize_percent(score: u8) -> colored::ColoredString {
    let text = format!("{score:>3}");
    match score {
        90..=100 => text.green().bold(),
        60..=89 => text.yellow(),
        _ => text.red(),
    }
}
