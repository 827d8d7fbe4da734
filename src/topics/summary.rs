// TopicSummary — the printable result of a topic modeling run.
//
// Lists each latent topic's strongest terms alongside how much of the
// corpus variance the topic explains (its squared singular value over the
// total of the fitted topics).

use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::lsa::Topic;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSummary {
    /// Topics in decreasing order of singular value
    pub topics: Vec<Topic>,
    pub singular_values: Vec<f64>,
    pub document_count: usize,
    pub vocabulary_size: usize,
}

impl TopicSummary {
    /// Fraction of the fitted variance carried by each topic. Sums to 1.0
    /// unless every singular value is zero.
    pub fn variance_shares(&self) -> Vec<f64> {
        let total: f64 = self.singular_values.iter().map(|s| s * s).sum();
        self.singular_values
            .iter()
            .map(|s| if total > 0.0 { s * s / total } else { 0.0 })
            .collect()
    }

    /// Display the topics as a bar chart with their top terms.
    pub fn display(&self) {
        println!(
            "\n{}",
            format!(
                "=== Latent Topics ({} documents, {} terms) ===",
                self.document_count, self.vocabulary_size
            )
            .bold()
        );
        println!();

        let bar_width: usize = 20;

        for (topic, share) in self.topics.iter().zip(self.variance_shares()) {
            let filled = (share * bar_width as f64).round() as usize;
            let empty = bar_width.saturating_sub(filled);
            let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));

            let colored_bar = if share >= 0.25 {
                bar.bright_green()
            } else if share >= 0.10 {
                bar.bright_yellow()
            } else {
                bar.bright_blue()
            };

            let label: Vec<&str> = topic.terms.iter().take(3).map(|(t, _)| t.as_str()).collect();
            println!(
                "  {:>2}. {:<40} {} {:.2}",
                topic.index,
                label.join(" / ").bold(),
                colored_bar,
                share
            );
            println!("      {}", topic.to_string().dimmed());
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variance_shares() {
        let summary = TopicSummary {
            topics: vec![],
            singular_values: vec![3.0, 1.0],
            document_count: 2,
            vocabulary_size: 2,
        };
        let shares = summary.variance_shares();
        assert!((shares[0] - 0.9).abs() < 1e-12);
        assert!((shares[1] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_variance_shares_all_zero() {
        let summary = TopicSummary {
            topics: vec![],
            singular_values: vec![0.0],
            document_count: 0,
            vocabulary_size: 0,
        };
        assert_eq!(summary.variance_shares(), vec![0.0]);
    }
}
