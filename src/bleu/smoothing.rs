// Smoothing strategies for zero n-gram matches.
//
// Without smoothing a single empty order collapses the geometric mean to 0,
// which is harsh for short sentences. These mirror the two most common
// variants from Chen & Cherry (2014).

use serde::{Deserialize, Serialize};

use super::score::Precision;

/// How to treat n-gram orders whose clipped match count is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Smoothing {
    /// No smoothing: any weighted order with zero matches scores 0.
    #[default]
    None,
    /// Add a small epsilon to zero numerators.
    Epsilon(f64),
    /// Add one to numerator and denominator of every order above unigrams.
    AddOne,
}

impl Smoothing {
    /// Turn clipped precision counts into the per-order precision values
    /// that feed the geometric mean. `None` entries mean the order has no
    /// usable precision.
    pub fn apply(&self, precisions: &[Precision]) -> Vec<Option<f64>> {
        precisions
            .iter()
            .enumerate()
            .map(|(i, p)| match self {
                Smoothing::None => (p.numerator > 0).then(|| p.value()),
                Smoothing::Epsilon(eps) => {
                    if p.numerator > 0 {
                        Some(p.value())
                    } else {
                        Some(eps / p.denominator as f64)
                    }
                }
                Smoothing::AddOne => {
                    if i == 0 {
                        (p.numerator > 0).then(|| p.value())
                    } else {
                        Some((p.numerator + 1) as f64 / (p.denominator + 1) as f64)
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(numerator: usize, denominator: usize) -> Precision {
        Precision {
            numerator,
            denominator,
        }
    }

    #[test]
    fn test_none_drops_zero_orders() {
        let out = Smoothing::None.apply(&[p(3, 4), p(0, 3)]);
        assert_eq!(out, vec![Some(0.75), None]);
    }

    #[test]
    fn test_epsilon_fills_zero_numerators() {
        let out = Smoothing::Epsilon(0.1).apply(&[p(3, 4), p(0, 2)]);
        assert!((out[1].unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_add_one_leaves_unigrams_alone() {
        let out = Smoothing::AddOne.apply(&[p(2, 4), p(0, 3)]);
        assert_eq!(out[0], Some(0.5));
        assert_eq!(out[1], Some(0.25));
    }
}
