use crate::error::{Error, Result};
use crate::species::Species;
use serde::{Deserialize, Serialize};

const SUM_TOLERANCE: f32 = 1e-3;

/// A probability vector over [`Species::ALL`].
///
/// Always four finite, non-negative entries summing to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>")]
pub struct Probabilities([f32; 4]);

impl TryFrom<Vec<f32>> for Probabilities {
    type Error = Error;

    fn try_from(values: Vec<f32>) -> Result<Self> {
        Self::new(&values)
    }
}

impl Probabilities {
    /// Validates `values` and renormalizes away rounding drift.
    pub fn new(values: &[f32]) -> Result<Self> {
        let values: [f32; 4] = values.try_into().map_err(|_| {
            Error::InvalidProbabilities(format!(
                "se esperaban {} valores, hay {}",
                Species::ALL.len(),
                values.len()
            ))
        })?;
        if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(Error::InvalidProbabilities(format!("valor fuera de rango: {bad}")));
        }
        let sum: f32 = values.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(Error::InvalidProbabilities(format!("la suma es {sum}")));
        }
        Ok(Self(values.map(|v| v / sum)))
    }

    /// Softmax over raw model scores.
    pub fn from_logits(logits: &[f32]) -> Result<Self> {
        Self::new(&softmax(logits))
    }

    /// Accepts scores that already form a distribution, otherwise softmaxes them.
    pub fn from_scores(scores: &[f32]) -> Result<Self> {
        Self::new(scores).or_else(|_| Self::from_logits(scores))
    }

    pub fn values(&self) -> &[f32; 4] {
        &self.0
    }

    pub fn get(&self, species: Species) -> f32 {
        self.0[species.index()]
    }

    /// Index of the largest entry; the first one wins on ties.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, v) in self.0.iter().enumerate().skip(1) {
            if *v > self.0[best] {
                best = i;
            }
        }
        best
    }

    pub fn confidence(&self) -> f32 {
        self.0[self.argmax()]
    }

    pub fn top(&self) -> (Species, f32) {
        let i = self.argmax();
        (Species::ALL[i], self.0[i])
    }

    /// Pairs every species with its probability, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Species, f32)> + '_ {
        Species::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// One entry as a percentage with one decimal, e.g. `"42.3%"`.
    pub fn percent(&self, species: Species) -> String {
        format!("{:.1}%", self.get(species) * 100.0)
    }

    /// Confidence as a percentage with two decimals, e.g. `"42.31%"`.
    pub fn confidence_text(&self) -> String {
        format!("{:.2}%", self.confidence() * 100.0)
    }
}

pub(crate) fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|x| x / sum).collect()
}
