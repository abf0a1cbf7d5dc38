use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::scores::ScoreId;

/// Tolerance allowed around a total weight of 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// AHP-derived global weights, one per factor.
const AHP_WEIGHTS: [(ScoreId, f64); 15] = [
    (ScoreId::D1, 0.1312),
    (ScoreId::D2, 0.0775),
    (ScoreId::D3, 0.0411),
    (ScoreId::S1, 0.0659),
    (ScoreId::S2, 0.0220),
    (ScoreId::T1, 0.1187),
    (ScoreId::T2, 0.0593),
    (ScoreId::A1, 0.0984),
    (ScoreId::A2, 0.0492),
    (ScoreId::W1, 0.0491),
    (ScoreId::W2, 0.0327),
    (ScoreId::Time1, 0.0843),
    (ScoreId::Time2, 0.0211),
    (ScoreId::SA1, 0.0816),
    (ScoreId::SA2, 0.0680),
];

/// Importance weight per factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTable {
    weights: BTreeMap<ScoreId, f64>,
}

impl WeightTable {
    pub fn get(&self, id: ScoreId) -> Option<f64> {
        self.weights.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScoreId, f64)> + '_ {
        self.weights.iter().map(|(id, w)| (*id, *w))
    }

    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Whether the weights add up to 1.0 within [`WEIGHT_SUM_TOLERANCE`]
    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }

    /// Copy of this table with the given factors replaced
    pub fn with_overrides<I>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (ScoreId, f64)>,
    {
        let mut weights = self.weights.clone();
        weights.extend(overrides);
        Self { weights }
    }
}

impl FromIterator<(ScoreId, f64)> for WeightTable {
    fn from_iter<I: IntoIterator<Item = (ScoreId, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}

/// The process-wide AHP weight table, built on first use.
pub fn get_global_weights() -> &'static WeightTable {
    static GLOBAL: OnceLock<WeightTable> = OnceLock::new();
    GLOBAL.get_or_init(|| AHP_WEIGHTS.into_iter().collect())
}
