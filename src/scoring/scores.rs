use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of one of the fifteen pricing factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum ScoreId {
    #[serde(rename = "SC_D1")]
    D1,
    #[serde(rename = "SC_D2")]
    D2,
    #[serde(rename = "SC_D3")]
    D3,
    #[serde(rename = "SC_S1")]
    S1,
    #[serde(rename = "SC_S2")]
    S2,
    #[serde(rename = "SC_T1")]
    T1,
    #[serde(rename = "SC_T2")]
    T2,
    #[serde(rename = "SC_A1")]
    A1,
    #[serde(rename = "SC_A2")]
    A2,
    #[serde(rename = "SC_W1")]
    W1,
    #[serde(rename = "SC_W2")]
    W2,
    #[serde(rename = "SC_Time1")]
    Time1,
    #[serde(rename = "SC_Time2")]
    Time2,
    #[serde(rename = "SC_SA1")]
    SA1,
    #[serde(rename = "SC_SA2")]
    SA2,
}

impl ScoreId {
    pub const ALL: [ScoreId; 15] = [
        ScoreId::D1,
        ScoreId::D2,
        ScoreId::D3,
        ScoreId::S1,
        ScoreId::S2,
        ScoreId::T1,
        ScoreId::T2,
        ScoreId::A1,
        ScoreId::A2,
        ScoreId::W1,
        ScoreId::W2,
        ScoreId::Time1,
        ScoreId::Time2,
        ScoreId::SA1,
        ScoreId::SA2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreId::D1 => "SC_D1",
            ScoreId::D2 => "SC_D2",
            ScoreId::D3 => "SC_D3",
            ScoreId::S1 => "SC_S1",
            ScoreId::S2 => "SC_S2",
            ScoreId::T1 => "SC_T1",
            ScoreId::T2 => "SC_T2",
            ScoreId::A1 => "SC_A1",
            ScoreId::A2 => "SC_A2",
            ScoreId::W1 => "SC_W1",
            ScoreId::W2 => "SC_W2",
            ScoreId::Time1 => "SC_Time1",
            ScoreId::Time2 => "SC_Time2",
            ScoreId::SA1 => "SC_SA1",
            ScoreId::SA2 => "SC_SA2",
        }
    }

    /// Short human label for table output
    pub fn label(&self) -> &'static str {
        match self {
            ScoreId::D1 => "Request rate",
            ScoreId::D2 => "Historical occupancy",
            ScoreId::D3 => "Booking conversion",
            ScoreId::S1 => "Slot scarcity",
            ScoreId::S2 => "Owner reliability",
            ScoreId::T1 => "Speed index",
            ScoreId::T2 => "Vehicle density",
            ScoreId::A1 => "Adjacent congestion",
            ScoreId::A2 => "Adjacent price gap",
            ScoreId::W1 => "Rain intensity",
            ScoreId::W2 => "Waterlogging",
            ScoreId::Time1 => "Peak hour",
            ScoreId::Time2 => "Holiday / event",
            ScoreId::SA1 => "CCTV coverage",
            ScoreId::SA2 => "Road accessibility",
        }
    }
}

impl fmt::Display for ScoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreId {
    type Err = anyhow::Error;

    /// Parses the canonical identifier (`SC_D1`, `SC_Time1`, ...), ignoring case
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match ScoreId::ALL
            .iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
        {
            Some(id) => Ok(*id),
            None => bail!("Unknown score identifier: {}", s),
        }
    }
}

/// Normalized factor scores for one slot, keyed by [`ScoreId`].
///
/// Built once, either by `calculate_all_scores` or by collecting
/// `(ScoreId, f64)` pairs. A partial vector is allowed: missing factors
/// count as zero when composed into a price.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreVector {
    scores: BTreeMap<ScoreId, f64>,
}

impl ScoreVector {
    pub fn get(&self, id: ScoreId) -> Option<f64> {
        self.scores.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScoreId, f64)> + '_ {
        self.scores.iter().map(|(id, score)| (*id, *score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// True when every factor has a score
    pub fn is_complete(&self) -> bool {
        self.scores.len() == ScoreId::ALL.len()
    }
}

impl FromIterator<(ScoreId, f64)> for ScoreVector {
    fn from_iter<I: IntoIterator<Item = (ScoreId, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}
