use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::PricingConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub pricing: Option<PricingConfig>,
    #[serde(default)]
    pub search: Option<SearchConfig>,
    /// Slot time-series file (defaults to ~/.config/park2go/slots.json)
    #[serde(default)]
    pub slots_path: Option<PathBuf>,
}

impl Config {
    pub fn pricing(&self) -> PricingConfig {
        self.pricing.clone().unwrap_or_default()
    }

    pub fn search(&self) -> SearchConfig {
        self.search.clone().unwrap_or_default()
    }
}

/// Nearby-slot search settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Slots farther than this from the user are dropped
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// Number of recommendations returned
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Local time offset used to pick the weekday and half-hour slot.
    /// Dhaka is UTC+6 with no daylight saving.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

fn default_radius_km() -> f64 {
    2.0
}

fn default_limit() -> usize {
    5
}

fn default_utc_offset_minutes() -> i32 {
    360
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_km: default_radius_km(),
            limit: default_limit(),
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}
