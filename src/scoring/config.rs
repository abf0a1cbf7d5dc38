use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::scores::ScoreId;
use super::weights::{get_global_weights, WeightTable};

pub const DEFAULT_ALPHA: f64 = 0.5;
pub const DEFAULT_DELTA_BAR: f64 = 0.55;

/// Pricing configuration.
///
/// Controls how strongly the composite score moves the price. Weight
/// overrides are merged over the AHP table, so only the factors being
/// tuned need to be listed.
///
/// Example YAML:
/// ```yaml
/// pricing:
///   alpha: 0.5
///   delta_bar: 0.55
///   weights:
///     SC_D1: 0.12
///     SC_T1: 0.1299
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    /// Sensitivity of the multiplier to the score deviation (default: 0.5)
    #[serde(default)]
    pub alpha: Option<f64>,

    /// Reference composite score, usually the city or zone average (default: 0.55)
    #[serde(default)]
    pub delta_bar: Option<f64>,

    /// Per-factor weight overrides keyed by score identifier (e.g. "SC_D1")
    #[serde(default)]
    pub weights: Option<BTreeMap<String, f64>>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            alpha: Some(DEFAULT_ALPHA),
            delta_bar: Some(DEFAULT_DELTA_BAR),
            weights: None,
        }
    }
}

impl PricingConfig {
    pub fn alpha(&self) -> f64 {
        self.alpha.unwrap_or(DEFAULT_ALPHA)
    }

    pub fn delta_bar(&self) -> f64 {
        self.delta_bar.unwrap_or(DEFAULT_DELTA_BAR)
    }

    /// Copy with alpha and/or delta_bar replaced, e.g. from command-line flags
    pub fn with_overrides(&self, alpha: Option<f64>, delta_bar: Option<f64>) -> Self {
        Self {
            alpha: alpha.or(self.alpha),
            delta_bar: delta_bar.or(self.delta_bar),
            weights: self.weights.clone(),
        }
    }

    /// Global weights with this config's overrides applied.
    ///
    /// Fails on an unknown score identifier; run `validate_pricing` first
    /// to report every problem at once.
    pub fn weight_table(&self) -> Result<WeightTable> {
        let global = get_global_weights();
        match self.weights {
            None => Ok(global.clone()),
            Some(ref overrides) => {
                let parsed = overrides
                    .iter()
                    .map(|(key, weight)| -> Result<(ScoreId, f64)> { Ok((key.parse()?, *weight)) })
                    .collect::<Result<Vec<_>>>()?;
                Ok(global.with_overrides(parsed))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pricing_config() {
        let config = PricingConfig::default();
        assert_eq!(config.alpha(), 0.5);
        assert_eq!(config.delta_bar(), 0.55);
        assert!(config.weights.is_none());
    }

    #[test]
    fn test_pricing_config_serde_roundtrip() {
        let config = PricingConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: PricingConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_empty_pricing_config_uses_defaults() {
        let config: PricingConfig = serde_saphyr::from_str("{}").unwrap();
        assert!(config.alpha.is_none());
        assert_eq!(config.alpha(), DEFAULT_ALPHA);
        assert_eq!(config.delta_bar(), DEFAULT_DELTA_BAR);
    }

    #[test]
    fn test_weight_overrides_parse() {
        let yaml = r#"
alpha: 0.8
weights:
  SC_D1: 0.12
  sc_t1: 0.1299
"#;
        let config: PricingConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.alpha(), 0.8);
        let table = config.weight_table().unwrap();
        assert_eq!(table.get(ScoreId::D1), Some(0.12));
        assert_eq!(table.get(ScoreId::T1), Some(0.1299));
        assert_eq!(table.get(ScoreId::SA2), Some(0.0680));
    }

    #[test]
    fn test_cli_overrides_replace_only_given_values() {
        let config = PricingConfig {
            alpha: Some(0.3),
            delta_bar: Some(0.6),
            weights: None,
        };
        let merged = config.with_overrides(Some(0.8), None);
        assert_eq!(merged.alpha(), 0.8);
        assert_eq!(merged.delta_bar(), 0.6);
        assert_eq!(config.with_overrides(None, None), config);
    }

    #[test]
    fn test_unknown_weight_key_fails() {
        let mut weights = BTreeMap::new();
        weights.insert("SC_Z1".to_string(), 0.1);
        let config = PricingConfig {
            weights: Some(weights),
            ..PricingConfig::default()
        };
        assert!(config.weight_table().is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "gamma: 1.0\n";
        assert!(serde_saphyr::from_str::<PricingConfig>(yaml).is_err());
    }
}
