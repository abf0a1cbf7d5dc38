use tracing::warn;

use super::config::PricingConfig;
use super::scores::ScoreId;
use super::weights::WEIGHT_SUM_TOLERANCE;

/// Validate pricing configuration at startup.
/// Returns all validation errors at once (not just the first).
///
/// An alpha or delta_bar outside `[0, 1]` is allowed but logged.
pub fn validate_pricing(config: &PricingConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(alpha) = config.alpha {
        if !alpha.is_finite() {
            errors.push("pricing.alpha: must be a finite number".to_string());
        } else if !(0.0..=1.0).contains(&alpha) {
            warn!(alpha, "pricing.alpha is outside [0, 1]");
        }
    }

    if let Some(delta_bar) = config.delta_bar {
        if !delta_bar.is_finite() {
            errors.push("pricing.delta_bar: must be a finite number".to_string());
        } else if !(0.0..=1.0).contains(&delta_bar) {
            warn!(delta_bar, "pricing.delta_bar is outside [0, 1]");
        }
    }

    if let Some(ref weights) = config.weights {
        let mut keys_valid = true;
        for (key, weight) in weights {
            if let Err(e) = key.parse::<ScoreId>() {
                keys_valid = false;
                errors.push(format!("pricing.weights.{}: {}", key, e));
            }
            if !weight.is_finite() || *weight < 0.0 {
                errors.push(format!(
                    "pricing.weights.{}: must be a non-negative number, got {}",
                    key, weight
                ));
            }
        }

        if keys_valid {
            if let Ok(table) = config.weight_table() {
                let sum = table.sum();
                if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                    errors.push(format!(
                        "pricing.weights: effective weights must sum to 1.0 (±{}), got {:.4}",
                        WEIGHT_SUM_TOLERANCE, sum
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
