use serde::Serialize;

use super::factors::*;
use super::scores::{ScoreId, ScoreVector};
use super::signals::RawSignals;
use super::weights::WeightTable;

/// Outcome of composing scores into a price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingResult {
    pub dynamic_price: f64,
    /// Composite score (weighted sum of factor scores)
    pub delta_i: f64,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub id: ScoreId,
    pub score: f64,
    pub weight: f64,
    pub contribution: f64, // weight * score
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub alpha: f64,
    pub delta_bar: f64,
    pub factors: Vec<FactorContribution>,
    pub result: PricingResult,
}

/// Compute all fifteen factor scores for one slot.
pub fn calculate_all_scores(signals: &RawSignals) -> ScoreVector {
    // SC_A1 compares local congestion against neighbours, and the local
    // congestion is the speed index, so SC_T1 goes first.
    let t1 = calc_sc_t1(signals.avg_speed, signals.free_flow_speed);
    let a1 = calc_sc_a1(t1, &signals.adjacent_congestion());

    [
        (
            ScoreId::D1,
            calc_sc_d1(signals.requests_per_min, signals.rmax),
        ),
        (
            ScoreId::D2,
            calc_sc_d2(signals.avg_occupied_slots_hist, signals.total_slots),
        ),
        (
            ScoreId::D3,
            calc_sc_d3(signals.bookings_last_hour, signals.views_last_hour),
        ),
        (
            ScoreId::S1,
            calc_sc_s1(signals.free_slots, signals.total_slots),
        ),
        (
            ScoreId::S2,
            calc_sc_s2(
                signals.successful_bookings_30d,
                signals.accepted_bookings_30d,
            ),
        ),
        (ScoreId::T1, t1),
        (
            ScoreId::T2,
            calc_sc_t2(signals.vehicle_density, signals.density_max),
        ),
        (ScoreId::A1, a1),
        (
            ScoreId::A2,
            calc_sc_a2(signals.local_average_price, &signals.adjacent_prices()),
        ),
        (
            ScoreId::W1,
            calc_sc_w1(signals.rain_mm_last_30min, signals.rain_max_mm),
        ),
        (ScoreId::W2, calc_sc_w2(signals.is_waterlogged)),
        (
            ScoreId::Time1,
            calc_sc_time1(signals.current_hour, &signals.peak_hours),
        ),
        (ScoreId::Time2, calc_sc_time2(signals.is_holiday_or_event)),
        (ScoreId::SA1, calc_sc_sa1(signals.cctv_coverage_percent)),
        (
            ScoreId::SA2,
            calc_sc_sa2(signals.road_width_m, signals.max_width_for_score),
        ),
    ]
    .into_iter()
    .collect()
}

fn contributions(scores: &ScoreVector, weights: &WeightTable) -> Vec<FactorContribution> {
    weights
        .iter()
        .map(|(id, weight)| {
            // Missing scores count as zero
            let score = scores.get(id).unwrap_or(0.0);
            FactorContribution {
                id,
                score,
                weight,
                contribution: weight * score,
            }
        })
        .collect()
}

fn compose(base_price: f64, delta_i: f64, alpha: f64, delta_bar: f64) -> PricingResult {
    // Not clamped: a large negative deviation can push the multiplier
    // (and the price) below zero.
    let multiplier = 1.0 + alpha * (delta_i - delta_bar);
    PricingResult {
        dynamic_price: base_price * multiplier,
        delta_i,
        multiplier,
    }
}

/// Compose factor scores into a demand-adjusted price.
///
/// `delta_i` sums `weight * score` over every factor in `weights`; the
/// multiplier is `1 + alpha * (delta_i - delta_bar)`.
pub fn calculate_dynamic_price(
    base_price: f64,
    scores: &ScoreVector,
    weights: &WeightTable,
    alpha: f64,
    delta_bar: f64,
) -> PricingResult {
    let delta_i = contributions(scores, weights)
        .iter()
        .map(|c| c.contribution)
        .sum();
    compose(base_price, delta_i, alpha, delta_bar)
}

/// Same as [`calculate_dynamic_price`], keeping the per-factor terms.
pub fn explain_price(
    base_price: f64,
    scores: &ScoreVector,
    weights: &WeightTable,
    alpha: f64,
    delta_bar: f64,
) -> PriceBreakdown {
    let factors = contributions(scores, weights);
    let delta_i = factors.iter().map(|c| c.contribution).sum();
    PriceBreakdown {
        base_price,
        alpha,
        delta_bar,
        factors,
        result: compose(base_price, delta_i, alpha, delta_bar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::signals::{sample_signals, AdjacentArea};
    use crate::scoring::weights::get_global_weights;

    fn uniform_scores(value: f64) -> ScoreVector {
        ScoreId::ALL.iter().map(|id| (*id, value)).collect()
    }

    #[test]
    fn test_all_scores_present_and_bounded() {
        let scores = calculate_all_scores(&sample_signals());
        assert!(scores.is_complete());
        for (id, score) in scores.iter() {
            assert!((0.0..=1.0).contains(&score), "{} out of range: {}", id, score);
        }
    }

    #[test]
    fn test_sample_scores() {
        let scores = calculate_all_scores(&sample_signals());
        assert!((scores.get(ScoreId::D1).unwrap() - 0.5).abs() < 1e-12);
        assert!((scores.get(ScoreId::T1).unwrap() - 0.7).abs() < 1e-12);
        assert_eq!(scores.get(ScoreId::Time1), Some(1.0));
        assert_eq!(scores.get(ScoreId::W2), Some(0.0));
        // local price 80 equals the neighbour mean
        assert_eq!(scores.get(ScoreId::A2), Some(0.0));
    }

    #[test]
    fn test_a1_uses_speed_index_as_local_congestion() {
        let mut signals = sample_signals();
        signals.adjacent_areas = vec![AdjacentArea { congestion: 0.35, price: 80.0 }];
        let scores = calculate_all_scores(&signals);
        let t1 = scores.get(ScoreId::T1).unwrap();
        let expected = calc_sc_a1(t1, &[0.35]);
        assert_eq!(scores.get(ScoreId::A1), Some(expected));
        assert!((expected - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_signals_never_fail() {
        let mut signals = sample_signals();
        signals.rmax = 0.0;
        signals.total_slots = 0;
        signals.views_last_hour = 0;
        signals.accepted_bookings_30d = 0;
        signals.free_flow_speed = 0.0;
        signals.density_max = 0.0;
        signals.rain_max_mm = 0.0;
        signals.max_width_for_score = 0.0;
        signals.adjacent_areas.clear();
        signals.peak_hours.clear();

        let scores = calculate_all_scores(&signals);
        assert_eq!(scores.get(ScoreId::D1), Some(0.0));
        assert_eq!(scores.get(ScoreId::D2), Some(0.0));
        assert_eq!(scores.get(ScoreId::D3), Some(0.0));
        assert_eq!(scores.get(ScoreId::S1), Some(1.0));
        assert_eq!(scores.get(ScoreId::S2), Some(0.0));
        assert_eq!(scores.get(ScoreId::T1), Some(1.0));
        assert_eq!(scores.get(ScoreId::T2), Some(0.0));
        assert_eq!(scores.get(ScoreId::A1), Some(0.0));
        assert_eq!(scores.get(ScoreId::A2), Some(0.0));
        assert_eq!(scores.get(ScoreId::W1), Some(0.0));
        assert_eq!(scores.get(ScoreId::Time1), Some(0.0));
        assert_eq!(scores.get(ScoreId::SA2), Some(1.0));
    }

    #[test]
    fn test_end_to_end_half_scores() {
        let result = calculate_dynamic_price(
            70.0,
            &uniform_scores(0.5),
            get_global_weights(),
            0.5,
            0.55,
        );
        assert!((result.delta_i - 0.5).abs() < 1e-3);
        assert!((result.multiplier - 0.975).abs() < 1e-3);
        assert!((result.dynamic_price - 68.25).abs() < 0.01);
    }

    #[test]
    fn test_missing_scores_count_as_zero() {
        let scores: ScoreVector = [(ScoreId::D1, 1.0)].into_iter().collect();
        let result = calculate_dynamic_price(100.0, &scores, get_global_weights(), 0.5, 0.0);
        assert!((result.delta_i - 0.1312).abs() < 1e-12);
        assert!((result.multiplier - (1.0 + 0.5 * 0.1312)).abs() < 1e-12);
    }

    #[test]
    fn test_scores_without_weight_are_ignored() {
        let weights: WeightTable = [(ScoreId::D1, 1.0)].into_iter().collect();
        let result = calculate_dynamic_price(50.0, &uniform_scores(0.4), &weights, 1.0, 0.4);
        assert!((result.delta_i - 0.4).abs() < 1e-12);
        assert!((result.multiplier - 1.0).abs() < 1e-12);
        assert!((result.dynamic_price - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_multiplier_not_clamped() {
        let result = calculate_dynamic_price(
            70.0,
            &uniform_scores(0.0),
            get_global_weights(),
            5.0,
            0.55,
        );
        // 1 + 5 * (0 - 0.55) = -1.75
        assert!((result.multiplier + 1.75).abs() < 1e-12);
        assert!(result.dynamic_price < 0.0);
    }

    #[test]
    fn test_zero_alpha_keeps_base_price() {
        let result = calculate_dynamic_price(
            80.0,
            &uniform_scores(0.9),
            get_global_weights(),
            0.0,
            0.55,
        );
        assert_eq!(result.multiplier, 1.0);
        assert_eq!(result.dynamic_price, 80.0);
    }

    #[test]
    fn test_idempotent() {
        let signals = sample_signals();
        let first = calculate_all_scores(&signals);
        let second = calculate_all_scores(&signals);
        assert_eq!(first, second);

        let weights = get_global_weights();
        let a = calculate_dynamic_price(70.0, &first, weights, 0.5, 0.55);
        let b = calculate_dynamic_price(70.0, &second, weights, 0.5, 0.55);
        assert_eq!(a.dynamic_price.to_bits(), b.dynamic_price.to_bits());
        assert_eq!(a.delta_i.to_bits(), b.delta_i.to_bits());
        assert_eq!(a.multiplier.to_bits(), b.multiplier.to_bits());
    }

    #[test]
    fn test_explain_matches_price() {
        let scores = calculate_all_scores(&sample_signals());
        let weights = get_global_weights();
        let breakdown = explain_price(100.0, &scores, weights, 0.5, 0.55);
        let result = calculate_dynamic_price(100.0, &scores, weights, 0.5, 0.55);

        assert_eq!(breakdown.result, result);
        assert_eq!(breakdown.factors.len(), 15);
        let total: f64 = breakdown.factors.iter().map(|f| f.contribution).sum();
        assert_eq!(total, result.delta_i);
    }
}
