//! Individual factor scores.
//!
//! Every function is total: zero denominators map to a fixed substitute
//! value instead of failing, and ratios saturate into `[0, 1]`.

use super::signals::PeakWindow;

/// Floor applied to the local value in the adjacent-area differentials
const MIN_LOCAL_VALUE: f64 = 0.01;

/// Saturation clamp into the unit interval
pub fn saturate(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// SC_D1: real-time request rate against the busiest expected rate.
pub fn calc_sc_d1(requests_per_min: f64, rmax: f64) -> f64 {
    if rmax == 0.0 {
        return 0.0;
    }
    (requests_per_min / rmax).min(1.0)
}

/// SC_D2: historical occupancy for this hour.
pub fn calc_sc_d2(avg_occupied_slots_hist: f64, total_slots: u32) -> f64 {
    if total_slots == 0 {
        return 0.0;
    }
    saturate(avg_occupied_slots_hist / f64::from(total_slots))
}

/// SC_D3: booking conversion over the last hour.
pub fn calc_sc_d3(bookings_last_hour: u32, views_last_hour: u32) -> f64 {
    if views_last_hour == 0 {
        return 0.0;
    }
    saturate(f64::from(bookings_last_hour) / f64::from(views_last_hour))
}

/// SC_S1: slot scarcity. An area with no slots counts as full.
pub fn calc_sc_s1(free_slots: u32, total_slots: u32) -> f64 {
    if total_slots == 0 {
        return 1.0;
    }
    saturate(1.0 - f64::from(free_slots) / f64::from(total_slots))
}

/// SC_S2: owner reliability over 30 days. No history scores zero.
pub fn calc_sc_s2(successful_bookings_30d: u32, accepted_bookings_30d: u32) -> f64 {
    if accepted_bookings_30d == 0 {
        return 0.0;
    }
    saturate(f64::from(successful_bookings_30d) / f64::from(accepted_bookings_30d))
}

/// SC_T1: speed index. Zero free-flow speed is maximum congestion.
pub fn calc_sc_t1(avg_speed: f64, free_flow_speed: f64) -> f64 {
    if free_flow_speed == 0.0 {
        return 1.0;
    }
    saturate(1.0 - avg_speed / free_flow_speed)
}

/// SC_T2: vehicle density against the density considered fully congested.
pub fn calc_sc_t2(vehicle_density: f64, density_max: f64) -> f64 {
    if density_max == 0.0 {
        return 0.0;
    }
    (vehicle_density / density_max).min(1.0)
}

/// Positive relative gap between a local value and the mean of its
/// neighbours, capped at 1. Zero when the local value is not above the mean.
fn differential(local: f64, adjacent: &[f64]) -> f64 {
    if adjacent.is_empty() {
        return 0.0;
    }
    let diff = local - mean(adjacent);
    if diff > 0.0 {
        (diff / local.max(MIN_LOCAL_VALUE)).min(1.0)
    } else {
        0.0
    }
}

/// SC_A1: how much more congested this area is than its neighbours.
///
/// `local_congestion` is the slot's SC_T1 score.
pub fn calc_sc_a1(local_congestion: f64, adjacent_congestion: &[f64]) -> f64 {
    differential(local_congestion, adjacent_congestion)
}

/// SC_A2: how much more expensive this area is than its neighbours.
pub fn calc_sc_a2(local_average_price: f64, adjacent_prices: &[f64]) -> f64 {
    differential(local_average_price, adjacent_prices)
}

/// SC_W1: rain intensity against the heavy-rain threshold.
pub fn calc_sc_w1(rain_mm_last_30min: f64, rain_max_mm: f64) -> f64 {
    if rain_max_mm == 0.0 {
        return 0.0;
    }
    saturate(rain_mm_last_30min / rain_max_mm)
}

/// SC_W2: waterlogging flag.
pub fn calc_sc_w2(is_waterlogged: bool) -> f64 {
    if is_waterlogged {
        1.0
    } else {
        0.0
    }
}

/// SC_Time1: 1 when the hour falls in any `[start, end)` peak window.
pub fn calc_sc_time1(current_hour: u32, peak_hours: &[PeakWindow]) -> f64 {
    if peak_hours.iter().any(|w| w.contains(current_hour)) {
        1.0
    } else {
        0.0
    }
}

/// SC_Time2: holiday or event flag.
pub fn calc_sc_time2(is_holiday_or_event: bool) -> f64 {
    if is_holiday_or_event {
        1.0
    } else {
        0.0
    }
}

/// SC_SA1: CCTV coverage, given as a percentage.
pub fn calc_sc_sa1(cctv_coverage_percent: f64) -> f64 {
    saturate(cctv_coverage_percent / 100.0)
}

/// SC_SA2: road accessibility. Narrow roads score high; zero reference
/// width is treated as the narrowest road.
pub fn calc_sc_sa2(road_width_m: f64, max_width_for_score: f64) -> f64 {
    if max_width_for_score == 0.0 {
        return 1.0;
    }
    saturate(1.0 - road_width_m / max_width_for_score)
}
