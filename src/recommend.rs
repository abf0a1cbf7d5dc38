use anyhow::{bail, Result};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::debug;

use crate::geo::{geocode_location, haversine_km, Coordinates};
use crate::scoring::{calculate_all_scores, calculate_dynamic_price, get_base_price, WeightTable};
use crate::slots::{filter_slots, SlotQuery, SlotRecord};

/// Turn the user's location input into coordinates.
///
/// A named area takes precedence over coordinates; a blank name counts as
/// no name. Fails on an unknown area name, on missing coordinates, or on
/// coordinates off the globe.
pub fn resolve_location(
    location: Option<&str>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<Coordinates> {
    if let Some(name) = location.filter(|n| !n.trim().is_empty()) {
        return match geocode_location(name) {
            Some(coords) => Ok(coords),
            None => bail!("Unknown location '{}'", name),
        };
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                bail!("Coordinates out of range: lat={}, lon={}", lat, lon);
            }
            Ok(Coordinates::new(lat, lon))
        }
        _ => bail!("Provide --location <Dhaka area> OR --lat/--lon"),
    }
}

#[derive(Debug, Clone)]
pub struct RecommendRequest {
    /// Location text as typed, echoed back in the response
    pub location: Option<String>,
    pub coords: Coordinates,
    pub vehicle_type: Option<String>,
    pub booking_type: Option<String>,
    pub alpha: f64,
    pub delta_bar: f64,
    pub at: DateTime<FixedOffset>,
    pub radius_km: f64,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryEcho {
    pub location: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub day: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotRecommendation {
    pub unique_id: String,
    pub location_name: String,
    pub distance_km: f64,
    pub vehicle_type: Option<String>,
    pub booking_type: Option<String>,
    pub adjusted_price: f64,
    pub free_slots: u32,
    pub safety_point: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub query: QueryEcho,
    pub results: Vec<SlotRecommendation>,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn booking_matches(wanted: Option<&str>, record: &SlotRecord) -> bool {
    match wanted {
        Some(w) => record.booking_type_or_default().eq_ignore_ascii_case(w.trim()),
        None => true,
    }
}

/// Price one stored slot. Booking types outside the base price table are
/// priced at the fallback rate.
fn price_slot(
    record: &SlotRecord,
    weights: &WeightTable,
    alpha: f64,
    delta_bar: f64,
) -> f64 {
    let base_price = get_base_price(
        record.booking_type_or_default(),
        &record.pricing_vehicle().to_string(),
    );

    let scores = calculate_all_scores(&record.to_raw_signals());
    let result = calculate_dynamic_price(base_price, &scores, weights, alpha, delta_bar);
    debug!(
        slot = %record.unique_id,
        base_price,
        delta_i = result.delta_i,
        multiplier = result.multiplier,
        price = result.dynamic_price,
        "priced slot"
    );
    result.dynamic_price
}

/// Find, price and rank the slots near the requested location.
///
/// Slots are matched on weekday, half-hour and optional vehicle/booking
/// type, dropped beyond `radius_km`, then sorted by adjusted price with
/// distance breaking ties. At most `limit` are returned.
pub fn recommend(
    slots: &[SlotRecord],
    request: &RecommendRequest,
    weights: &WeightTable,
) -> Recommendation {
    let query = SlotQuery::at(&request.at, request.vehicle_type.clone());
    let candidates = filter_slots(slots, &query);
    debug!(
        day = %query.day_of_week,
        time = %query.timestamp,
        candidates = candidates.len(),
        "slot store query"
    );

    let mut results: Vec<SlotRecommendation> = candidates
        .into_iter()
        .filter(|record| booking_matches(request.booking_type.as_deref(), record))
        .filter_map(|record| {
            let distance = haversine_km(request.coords, record.coordinates());
            if distance > request.radius_km {
                return None;
            }
            let price = price_slot(record, weights, request.alpha, request.delta_bar);
            Some(SlotRecommendation {
                unique_id: record.unique_id.clone(),
                location_name: record.location_name.clone(),
                distance_km: round_to(distance, 3),
                vehicle_type: record.vehicle_type.clone(),
                booking_type: record.booking_type.clone(),
                adjusted_price: round_to(price, 2),
                free_slots: record.free_slots,
                safety_point: record.safety_point,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        a.adjusted_price
            .total_cmp(&b.adjusted_price)
            .then(a.distance_km.total_cmp(&b.distance_km))
    });
    results.truncate(request.limit);

    Recommendation {
        query: QueryEcho {
            location: request.location.clone(),
            lat: request.coords.lat,
            lon: request.coords.lon,
            day: query.day_of_week,
            time: query.timestamp,
        },
        results,
    }
}
