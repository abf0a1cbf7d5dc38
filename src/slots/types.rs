use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;
use crate::scoring::{default_peak_hours, PeakWindow, RawSignals, VehicleType};

/// One row of the slot time-series: a parking slot's signals for a given
/// weekday and half-hour.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SlotRecord {
    pub unique_id: String,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub vehicle_type: Option<String>,
    pub booking_type: Option<String>,
    /// English weekday name, e.g. "Monday"
    pub day_of_week: String,
    /// Half-hour slot start, "HH:MM"
    pub timestamp: String,

    pub requests_per_min: f64,
    #[serde(rename = "Rmax")]
    pub rmax: f64,
    pub avg_occupied_slots_hist: f64,
    pub total_slots: u32,
    pub bookings_last_hour: u32,
    pub views_last_hour: u32,
    pub free_slots: u32,
    pub successful_bookings_30d: u32,
    pub accepted_bookings_30d: u32,
    pub avg_speed: f64,
    pub free_flow_speed: f64,
    pub vehicle_density: f64,
    #[serde(rename = "DensityMax")]
    pub density_max: f64,
    pub local_average_price: f64,
    pub rain_mm_last_30min: f64,
    pub rain_max_mm: f64,
    #[serde(default)]
    pub is_waterlogged: bool,
    pub current_hour: u32,
    #[serde(default)]
    pub peak_hours: Option<Vec<PeakWindow>>,
    #[serde(default)]
    pub is_holiday_or_event: bool,
    pub cctv_coverage_percent: f64,
    pub road_width_m: f64,
    pub max_width_for_score: f64,
    pub safety_point: f64,
}

impl SlotRecord {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Booking type as stored, defaulting to "Regular" when absent
    pub fn booking_type_or_default(&self) -> &str {
        match self.booking_type.as_deref() {
            Some(b) if !b.trim().is_empty() => b,
            _ => "Regular",
        }
    }

    /// Vehicle class the slot is priced as
    pub fn pricing_vehicle(&self) -> VehicleType {
        VehicleType::from_slot_label(self.vehicle_type.as_deref().unwrap_or(""))
    }

    /// Signals for scoring. The store has no neighbour data, so the
    /// adjacent-area list is empty.
    pub fn to_raw_signals(&self) -> RawSignals {
        RawSignals {
            requests_per_min: self.requests_per_min,
            rmax: self.rmax,
            avg_occupied_slots_hist: self.avg_occupied_slots_hist,
            total_slots: self.total_slots,
            bookings_last_hour: self.bookings_last_hour,
            views_last_hour: self.views_last_hour,
            free_slots: self.free_slots,
            successful_bookings_30d: self.successful_bookings_30d,
            accepted_bookings_30d: self.accepted_bookings_30d,
            avg_speed: self.avg_speed,
            free_flow_speed: self.free_flow_speed,
            vehicle_density: self.vehicle_density,
            density_max: self.density_max,
            local_average_price: self.local_average_price,
            adjacent_areas: Vec::new(),
            rain_mm_last_30min: self.rain_mm_last_30min,
            rain_max_mm: self.rain_max_mm,
            is_waterlogged: self.is_waterlogged,
            current_hour: self.current_hour,
            peak_hours: self.peak_hours.clone().unwrap_or_else(default_peak_hours),
            is_holiday_or_event: self.is_holiday_or_event,
            cctv_coverage_percent: self.cctv_coverage_percent,
            road_width_m: self.road_width_m,
            max_width_for_score: self.max_width_for_score,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_record(unique_id: &str, lat: f64, lon: f64) -> SlotRecord {
    SlotRecord {
        unique_id: unique_id.to_string(),
        location_name: format!("Lot {}", unique_id),
        latitude: lat,
        longitude: lon,
        vehicle_type: Some("Car".to_string()),
        booking_type: Some("Regular".to_string()),
        day_of_week: "Monday".to_string(),
        timestamp: "18:00".to_string(),
        requests_per_min: 2.5,
        rmax: 5.0,
        avg_occupied_slots_hist: 30.0,
        total_slots: 50,
        bookings_last_hour: 15,
        views_last_hour: 100,
        free_slots: 10,
        successful_bookings_30d: 480,
        accepted_bookings_30d: 500,
        avg_speed: 15.0,
        free_flow_speed: 50.0,
        vehicle_density: 120.0,
        density_max: 200.0,
        local_average_price: 80.0,
        rain_mm_last_30min: 5.0,
        rain_max_mm: 20.0,
        is_waterlogged: false,
        current_hour: 18,
        peak_hours: None,
        is_holiday_or_event: false,
        cctv_coverage_percent: 80.0,
        road_width_m: 4.0,
        max_width_for_score: 10.0,
        safety_point: 4.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_type_default() {
        let mut record = sample_record("a", 23.79, 90.40);
        record.booking_type = None;
        assert_eq!(record.booking_type_or_default(), "Regular");
        record.booking_type = Some("  ".to_string());
        assert_eq!(record.booking_type_or_default(), "Regular");
        record.booking_type = Some("Premium".to_string());
        assert_eq!(record.booking_type_or_default(), "Premium");
    }

    #[test]
    fn test_pricing_vehicle() {
        let mut record = sample_record("a", 23.79, 90.40);
        assert_eq!(record.pricing_vehicle(), VehicleType::Car);
        record.vehicle_type = Some("Bike".to_string());
        assert_eq!(record.pricing_vehicle(), VehicleType::Motorcycle);
        record.vehicle_type = None;
        assert_eq!(record.pricing_vehicle(), VehicleType::Car);
    }

    #[test]
    fn test_to_raw_signals() {
        let record = sample_record("a", 23.79, 90.40);
        let signals = record.to_raw_signals();
        assert_eq!(signals.rmax, 5.0);
        assert_eq!(signals.total_slots, 50);
        assert!(signals.adjacent_areas.is_empty());
        assert_eq!(signals.peak_hours, default_peak_hours());
    }

    #[test]
    fn test_record_peak_hours_override_default() {
        let mut record = sample_record("a", 23.79, 90.40);
        record.peak_hours = Some(vec![PeakWindow(11, 13)]);
        assert_eq!(record.to_raw_signals().peak_hours, vec![PeakWindow(11, 13)]);
    }
}
