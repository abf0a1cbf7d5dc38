use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Peak window as a half-open hour range `[start, end)`.
///
/// Serialized as a two-element sequence, e.g. `[8, 10]`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct PeakWindow(pub u32, pub u32);

impl PeakWindow {
    pub fn contains(&self, hour: u32) -> bool {
        self.0 <= hour && hour < self.1
    }
}

/// Peak windows used when a slot carries none of its own.
pub fn default_peak_hours() -> Vec<PeakWindow> {
    vec![PeakWindow(8, 10), PeakWindow(17, 20)]
}

/// Congestion and price observed in one neighbouring zone.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct AdjacentArea {
    pub congestion: f64,
    pub price: f64,
}

/// Raw per-slot signals for one evaluation moment.
///
/// Field names follow the slot store columns, so `Rmax` and `DensityMax`
/// keep their capitalised spelling on the wire.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawSignals {
    // Demand
    pub requests_per_min: f64,
    #[serde(rename = "Rmax")]
    pub rmax: f64,
    pub avg_occupied_slots_hist: f64,
    pub total_slots: u32,
    pub bookings_last_hour: u32,
    pub views_last_hour: u32,

    // Supply
    pub free_slots: u32,
    pub successful_bookings_30d: u32,
    pub accepted_bookings_30d: u32,

    // Traffic
    pub avg_speed: f64,
    pub free_flow_speed: f64,
    pub vehicle_density: f64,
    #[serde(rename = "DensityMax")]
    pub density_max: f64,

    // Adjacent areas
    pub local_average_price: f64,
    #[serde(default)]
    pub adjacent_areas: Vec<AdjacentArea>,

    // Weather
    pub rain_mm_last_30min: f64,
    pub rain_max_mm: f64,
    #[serde(default)]
    pub is_waterlogged: bool,

    // Time
    pub current_hour: u32,
    #[serde(default = "default_peak_hours")]
    pub peak_hours: Vec<PeakWindow>,
    #[serde(default)]
    pub is_holiday_or_event: bool,

    // Safety & accessibility
    pub cctv_coverage_percent: f64,
    pub road_width_m: f64,
    pub max_width_for_score: f64,
}

impl RawSignals {
    pub fn adjacent_congestion(&self) -> Vec<f64> {
        self.adjacent_areas.iter().map(|a| a.congestion).collect()
    }

    pub fn adjacent_prices(&self) -> Vec<f64> {
        self.adjacent_areas.iter().map(|a| a.price).collect()
    }
}

/// Read one slot's signals from a `.json` file, or from YAML otherwise.
pub fn load_signals(path: &Path) -> Result<RawSignals> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read signals file at {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let signals = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse signals: invalid JSON in {}", path.display()))?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse signals: invalid YAML in {}", path.display()))?
    };
    Ok(signals)
}

#[cfg(test)]
pub(crate) fn sample_signals() -> RawSignals {
    RawSignals {
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
        adjacent_areas: vec![
            AdjacentArea { congestion: 0.4, price: 75.0 },
            AdjacentArea { congestion: 0.6, price: 85.0 },
        ],
        rain_mm_last_30min: 5.0,
        rain_max_mm: 20.0,
        is_waterlogged: false,
        current_hour: 18,
        peak_hours: default_peak_hours(),
        is_holiday_or_event: false,
        cctv_coverage_percent: 80.0,
        road_width_m: 4.0,
        max_width_for_score: 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_window_half_open() {
        let window = PeakWindow(8, 10);
        assert!(window.contains(8));
        assert!(window.contains(9));
        assert!(!window.contains(10));
        assert!(!window.contains(7));
    }

    #[test]
    fn test_parse_signals_yaml_with_defaults() {
        let yaml = r#"
requests_per_min: 2.5
Rmax: 5
avg_occupied_slots_hist: 30
total_slots: 50
bookings_last_hour: 15
views_last_hour: 100
free_slots: 10
successful_bookings_30d: 480
accepted_bookings_30d: 500
avg_speed: 15
free_flow_speed: 50
vehicle_density: 120
DensityMax: 200
local_average_price: 80
rain_mm_last_30min: 5
rain_max_mm: 20
current_hour: 18
cctv_coverage_percent: 80
road_width_m: 4
max_width_for_score: 10
"#;
        let signals: RawSignals = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(signals.rmax, 5.0);
        assert_eq!(signals.density_max, 200.0);
        assert!(signals.adjacent_areas.is_empty());
        assert!(!signals.is_waterlogged);
        assert_eq!(signals.peak_hours, default_peak_hours());
    }

    #[test]
    fn test_parse_signals_json_with_adjacent_areas() {
        let mut value = serde_json::to_value(sample_signals()).unwrap();
        value["peak_hours"] = serde_json::json!([[7, 9]]);
        let signals: RawSignals = serde_json::from_value(value).unwrap();
        assert_eq!(signals.adjacent_areas.len(), 2);
        assert_eq!(signals.adjacent_congestion(), vec![0.4, 0.6]);
        assert_eq!(signals.adjacent_prices(), vec![75.0, 85.0]);
        assert_eq!(signals.peak_hours, vec![PeakWindow(7, 9)]);
    }

    #[test]
    fn test_load_signals_json_file() {
        let temp_path = std::env::temp_dir().join("park2go_test_signals.json");
        std::fs::write(&temp_path, serde_json::to_string(&sample_signals()).unwrap()).unwrap();

        let loaded = load_signals(&temp_path).unwrap();
        assert_eq!(loaded, sample_signals());

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_signals_missing_file() {
        let temp_path = std::env::temp_dir().join("park2go_test_missing_signals.yaml");
        let _ = std::fs::remove_file(&temp_path);
        let err = load_signals(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Failed to read signals file"));
    }

    #[test]
    fn test_unknown_signal_field_rejected() {
        let mut value = serde_json::to_value(sample_signals()).unwrap();
        value["surge"] = serde_json::json!(3);
        assert!(serde_json::from_value::<RawSignals>(value).is_err());
    }
}
