use chrono::DateTime;
use serde_json::json;
use std::env;
use std::path::PathBuf;

use park2go::config::{load_config, slots_path, validate_config};
use park2go::recommend::{recommend, resolve_location, RecommendRequest};
use park2go::scoring::{
    calculate_all_scores, calculate_dynamic_price, get_base_price, get_global_weights, ScoreId,
};
use park2go::slots::load_slots;

fn slot_row(id: &str, lat: f64, lon: f64, vehicle: &str, booking: Option<&str>) -> serde_json::Value {
    json!({
        "unique_id": id,
        "location_name": format!("{} parking", id),
        "latitude": lat,
        "longitude": lon,
        "vehicle_type": vehicle,
        "booking_type": booking,
        "day_of_week": "Friday",
        "timestamp": "09:30",
        "requests_per_min": 4.0,
        "Rmax": 5.0,
        "avg_occupied_slots_hist": 20.0,
        "total_slots": 40,
        "bookings_last_hour": 12,
        "views_last_hour": 60,
        "free_slots": 8,
        "successful_bookings_30d": 300,
        "accepted_bookings_30d": 320,
        "avg_speed": 12.0,
        "free_flow_speed": 40.0,
        "vehicle_density": 150.0,
        "DensityMax": 200.0,
        "local_average_price": 75.0,
        "rain_mm_last_30min": 0.0,
        "rain_max_mm": 20.0,
        "is_waterlogged": false,
        "current_hour": 9,
        "is_holiday_or_event": false,
        "cctv_coverage_percent": 60.0,
        "road_width_m": 6.0,
        "max_width_for_score": 10.0,
        "safety_point": 3.8
    })
}

fn write_temp(name: &str, content: &str) -> PathBuf {
    let path = env::temp_dir().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_config_and_store_to_recommendations() {
    let rows = json!([
        // Dhanmondi, regular car
        slot_row("DHN-1", 23.7465, 90.3760, "Car", Some("Regular")),
        // Dhanmondi, bike with no booking type stored
        slot_row("DHN-2", 23.7480, 90.3770, "Bike", None),
        // Dhanmondi, premium car
        slot_row("DHN-3", 23.7470, 90.3765, "Car", Some("Premium")),
        // Uttara, far away
        slot_row("UTT-1", 23.8740, 90.3976, "Car", Some("Regular")),
    ]);
    let store = write_temp("park2go_it_slots.json", &rows.to_string());
    let config_file = write_temp(
        "park2go_it_config.yaml",
        &format!(
            "pricing:\n  alpha: 0.5\n  delta_bar: 0.55\nsearch:\n  limit: 2\nslots_path: {}\n",
            store.display()
        ),
    );

    let config = load_config(Some(config_file.clone())).unwrap();
    assert!(validate_config(&config).is_ok());
    assert_eq!(slots_path(&config), store);

    let slots = load_slots(&slots_path(&config)).unwrap();
    assert_eq!(slots.len(), 4);

    let request = RecommendRequest {
        location: Some("Dhanmondi".to_string()),
        coords: resolve_location(Some("Dhanmondi"), None, None).unwrap(),
        vehicle_type: None,
        booking_type: None,
        alpha: config.pricing().alpha(),
        delta_bar: config.pricing().delta_bar(),
        // 2024-03-01 was a Friday
        at: DateTime::parse_from_rfc3339("2024-03-01T09:44:00+06:00").unwrap(),
        radius_km: config.search().radius_km,
        limit: config.search().limit,
    };
    let rec = recommend(&slots, &request, &config.pricing().weight_table().unwrap());

    assert_eq!(rec.query.day, "Friday");
    assert_eq!(rec.query.time, "09:30");
    let ids: Vec<_> = rec.results.iter().map(|r| r.unique_id.as_str()).collect();
    // bike (regular motorcycle, 50) is cheapest, then regular car (70)
    assert_eq!(ids, vec!["DHN-2", "DHN-1"]);

    // price of the bike slot matches the engine applied directly
    let scores = calculate_all_scores(&slots[1].to_raw_signals());
    let expected = calculate_dynamic_price(
        get_base_price("regular", "motorcycle"),
        &scores,
        get_global_weights(),
        0.5,
        0.55,
    );
    assert!((rec.results[0].adjusted_price - expected.dynamic_price).abs() < 0.005);
    assert_eq!(scores.get(ScoreId::Time1), Some(1.0));

    let _ = std::fs::remove_file(&store);
    let _ = std::fs::remove_file(&config_file);
}

#[test]
fn test_vehicle_filter_is_exact_store_match() {
    let rows = json!([
        slot_row("A", 23.7465, 90.3760, "Car", Some("Regular")),
        slot_row("B", 23.7466, 90.3760, "Bike", Some("Regular")),
    ]);
    let store = write_temp("park2go_it_vehicle_slots.json", &rows.to_string());
    let slots = load_slots(&store).unwrap();

    let request = RecommendRequest {
        location: None,
        coords: resolve_location(None, Some(23.7465), Some(90.3760)).unwrap(),
        vehicle_type: Some("Car".to_string()),
        booking_type: None,
        alpha: 0.5,
        delta_bar: 0.55,
        at: DateTime::parse_from_rfc3339("2024-03-01T09:30:00+06:00").unwrap(),
        radius_km: 2.0,
        limit: 5,
    };
    let rec = recommend(&slots, &request, get_global_weights());
    assert_eq!(rec.results.len(), 1);
    assert_eq!(rec.results[0].unique_id, "A");
    assert_eq!(rec.results[0].distance_km, 0.0);
    assert!(rec.query.location.is_none());

    let _ = std::fs::remove_file(&store);
}
