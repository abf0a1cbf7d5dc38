use serde::Serialize;

/// Mean Earth radius in kilometres
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Named Dhaka areas. Lookup walks this list in order.
pub const AREAS: &[(&str, Coordinates)] = &[
    ("gulshan", Coordinates::new(23.7925, 90.4078)),
    ("banani", Coordinates::new(23.7934, 90.4043)),
    ("bashundhara", Coordinates::new(23.8103, 90.4316)),
    ("dhanmondi", Coordinates::new(23.7465, 90.3760)),
    ("mirpur", Coordinates::new(23.8151, 90.3630)),
    ("uttara", Coordinates::new(23.8740, 90.3976)),
    ("tejgaon", Coordinates::new(23.7807, 90.4120)),
    ("mohakhali", Coordinates::new(23.7805, 90.3925)),
    ("farmgate", Coordinates::new(23.7570, 90.3910)),
    ("motijheel", Coordinates::new(23.7323, 90.4160)),
    ("lalbagh", Coordinates::new(23.7189, 90.3880)),
    ("shahbagh", Coordinates::new(23.7386, 90.3954)),
    ("khilgaon", Coordinates::new(23.7465, 90.4320)),
    ("rampura", Coordinates::new(23.7638, 90.4245)),
    ("badda", Coordinates::new(23.7805, 90.4262)),
    ("mohammadpur", Coordinates::new(23.7589, 90.3580)),
    ("agargaon", Coordinates::new(23.7780, 90.3750)),
    ("kalyanpur", Coordinates::new(23.7888, 90.3582)),
    ("pallabi", Coordinates::new(23.8295, 90.3654)),
    ("kamalapur", Coordinates::new(23.7380, 90.4240)),
];

/// Resolve a free-text location to coordinates.
///
/// The query is trimmed and lower-cased, then the first area whose name
/// appears anywhere in it wins, so "Road 11, Banani" resolves to banani.
pub fn geocode_location(query: &str) -> Option<Coordinates> {
    let key = query.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    AREAS
        .iter()
        .find(|(name, _)| key.contains(name))
        .map(|(_, coords)| *coords)
}

/// Great-circle distance in kilometres (haversine formula).
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let dlat = (to.lat - from.lat).to_radians();
    let dlon = (to.lon - from.lon).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
