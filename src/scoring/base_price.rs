use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Base price used when a booking/vehicle combination is not in the table
pub const FALLBACK_BASE_PRICE: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Regular,
    Premium,
    Prebooked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Motorcycle,
}

impl FromStr for BookingType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Ok(BookingType::Regular),
            "premium" => Ok(BookingType::Premium),
            "prebooked" => Ok(BookingType::Prebooked),
            other => bail!("Unknown booking type: {}", other),
        }
    }
}

impl FromStr for VehicleType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "car" => Ok(VehicleType::Car),
            "motorcycle" => Ok(VehicleType::Motorcycle),
            other => bail!("Unknown vehicle type: {}", other),
        }
    }
}

impl fmt::Display for BookingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BookingType::Regular => "regular",
            BookingType::Premium => "premium",
            BookingType::Prebooked => "prebooked",
        })
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VehicleType::Car => "car",
            VehicleType::Motorcycle => "motorcycle",
        })
    }
}

impl VehicleType {
    /// Pricing class for a free-form vehicle label from the slot store.
    /// Anything mentioning "bike" is priced as a motorcycle.
    pub fn from_slot_label(label: &str) -> Self {
        if label.to_lowercase().contains("bike") {
            VehicleType::Motorcycle
        } else {
            VehicleType::Car
        }
    }
}

/// Base rate for a known booking/vehicle combination.
pub fn base_price_for(booking: BookingType, vehicle: VehicleType) -> f64 {
    match (booking, vehicle) {
        (BookingType::Regular, VehicleType::Car) => 70.0,
        (BookingType::Regular, VehicleType::Motorcycle) => 50.0,
        (BookingType::Premium, VehicleType::Car) => 100.0,
        (BookingType::Premium, VehicleType::Motorcycle) => 70.0,
        (BookingType::Prebooked, VehicleType::Car) => 80.0,
        (BookingType::Prebooked, VehicleType::Motorcycle) => 60.0,
    }
}

/// Case-insensitive base price lookup.
///
/// Unknown booking or vehicle types fall back to [`FALLBACK_BASE_PRICE`]
/// with a warning; the lookup itself never fails.
pub fn get_base_price(booking_type: &str, vehicle_type: &str) -> f64 {
    match (booking_type.parse::<BookingType>(), vehicle_type.parse::<VehicleType>()) {
        (Ok(booking), Ok(vehicle)) => base_price_for(booking, vehicle),
        _ => {
            warn!(
                booking_type,
                vehicle_type,
                fallback = FALLBACK_BASE_PRICE,
                "base price not found, using fallback"
            );
            FALLBACK_BASE_PRICE
        }
    }
}
