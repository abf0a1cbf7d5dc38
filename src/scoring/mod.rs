pub mod base_price;
pub mod config;
pub mod engine;
pub mod factors;
pub mod scores;
pub mod signals;
pub mod validation;
pub mod weights;

pub use base_price::{base_price_for, get_base_price, BookingType, VehicleType, FALLBACK_BASE_PRICE};
pub use config::*;
pub use engine::{
    calculate_all_scores, calculate_dynamic_price, explain_price, FactorContribution,
    PriceBreakdown, PricingResult,
};
pub use scores::{ScoreId, ScoreVector};
pub use signals::{default_peak_hours, load_signals, AdjacentArea, PeakWindow, RawSignals};
pub use validation::validate_pricing;
pub use weights::{get_global_weights, WeightTable};
