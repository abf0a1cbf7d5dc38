use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::geo::AREAS;
use crate::recommend::{Recommendation, SlotRecommendation};
use crate::scoring::{PriceBreakdown, WeightTable};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a monetary amount with two decimals
pub fn format_price(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn slot_kind(slot: &SlotRecommendation) -> String {
    format!(
        "{}/{}",
        slot.vehicle_type.as_deref().unwrap_or("-"),
        slot.booking_type.as_deref().unwrap_or("Regular")
    )
}

/// One-line summary of what was searched
pub fn format_query_header(rec: &Recommendation) -> String {
    let place = match rec.query.location {
        Some(ref name) => format!("{} ({:.4}, {:.4})", name, rec.query.lat, rec.query.lon),
        None => format!("({:.4}, {:.4})", rec.query.lat, rec.query.lon),
    };
    format!("Slots near {} on {} {}", place, rec.query.day, rec.query.time)
}

/// Format recommendations as a ranked table: index, price, distance, name,
/// vehicle/booking type, free slots and safety point.
pub fn format_recommendations_table(rec: &Recommendation, use_colors: bool) -> String {
    let header = format_query_header(rec);
    if rec.results.is_empty() {
        return format!("{}\nNo parking slots found nearby.", header);
    }

    let term_width = get_terminal_width();
    let price_width = 9;
    let distance_width = 8;
    let separator = "  ";

    let rows = rec
        .results
        .iter()
        .enumerate()
        .map(|(idx, slot)| {
            let index_str = format!("{:>2}.", idx + 1);
            let price_str = format!("{:>width$}", format_price(slot.adjusted_price), width = price_width);
            let distance_str = format!(
                "{:>width$}",
                format!("{:.2} km", slot.distance_km),
                width = distance_width
            );
            let kind = slot_kind(slot);
            let extras = format!("free {}  safety {:.1}", slot.free_slots, slot.safety_point);

            let fixed_width = 3
                + 1
                + price_width
                + distance_width
                + kind.chars().count()
                + extras.len()
                + separator.len() * 4;
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&slot.location_name, width - fixed_width)
                }
                Some(_) => truncate_name(&slot.location_name, 20),
                None => slot.location_name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    price_str.bold(),
                    separator,
                    distance_str.cyan(),
                    separator,
                    name,
                    separator,
                    kind.yellow(),
                    separator,
                    extras.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str,
                    price_str,
                    separator,
                    distance_str,
                    separator,
                    name,
                    separator,
                    kind,
                    separator,
                    extras
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n{}", header, rows)
}

/// Format recommendations as tab-separated values for scripting
/// Columns: unique_id, adjusted_price, distance_km, location_name,
/// vehicle_type, booking_type, free_slots, safety_point (no headers, no colors)
pub fn format_tsv(rec: &Recommendation) -> String {
    rec.results
        .iter()
        .map(|slot| {
            format!(
                "{}\t{}\t{:.3}\t{}\t{}\t{}\t{}\t{}",
                slot.unique_id,
                format_price(slot.adjusted_price),
                slot.distance_km,
                slot.location_name,
                slot.vehicle_type.as_deref().unwrap_or(""),
                slot.booking_type.as_deref().unwrap_or(""),
                slot.free_slots,
                slot.safety_point
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format recommendations as pretty-printed JSON ({"query": ..., "results": [...]})
pub fn format_json(rec: &Recommendation) -> Result<String> {
    serde_json::to_string_pretty(rec).context("Failed to serialize recommendations")
}

/// Detailed single-slot price report: every factor with its weight, then
/// the composite score, multiplier and final price.
pub fn format_price_report(breakdown: &PriceBreakdown, use_colors: bool) -> String {
    let mut lines = Vec::new();
    lines.push("Calculated scores (0.0 - 1.0)".to_string());

    let mut total_weight = 0.0;
    for factor in &breakdown.factors {
        total_weight += factor.weight;
        lines.push(format!(
            "{:>10}: {:6.4} (Weight: {:6.4})  {}",
            factor.id.as_str(),
            factor.score,
            factor.weight,
            factor.id.label()
        ));
    }
    lines.push(format!("(Total weight: {:.4})", total_weight));
    lines.push(String::new());

    let result = &breakdown.result;
    lines.push(format!("Base price:                  {}", format_price(breakdown.base_price)));
    lines.push(format!("Composite score (delta_i):   {:.4}", result.delta_i));
    lines.push(format!("Reference score (delta_bar): {:.4}", breakdown.delta_bar));
    lines.push(format!("Sensitivity (alpha):         {:.2}", breakdown.alpha));
    lines.push(format!("Price multiplier:            {:.4}", result.multiplier));

    let final_line = format!("Final dynamic price:         {}", format_price(result.dynamic_price));
    if use_colors {
        lines.push(final_line.bold().to_string());
    } else {
        lines.push(final_line);
    }

    lines.join("\n")
}

/// Format the weight table, one factor per line, followed by the sum
pub fn format_weights(weights: &WeightTable) -> String {
    let mut lines: Vec<String> = weights
        .iter()
        .map(|(id, weight)| format!("{:>10}  {:.4}  {}", id.as_str(), weight, id.label()))
        .collect();
    lines.push(format!("{:>10}  {:.4}", "total", weights.sum()));
    lines.join("\n")
}

/// Format the known area names with their coordinates
pub fn format_areas() -> String {
    AREAS
        .iter()
        .map(|(name, coords)| format!("{:<12} {:.4}, {:.4}", name, coords.lat, coords.lon))
        .collect::<Vec<_>>()
        .join("\n")
}
