pub mod formatter;

pub use formatter::{
    format_areas, format_json, format_price, format_price_report, format_query_header,
    format_recommendations_table, format_tsv, format_weights, should_use_colors,
};
