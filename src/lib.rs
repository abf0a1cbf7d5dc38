pub mod config;
pub mod geo;
pub mod output;
pub mod recommend;
pub mod scoring;
pub mod slots;
