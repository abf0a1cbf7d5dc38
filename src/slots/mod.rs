pub mod filter;
pub mod storage;
pub mod types;

pub use filter::{filter_slots, round_to_half_hour, SlotQuery};
pub use storage::{get_slots_path, load_slots};
pub use types::SlotRecord;
