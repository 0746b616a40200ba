mod generator;
mod sequence;

pub use generator::{class_code, format_receipt_number, year_code};
pub use sequence::{peek_next_sequence, resolve_next_sequence, CounterStore, FileCounterStore};
