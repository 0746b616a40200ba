pub mod api;
pub mod config;
pub mod error;
pub mod payment;
pub mod receipt;

pub use api::{ApiClient, PaymentRecord, PaymentRequest, StudentBalance};
pub use config::{Config, HistoryEntry, State};
pub use error::{FeesError, Result};
pub use payment::{change_due, reconcile, validate_amount, PaymentMethod};
pub use receipt::{format_receipt_number, resolve_next_sequence, CounterStore, FileCounterStore};
