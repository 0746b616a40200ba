use std::path::PathBuf;

use crate::api::ApiClient;
use crate::config::{load_state, save_state, State};
use crate::error::Result;
use crate::receipt::generator::{class_code, year_code};

/// Per-(year, class) monotonic receipt counter.
///
/// `next` must persist the incremented value before returning it, so the
/// counter survives a process restart. Atomicity is per-process only: two
/// processes sharing the same backing store can race on read-increment-write.
pub trait CounterStore {
    /// Last-issued sequence for the key (0 if never used)
    fn current(&self, year_code: &str, class_code: &str) -> Result<u32>;

    /// Increment, persist, and return the new sequence
    fn next(&mut self, year_code: &str, class_code: &str) -> Result<u32>;

    /// Reset the counter back to 0
    fn reset(&mut self, year_code: &str, class_code: &str) -> Result<()>;

    /// Raise the stored value to `seq` if it is behind, so the local counter
    /// stays in step with sequence numbers derived from the payments API
    fn advance_to(&mut self, year_code: &str, class_code: &str, seq: u32) -> Result<()>;
}

/// Counter store persisted in state.toml under the config directory
pub struct FileCounterStore {
    cfg_dir: PathBuf,
}

impl FileCounterStore {
    pub fn new(cfg_dir: &PathBuf) -> Self {
        Self {
            cfg_dir: cfg_dir.clone(),
        }
    }
}

impl CounterStore for FileCounterStore {
    fn current(&self, year_code: &str, class_code: &str) -> Result<u32> {
        let state = load_state(&self.cfg_dir)?;
        let key = State::counter_key(year_code, class_code);
        Ok(state.counters.get(&key).copied().unwrap_or(0))
    }

    fn next(&mut self, year_code: &str, class_code: &str) -> Result<u32> {
        let mut state = load_state(&self.cfg_dir)?;
        let key = State::counter_key(year_code, class_code);
        let value = state.counters.get(&key).copied().unwrap_or(0) + 1;
        state.counters.insert(key, value);
        save_state(&self.cfg_dir, &state)?;
        Ok(value)
    }

    fn reset(&mut self, year_code: &str, class_code: &str) -> Result<()> {
        let mut state = load_state(&self.cfg_dir)?;
        let key = State::counter_key(year_code, class_code);
        state.counters.remove(&key);
        save_state(&self.cfg_dir, &state)?;
        Ok(())
    }

    fn advance_to(&mut self, year_code: &str, class_code: &str, seq: u32) -> Result<()> {
        let mut state = load_state(&self.cfg_dir)?;
        let key = State::counter_key(year_code, class_code);
        let stored = state.counters.get(&key).copied().unwrap_or(0);
        if seq > stored {
            state.counters.insert(key, seq);
            save_state(&self.cfg_dir, &state)?;
        }
        Ok(())
    }
}

/// Resolve the next receipt sequence for a (year, class).
///
/// The source of truth is what the payments API already holds: the count of
/// receipts carrying both the year code and the class code, plus one. After a
/// successful remote resolution the local counter is advanced to match, so a
/// later offline fallback continues from the remote-derived value.
///
/// Any transport or decode failure falls back to the local counter with a
/// stderr warning; receipt generation never blocks on the API being
/// reachable. Note there is no locking between this count and the eventual
/// payment submission, so two concurrent operators can still derive the same
/// sequence.
pub fn resolve_next_sequence(
    api: &ApiClient,
    store: &mut dyn CounterStore,
    academic_year: &str,
    class_name: &str,
) -> Result<u32> {
    let yc = year_code(academic_year);
    let cc = class_code(class_name);

    match remote_sequence(api, &yc, &cc) {
        Some(seq) => {
            store.advance_to(&yc, &cc, seq)?;
            Ok(seq)
        }
        None => {
            eprintln!("Warning: could not reach payments API; using local receipt counter");
            store.next(&yc, &cc)
        }
    }
}

/// Preview the next sequence without consuming it. Used by `next-receipt`.
pub fn peek_next_sequence(
    api: &ApiClient,
    store: &dyn CounterStore,
    academic_year: &str,
    class_name: &str,
) -> Result<u32> {
    let yc = year_code(academic_year);
    let cc = class_code(class_name);

    match remote_sequence(api, &yc, &cc) {
        Some(seq) => Ok(seq),
        None => Ok(store.current(&yc, &cc)? + 1),
    }
}

/// Remote count + 1, or None on any failure so the caller can fall back
fn remote_sequence(api: &ApiClient, year_code: &str, class_code: &str) -> Option<u32> {
    let payments = api.get_payments().ok()?;
    let matching = payments
        .iter()
        .filter(|p| p.receipt_id.contains(year_code) && p.receipt_id.contains(class_code))
        .count();
    Some(matching as u32 + 1)
}
