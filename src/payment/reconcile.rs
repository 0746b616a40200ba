use crate::api::{ApiClient, StudentBalance};
use crate::error::Result;

/// Fetch a fresh balance for the student and normalize it so that
/// `total_remaining == max(0, total_expected - total_paid)` always holds,
/// whatever the backend returned.
///
/// Transport failures propagate; the caller decides whether that is fatal
/// (before a payment) or a warning with the stale balance retained (after
/// one). No automatic retry.
pub fn reconcile(api: &ApiClient, student_id: &str, academic_year: &str) -> Result<StudentBalance> {
    let balance = api.get_student_balance(student_id, academic_year)?;
    Ok(balance.normalized())
}
