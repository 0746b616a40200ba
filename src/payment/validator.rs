use crate::api::StudentBalance;
use crate::error::{FeesError, Result};

/// Check a requested amount against the student's outstanding balance.
///
/// A fully paid student and an over-limit amount are distinct failures; the
/// caller shows different messaging for each. Pure; nothing is submitted
/// here.
pub fn validate_amount(student: &str, amount: i64, balance: &StudentBalance) -> Result<()> {
    if amount <= 0 {
        return Err(FeesError::InvalidAmount);
    }
    if balance.total_remaining <= 0 {
        return Err(FeesError::FullyPaid(student.to_string()));
    }
    if amount > balance.total_remaining {
        return Err(FeesError::AmountTooHigh {
            student: student.to_string(),
            max: balance.total_remaining,
        });
    }
    Ok(())
}

/// Change returned on a cash payment.
///
/// A tendered amount below the requested amount clamps to zero rather than
/// going negative. The shortfall is absorbed silently, matching the upstream
/// behavior this replaces.
pub fn change_due(amount_given: i64, amount: i64) -> i64 {
    (amount_given - amount).max(0)
}
