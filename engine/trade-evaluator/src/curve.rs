//! Draft pick value curve
//!
//! Weibull approximation of draft-day trade value from Massey & Thaler (2013):
//! `v(t) = exp(-λ (t - 1)^β)`, normalized so the first pick is worth 1.0.

use crate::error::{Result, TradeError};

/// Decay rate λ
pub const LAMBDA: f64 = 0.146;

/// Shape β
pub const BETA: f64 = 0.698;

/// Highest accepted pick number.
///
/// Far past any real draft, and well short of where `v(t)` underflows to 0.0
/// (around pick 205,000).
pub const MAX_PICK: u32 = 100_000;

/// Value of a single pick. Picks run from 1 to [`MAX_PICK`]; anything else is rejected.
pub fn performance_value(pick: u32) -> Result<f64> {
    if pick == 0 || pick > MAX_PICK {
        return Err(TradeError::InvalidPick(pick));
    }
    let offset = f64::from(pick - 1);
    Ok((-LAMBDA * offset.powf(BETA)).exp())
}

/// Summed value of a set of picks. Empty sets are worth 0, repeats count twice.
pub fn pick_set_value(picks: &[u32]) -> Result<f64> {
    picks.iter().try_fold(0.0, |total, &pick| -> Result<f64> { Ok(total + performance_value(pick)?) })
}
