//! Unit conversion for emissions readings.
//!
//! WattTime reports the marginal operating emissions rate in lbs CO₂
//! per MWh; this API serves grams of CO₂ per kWh.

/// Exact grams-per-pound conversion factor.
pub const GRAMS_PER_POUND: f64 = 453.59237;

/// Convert lbs CO₂/MWh to g CO₂/kWh.
///
/// Multiplying by [`GRAMS_PER_POUND`] converts pounds to grams; dividing
/// by 1000 moves from a MWh basis to a kWh basis. No rounding is
/// applied; the full floating-point value is returned.
pub fn lbs_per_mwh_to_g_per_kwh(lbs_per_mwh: f64) -> f64 {
    lbs_per_mwh * GRAMS_PER_POUND / 1000.0
}
