//! Target-delta strike solver (§4.1): given a set of candidate strikes,
//! find the one whose delta is closest to a target, within tolerance.

use positive::Positive;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// One candidate the solver considers: a strike paired with its
/// (already-priced) absolute delta.
#[derive(Debug, Clone, Copy)]
pub struct DeltaCandidate {
    pub strike: Positive,
    pub abs_delta: Decimal,
}

/// Returns the candidate whose `abs_delta` is closest to `target_delta`,
/// provided that distance is `<= tolerance`. Ties (equal distance) break
/// to the strike closer to `atm_strike`. Returns `None` ("no suitable
/// strike") when every candidate is outside tolerance or the slice is
/// empty — the caller skips entry for the day.
pub fn find_target_delta_strike(
    candidates: &[DeltaCandidate],
    target_delta: f64,
    tolerance: f64,
    atm_strike: Positive,
) -> Option<Positive> {
    let target = Decimal::try_from(target_delta).ok()?;
    let tol = Decimal::try_from(tolerance).ok()?;

    let mut best: Option<(Decimal, Decimal, Positive)> = None; // (distance, |strike-atm|, strike)
    for candidate in candidates {
        let distance = (candidate.abs_delta - target).abs();
        if distance > tol {
            continue;
        }
        let atm_distance = (candidate.strike.to_f64().unwrap_or(0.0)
            - atm_strike.to_f64().unwrap_or(0.0))
        .abs();
        let atm_distance = Decimal::try_from(atm_distance).unwrap_or(Decimal::MAX);

        match &best {
            None => best = Some((distance, atm_distance, candidate.strike)),
            Some((best_distance, best_atm_distance, _)) => {
                if distance < *best_distance
                    || (distance == *best_distance && atm_distance < *best_atm_distance)
                {
                    best = Some((distance, atm_distance, candidate.strike));
                }
            }
        }
    }
    best.map(|(_, _, strike)| strike)
}
