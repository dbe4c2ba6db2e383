/// Rounds to the nearest integer, ties to even (90 s is 2 min, 150 s is 2 min).
/// Negative inputs clamp to zero.
pub(crate) fn round_half_even(value: f64) -> u64 {
    let rounded = value.round_ties_even();
    if rounded <= 0.0 { 0 } else { rounded as u64 }
}

pub(crate) fn seconds_to_minutes(seconds: u64) -> u64 {
    round_half_even(seconds as f64 / 60.0)
}
