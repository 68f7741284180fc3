//! Numeric helpers for catalog statistics

/// Arithmetic mean; `None` for an empty dataset
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Round to the nearest integer, ties to even (2.5 -> 2, 3.5 -> 4).
///
/// Every rounded statistic goes through this one function so averages and
/// percentages share a policy.
pub fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Mean rounded with [`round_half_even`]; 0 for an empty dataset
pub fn rounded_mean<I>(values: I) -> i64
where
    I: IntoIterator<Item = f64>,
{
    mean(values).map(round_half_even).unwrap_or(0)
}

/// `round(100 * part / total)`; 0 when `total` is 0
pub fn percentage(part: u64, total: u64) -> i64 {
    if total == 0 {
        return 0;
    }
    round_half_even(part as f64 / total as f64 * 100.0)
}
